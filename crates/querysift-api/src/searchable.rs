//! Searchable entities.
//!
//! A [`Searchable`] describes one searchable table: which columns the
//! search compares, which columns a caller may sort by, and which joins
//! must be present for those columns to resolve. Hosts keep one per
//! entity type and run every list query through [`Searchable::search`].
//!
//! Unset column lists fall back to every column of the table, listed
//! through an injected [`TableColumns`] cache. Without a cache the
//! fallback is an empty list, which leaves queries unfiltered.

use crate::security::{validate_identifier, validate_search_input};
use crate::table_columns::TableColumns;
use querysift_core::{
    ColumnDecl, Columns, Error, JoinClause, JoinKind, OrderDirection, QueryBuilder, Result,
    SelectExpr,
};
use querysift_search::Search;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// A join the search needs, e.g. to reach `authors.name` from `posts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchJoin {
    /// Joined table
    pub table: String,
    /// Left side of the `ON` equality
    pub first: String,
    /// Right side of the `ON` equality
    pub second: String,
    /// Join type, left join unless stated
    #[serde(default)]
    pub kind: JoinKind,
}

impl SearchJoin {
    /// A left join of `table` on `first = second`.
    pub fn new(
        table: impl Into<String>,
        first: impl Into<String>,
        second: impl Into<String>,
    ) -> Self {
        Self {
            table: table.into(),
            first: first.into(),
            second: second.into(),
            kind: JoinKind::Left,
        }
    }

    /// Set the join type
    pub fn with_kind(mut self, kind: JoinKind) -> Self {
        self.kind = kind;
        self
    }
}

impl From<SearchJoin> for JoinClause {
    fn from(join: SearchJoin) -> Self {
        JoinClause::new(join.kind, join.table, join.first, join.second)
    }
}

impl From<&SearchJoin> for JoinClause {
    fn from(join: &SearchJoin) -> Self {
        JoinClause::new(join.kind, &join.table, &join.first, &join.second)
    }
}

/// Declarative search settings of an entity.
///
/// `None` column lists mean "every column of the table".
///
/// ```rust
/// use querysift::SearchableConfig;
///
/// let config: SearchableConfig = serde_json::from_str(r#"{
///     "columns": ["posts.title", {"key": "author_name", "column": "authors.name"}],
///     "joins": [{"table": "authors", "first": "authors.id", "second": "posts.author_id"}]
/// }"#)?;
/// assert_eq!(config.columns.as_ref().map(Vec::len), Some(2));
/// assert!(config.sortable_columns.is_none());
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchableConfig {
    /// Columns the search compares
    pub columns: Option<Vec<ColumnDecl>>,
    /// Columns callers may sort by, in addition to the searchable ones
    pub sortable_columns: Option<Vec<ColumnDecl>>,
    /// Joins applied before searching
    pub joins: Vec<SearchJoin>,
}

impl SearchableConfig {
    /// Set the searchable columns
    pub fn with_columns<I, D>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<ColumnDecl>,
    {
        self.columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Set the sortable columns
    pub fn with_sortable_columns<I, D>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<ColumnDecl>,
    {
        self.sortable_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Add a join
    pub fn with_join(mut self, join: SearchJoin) -> Self {
        self.joins.push(join);
        self
    }
}

/// Search capability of one table.
#[derive(Debug, Clone)]
pub struct Searchable {
    table: String,
    config: SearchableConfig,
    enabled: bool,
    sort_by_relevance: Option<bool>,
    search_query: Option<Search>,
    table_columns: Option<Arc<TableColumns>>,
}

impl Searchable {
    /// Creates a searchable over `table` with nothing configured.
    pub fn new(table: impl Into<String>) -> Self {
        Self::with_config(table, SearchableConfig::default())
    }

    /// Creates a searchable over `table` with `config`.
    pub fn with_config(table: impl Into<String>, config: SearchableConfig) -> Self {
        Self {
            table: table.into(),
            config,
            enabled: true,
            sort_by_relevance: None,
            search_query: None,
            table_columns: None,
        }
    }

    /// Use `table_columns` to list the table when a column list is unset
    pub fn with_table_columns(mut self, table_columns: Arc<TableColumns>) -> Self {
        self.table_columns = Some(table_columns);
        self
    }

    /// The table searched.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// The current column and join configuration.
    pub fn config(&self) -> &SearchableConfig {
        &self.config
    }

    /// Whether [`Searchable::search`] writes into queries.
    pub fn is_searchable_enabled(&self) -> bool {
        self.enabled
    }

    /// Declared searchable columns, or the table's columns when unset.
    pub fn searchable_columns(&self) -> Result<Vec<ColumnDecl>> {
        match &self.config.columns {
            Some(columns) => Ok(columns.clone()),
            None => self.table_column_listing(),
        }
    }

    /// Declared sortable columns, or the table's columns when unset.
    pub fn sortable_columns(&self) -> Result<Vec<ColumnDecl>> {
        match &self.config.sortable_columns {
            Some(columns) => Ok(columns.clone()),
            None => self.table_column_listing(),
        }
    }

    /// Joins applied before searching.
    pub fn searchable_joins(&self) -> &[SearchJoin] {
        &self.config.joins
    }

    fn table_column_listing(&self) -> Result<Vec<ColumnDecl>> {
        match &self.table_columns {
            Some(table_columns) => Ok(table_columns
                .get(&self.table)?
                .into_iter()
                .map(ColumnDecl::Positional)
                .collect()),
            None => {
                debug!(table = %self.table, "No table column source, using no columns");
                Ok(Vec::new())
            }
        }
    }

    /// Registry over searchable then sortable columns.
    pub fn build_all_columns(&self) -> Result<Columns> {
        let mut declarations = self.searchable_columns()?;
        declarations.extend(self.sortable_columns()?);
        Ok(Columns::new(declarations))
    }

    /// Registry over the searchable columns.
    pub fn build_searchable_columns(&self) -> Result<Columns> {
        Ok(Columns::new(self.searchable_columns()?))
    }

    /// Registry over the sortable columns.
    pub fn build_sortable_columns(&self) -> Result<Columns> {
        Ok(Columns::new(self.sortable_columns()?))
    }

    /// Physical column behind `key`, looked up in searchable and sortable
    /// columns.
    pub fn get_column(&self, key: &str) -> Result<Option<String>> {
        Ok(self.build_all_columns()?.find(key))
    }

    /// Physical searchable column behind `key`.
    pub fn get_searchable_column(&self, key: &str) -> Result<Option<String>> {
        Ok(self.build_searchable_columns()?.find(key))
    }

    /// Physical sortable column behind `key`.
    pub fn get_sortable_column(&self, key: &str) -> Result<Option<String>> {
        Ok(self.build_sortable_columns()?.find(key))
    }

    /// Whether `key` names a declared column, regular or derived.
    ///
    /// Check user-supplied sort keys with this before they reach
    /// `ORDER BY`.
    pub fn is_column_valid(&self, key: &str) -> Result<bool> {
        Ok(self.get_column(key)?.is_some())
    }

    /// Replaces the whole configuration. Parts missing from `config` become
    /// empty lists rather than falling back to the table's columns.
    pub fn set_searchable(&mut self, config: SearchableConfig) -> &mut Self {
        self.config = SearchableConfig {
            columns: Some(config.columns.unwrap_or_default()),
            sortable_columns: Some(config.sortable_columns.unwrap_or_default()),
            joins: config.joins,
        };
        self
    }

    /// Replaces the searchable columns.
    pub fn set_searchable_columns(&mut self, columns: Vec<ColumnDecl>) -> &mut Self {
        self.config.columns = Some(columns);
        self
    }

    /// Replaces the sortable columns.
    pub fn set_sortable_columns(&mut self, columns: Vec<ColumnDecl>) -> &mut Self {
        self.config.sortable_columns = Some(columns);
        self
    }

    /// Replaces the joins.
    pub fn set_searchable_joins(&mut self, joins: Vec<SearchJoin>) -> &mut Self {
        self.config.joins = joins;
        self
    }

    /// Appends the non-empty parts of `config`.
    pub fn add_searchable(&mut self, config: SearchableConfig) -> &mut Self {
        if let Some(columns) = config.columns.filter(|c| !c.is_empty()) {
            self.add_searchable_columns(columns);
        }
        if let Some(columns) = config.sortable_columns.filter(|c| !c.is_empty()) {
            self.add_sortable_columns(columns);
        }
        if !config.joins.is_empty() {
            self.add_searchable_joins(config.joins);
        }
        self
    }

    /// Appends searchable columns. An unset list starts out empty.
    pub fn add_searchable_columns(&mut self, columns: Vec<ColumnDecl>) -> &mut Self {
        self.config
            .columns
            .get_or_insert_with(Vec::new)
            .extend(columns);
        self
    }

    /// Appends sortable columns. An unset list starts out empty.
    pub fn add_sortable_columns(&mut self, columns: Vec<ColumnDecl>) -> &mut Self {
        self.config
            .sortable_columns
            .get_or_insert_with(Vec::new)
            .extend(columns);
        self
    }

    /// Appends joins.
    pub fn add_searchable_joins(&mut self, joins: Vec<SearchJoin>) -> &mut Self {
        self.config.joins.extend(joins);
        self
    }

    /// Re-enables searching.
    pub fn enable_searchable(&mut self) -> &mut Self {
        self.enabled = true;
        self
    }

    /// Makes [`Searchable::search`] leave queries untouched.
    pub fn disable_searchable(&mut self) -> &mut Self {
        self.enabled = false;
        self
    }

    /// Turns relevance ordering on or off, overriding the search query's
    /// own setting.
    pub fn sort_by_relevance(&mut self, sort: bool) -> &mut Self {
        self.sort_by_relevance = Some(sort);
        self
    }

    /// The search to run: the one set with [`set_search_query`], or a
    /// default [`Search`] over the searchable columns.
    ///
    /// [`set_search_query`]: Searchable::set_search_query
    pub fn search_query(&self) -> Result<Search> {
        let mut search = match &self.search_query {
            Some(search) => search.clone(),
            None => Search::new(self.build_searchable_columns()?),
        };
        if let Some(sort) = self.sort_by_relevance {
            search.sort_by_relevance(sort);
        }
        Ok(search)
    }

    /// Uses `search` instead of the default search over the searchable
    /// columns.
    pub fn set_search_query(&mut self, search: Search) -> &mut Self {
        self.search_query = Some(search);
        self
    }

    /// Searches `query` for `input`.
    ///
    /// Applies the configured joins, selects `<table>.*` when the query has
    /// no select list yet (so the relevance column does not replace it),
    /// then runs the search query. Does nothing while disabled.
    ///
    /// # Errors
    ///
    /// Fails before touching the query on oversized input, a failed table
    /// listing or a search that cannot resolve its sort columns.
    pub fn search<'q, Q>(&self, query: &'q mut Q, input: &str) -> Result<&'q mut Q>
    where
        Q: QueryBuilder + ?Sized,
    {
        if !self.enabled {
            debug!(table = %self.table, "Searchable disabled, search skipped");
            return Ok(query);
        }

        validate_search_input(input)?;
        let search = self.search_query()?;
        if search.should_sort_by_relevance() {
            search.sort_columns()?;
        }

        self.apply_searchable_joins(query);

        if !query.has_select() {
            let all = SelectExpr::Column(format!("{}.*", query.table()));
            query.select(vec![all]);
        }

        search.search(query, input)
    }

    fn apply_searchable_joins<Q: QueryBuilder + ?Sized>(&self, query: &mut Q) {
        for join in &self.config.joins {
            query.join(join.into());
        }
        if !self.config.joins.is_empty() {
            debug!(
                table = %self.table,
                joins = self.config.joins.len(),
                "Applied searchable joins"
            );
        }
    }

    /// Orders `query` by the column behind a caller-supplied `key`.
    ///
    /// # Errors
    ///
    /// Returns Error::InvalidInput for a malformed key and
    /// Error::UnknownColumn for a key no declared column answers to.
    pub fn order_by_column<'q, Q>(
        &self,
        query: &'q mut Q,
        key: &str,
        direction: OrderDirection,
    ) -> Result<&'q mut Q>
    where
        Q: QueryBuilder + ?Sized,
    {
        validate_identifier(key)?;
        let column = self
            .get_column(key)?
            .ok_or_else(|| Error::UnknownColumn(key.to_string()))?;
        query.order_by(&column, direction);
        Ok(query)
    }
}

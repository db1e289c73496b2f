//! The search engine.
//!
//! [`Search`] ties a column registry to a parser and applies a fuzzy
//! predicate (and optionally relevance ordering) to a host query.

use crate::like::like_matches;
use crate::parser::{CustomSearch, FuzzySearch, SearchParser};
use crate::relevance::SortByRelevance;
use querysift_core::{ColumnDecl, Columns, Error, QueryBuilder, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

/// Which clause the fuzzy predicate is injected into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchOperator {
    /// Compare physical column expressions in `WHERE`
    #[default]
    Where,
    /// Compare selected aliases in `HAVING`, for aggregated or aliased queries
    Having,
}

impl FromStr for SearchOperator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "where" => Ok(SearchOperator::Where),
            "having" => Ok(SearchOperator::Having),
            other => Err(Error::InvalidOperator(other.to_string())),
        }
    }
}

impl fmt::Display for SearchOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchOperator::Where => write!(f, "where"),
            SearchOperator::Having => write!(f, "having"),
        }
    }
}

/// Where the expressions concatenated for relevance scoring come from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SortColumns {
    /// The same columns the predicate compares
    #[default]
    Compared,
    /// The registry's logical keys
    Keys,
    /// The registry's physical references
    Actual,
    /// An explicit list of expressions
    Explicit(Vec<String>),
}

/// Search settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Clause the predicate goes into
    pub operator: SearchOperator,
    /// Whether to order by relevance
    pub sort_by_relevance: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            operator: SearchOperator::Where,
            sort_by_relevance: true,
        }
    }
}

impl SearchConfig {
    /// Set the search operator
    pub fn with_operator(mut self, operator: SearchOperator) -> Self {
        self.operator = operator;
        self
    }

    /// Enable or disable relevance ordering
    pub fn with_sort_by_relevance(mut self, sort: bool) -> Self {
        self.sort_by_relevance = sort;
        self
    }
}

/// Fuzzy search over a column registry.
///
/// # Examples
///
/// ```rust
/// use querysift_core::{Columns, SelectQuery};
/// use querysift_search::Search;
///
/// let columns = Columns::new(vec![
///     "posts.title".into(),
///     ("author_name", "authors.name").into(),
/// ]);
/// let search = Search::new(columns).with_sort_by_relevance(false);
///
/// let mut query = SelectQuery::new("posts");
/// search.search(&mut query, "ab")?;
/// assert_eq!(
///     query.to_sql(),
///     r#"SELECT * FROM posts WHERE (posts.title LIKE "%a%b%" OR authors.name LIKE "%a%b%")"#
/// );
/// # Ok::<(), querysift_core::Error>(())
/// ```
#[derive(Clone)]
pub struct Search {
    columns: Columns,
    config: SearchConfig,
    sort_columns: Option<SortColumns>,
    parser: Arc<dyn SearchParser>,
}

impl Search {
    /// Creates a search with the default configuration: `WHERE`, relevance
    /// ordering on, sorted over the compared columns, fuzzy parser.
    pub fn new(columns: Columns) -> Self {
        Self::with_config(columns, SearchConfig::default())
    }

    /// Creates a search with explicit settings.
    pub fn with_config(columns: Columns, config: SearchConfig) -> Self {
        Self {
            columns,
            config,
            sort_columns: Some(SortColumns::Compared),
            parser: Arc::new(FuzzySearch),
        }
    }

    /// Creates a search over a raw list of comparable expressions.
    pub fn from_expressions<I, S>(expressions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            expressions
                .into_iter()
                .map(|expr| ColumnDecl::Positional(expr.into()))
                .collect(),
        )
    }

    /// Set the search operator
    pub fn with_operator(mut self, operator: SearchOperator) -> Self {
        self.config.operator = operator;
        self
    }

    /// Enable or disable relevance ordering
    pub fn with_sort_by_relevance(mut self, sort: bool) -> Self {
        self.config.sort_by_relevance = sort;
        self
    }

    /// Score relevance over `source` instead of the compared columns
    pub fn with_sort_columns(mut self, source: SortColumns) -> Self {
        self.sort_columns = Some(source);
        self
    }

    /// Remove the sort-column source.
    ///
    /// Searching with relevance ordering enabled then fails with
    /// [`Error::MissingSortColumns`].
    pub fn without_sort_columns(mut self) -> Self {
        self.sort_columns = None;
        self
    }

    /// Use a custom parser
    pub fn with_parser<P: SearchParser + 'static>(mut self, parser: P) -> Self {
        self.parser = Arc::new(parser);
        self
    }

    /// Parse search strings with `callback` instead of the fuzzy parser
    pub fn parse_using<F>(self, callback: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.with_parser(CustomSearch::new(callback))
    }

    /// Changes the operator in place.
    pub fn set_operator(&mut self, operator: SearchOperator) -> &mut Self {
        self.config.operator = operator;
        self
    }

    /// Turns relevance ordering on or off in place.
    pub fn sort_by_relevance(&mut self, sort: bool) -> &mut Self {
        self.config.sort_by_relevance = sort;
        self
    }

    /// Whether searching orders by relevance.
    pub fn should_sort_by_relevance(&self) -> bool {
        self.config.sort_by_relevance
    }

    /// The current operator.
    pub fn operator(&self) -> SearchOperator {
        self.config.operator
    }

    /// The column registry.
    pub fn columns(&self) -> &Columns {
        &self.columns
    }

    /// Physical columns under `WHERE`, logical keys under `HAVING`.
    pub fn columns_to_compare(&self) -> &[String] {
        match self.config.operator {
            SearchOperator::Where => self.columns.actual(),
            SearchOperator::Having => self.columns.keys(),
        }
    }

    /// The column to compare for `key`, if it is one of the compared columns.
    pub fn get_column(&self, key: &str) -> Option<String> {
        match self.config.operator {
            SearchOperator::Where => self.columns.find(key),
            SearchOperator::Having => self
                .columns
                .keys()
                .iter()
                .find(|compared| compared.as_str() == key)
                .cloned(),
        }
    }

    /// The expressions relevance scoring concatenates.
    pub fn sort_columns(&self) -> Result<Vec<String>> {
        match self.sort_columns.as_ref().ok_or(Error::MissingSortColumns)? {
            SortColumns::Compared => Ok(self.columns_to_compare().to_vec()),
            SortColumns::Keys => Ok(self.columns.keys().to_vec()),
            SortColumns::Actual => Ok(self.columns.actual().to_vec()),
            SortColumns::Explicit(columns) => Ok(columns.clone()),
        }
    }

    /// Parses a raw search string with the configured parser.
    pub fn parse(&self, input: &str) -> String {
        self.parser.parse(input)
    }

    /// The parenthesised `OR` group the search injects, or `None` when there
    /// are no columns to compare.
    pub fn predicate(&self, input: &str) -> Option<String> {
        let compared = self.columns_to_compare();
        if compared.is_empty() {
            return None;
        }

        let pattern = self.parse(input);
        let conditions: Vec<String> = compared
            .iter()
            .map(|column| format!("{} LIKE \"{}\"", column, pattern))
            .collect();
        Some(format!("({})", conditions.join(" OR ")))
    }

    /// Applies the search to `query` and returns it.
    ///
    /// With no columns to compare the query comes back untouched. When
    /// relevance ordering is on but no sort-column source is configured the
    /// call fails before the query is modified.
    pub fn search<'q, Q>(&self, query: &'q mut Q, input: &str) -> Result<&'q mut Q>
    where
        Q: QueryBuilder + ?Sized,
    {
        let sort_columns = if self.config.sort_by_relevance {
            Some(self.sort_columns()?)
        } else {
            None
        };

        let Some(predicate) = self.predicate(input) else {
            debug!(operator = %self.config.operator, "No columns to compare, search skipped");
            return Ok(query);
        };

        match self.config.operator {
            SearchOperator::Where => query.where_raw(&predicate),
            SearchOperator::Having => query.having_raw(&predicate),
        }
        debug!(
            operator = %self.config.operator,
            columns = self.columns_to_compare().len(),
            "Applied search predicate"
        );

        if let Some(sort_columns) = sort_columns {
            SortByRelevance::sort(&mut *query, &sort_columns, input);
        }

        Ok(query)
    }

    /// Evaluates the predicate in memory against the values of the compared
    /// columns for one row (`None` being SQL `NULL`, which never matches).
    pub fn matches(&self, input: &str, values: &[Option<&str>]) -> bool {
        if self.columns_to_compare().is_empty() {
            return true;
        }
        let pattern = self.parse(input);
        values
            .iter()
            .flatten()
            .any(|value| like_matches(value, &pattern))
    }
}

impl fmt::Debug for Search {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Search")
            .field("columns", &self.columns)
            .field("config", &self.config)
            .field("sort_columns", &self.sort_columns)
            .finish_non_exhaustive()
    }
}

//! Report grids.
//!
//! A [`GridQuery`] pairs a column registry with the query that feeds a
//! listing screen. The registry drives the select list, sort-key
//! resolution and search; the query is supplied by the host and may be set
//! after construction.

use crate::pagination::PageLimitOffset;
use crate::security::{validate_identifier, validate_search_input};
use querysift_core::{Columns, Error, OrderDirection, QueryBuilder, Result, SelectExpr};
use querysift_search::{Search, SearchConfig, SearchOperator};
use tracing::debug;

const COMPONENT: &str = "GridQuery";

/// A column registry bound to an optional host query.
///
/// Operations that write into the query fail with
/// [`Error::QueryNotSet`] until one is set.
///
/// # Examples
///
/// ```rust
/// use querysift::{Columns, GridQuery, PageLimitOffset, SelectQuery};
///
/// let mut grid = GridQuery::new(Columns::make([
///     "posts.title",
///     "authors.name as author_name",
/// ]))
/// .with_query(SelectQuery::new("posts"));
///
/// grid.select_columns()?
///     .sort_by_relevance(false)
///     .search("dp")?
///     .paginate(PageLimitOffset::new(20, 2))?;
///
/// assert_eq!(
///     grid.query().unwrap().to_sql(),
///     "SELECT posts.title, authors.name as author_name FROM posts \
///      WHERE (posts.title LIKE \"%d%p%\" OR authors.name LIKE \"%d%p%\") \
///      LIMIT 20 OFFSET 20"
/// );
/// # Ok::<(), querysift::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct GridQuery<Q> {
    search: Search,
    query: Option<Q>,
}

impl<Q: QueryBuilder> GridQuery<Q> {
    /// Creates a grid over `columns` with the default search settings and
    /// no query.
    pub fn new(columns: Columns) -> Self {
        Self::with_search(Search::new(columns))
    }

    /// Creates a grid over `columns` with explicit search settings.
    pub fn with_config(columns: Columns, config: SearchConfig) -> Self {
        Self::with_search(Search::with_config(columns, config))
    }

    /// Creates a grid around a preconfigured search. Its registry is the
    /// grid's registry.
    pub fn with_search(search: Search) -> Self {
        Self {
            search,
            query: None,
        }
    }

    /// Set the query
    pub fn with_query(mut self, query: Q) -> Self {
        self.query = Some(query);
        self
    }

    /// Sets or replaces the query.
    pub fn set_query(&mut self, query: Q) -> &mut Self {
        self.query = Some(query);
        self
    }

    /// The query, if one is set.
    pub fn query(&self) -> Option<&Q> {
        self.query.as_ref()
    }

    /// The query, or [`Error::QueryNotSet`] naming `operation`.
    pub fn query_mut(&mut self, operation: &str) -> Result<&mut Q> {
        self.query
            .as_mut()
            .ok_or_else(|| Error::query_not_set(operation, COMPONENT))
    }

    /// Takes the query out of the grid.
    pub fn into_query(self) -> Option<Q> {
        self.query
    }

    /// The grid's column registry.
    pub fn columns(&self) -> &Columns {
        self.search.columns()
    }

    /// The search applied by [`GridQuery::search`].
    pub fn search_query(&self) -> &Search {
        &self.search
    }

    /// Chooses whether the search predicate goes to `WHERE` or `HAVING`.
    pub fn set_operator(&mut self, operator: SearchOperator) -> &mut Self {
        self.search.set_operator(operator);
        self
    }

    /// Enables or disables ordering by relevance score.
    pub fn sort_by_relevance(&mut self, sort: bool) -> &mut Self {
        self.search.sort_by_relevance(sort);
        self
    }

    /// Physical column behind `key`.
    pub fn get_column(&self, key: &str) -> Option<String> {
        self.columns().find(key)
    }

    /// Physical columns behind `keys`, `None` where a key does not resolve.
    pub fn get_columns<S: AsRef<str>>(&self, keys: &[S]) -> Vec<Option<String>> {
        keys.iter().map(|key| self.get_column(key.as_ref())).collect()
    }

    /// The select list the registry declares.
    pub fn make_select(&self) -> Vec<SelectExpr> {
        self.columns().selects().to_vec()
    }

    /// Writes the registry's select list into another query.
    pub fn set_select_query<R: QueryBuilder + ?Sized>(&self, query: &mut R) {
        query.select(self.make_select());
    }

    /// Replaces the query's select list with the registry's.
    pub fn select_columns(&mut self) -> Result<&mut Self> {
        let selects = self.make_select();
        self.query_mut("select_columns")?.select(selects);
        Ok(self)
    }

    /// Searches the query for `input`.
    ///
    /// When sorting by relevance and the query has no select list yet, the
    /// query selects `<table>.*` so the score column does not replace the
    /// row columns.
    pub fn search(&mut self, input: &str) -> Result<&mut Self> {
        validate_search_input(input)?;
        let query = self
            .query
            .as_mut()
            .ok_or_else(|| Error::query_not_set("search", COMPONENT))?;
        if self.search.should_sort_by_relevance() {
            self.search.sort_columns()?;
            if !query.has_select() {
                let all = SelectExpr::Column(format!("{}.*", query.table()));
                query.select(vec![all]);
            }
        }
        self.search.search(query, input)?;
        Ok(self)
    }

    /// Orders the query by the column behind a caller-supplied `key`.
    pub fn order_by(&mut self, key: &str, direction: OrderDirection) -> Result<&mut Self> {
        validate_identifier(key)?;
        let column = self
            .get_column(key)
            .ok_or_else(|| Error::UnknownColumn(key.to_string()))?;
        self.query_mut("order_by")?.order_by(&column, direction);
        Ok(self)
    }

    /// Limits the query to one page.
    pub fn paginate(&mut self, page: PageLimitOffset) -> Result<&mut Self> {
        page.apply(self.query_mut("paginate")?);
        debug!(
            page = page.page,
            per_page = page.per_page,
            "Applied pagination"
        );
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use querysift_core::SelectQuery;

    fn grid() -> GridQuery<SelectQuery> {
        GridQuery::new(Columns::new(vec![
            "posts.title".into(),
            ("author_name", "authors.name").into(),
        ]))
    }

    #[test]
    fn test_query_not_set() {
        let mut grid = grid();
        let err = grid.search("a").unwrap_err();
        assert!(matches!(
            &err,
            Error::QueryNotSet { operation, component } if operation == "search" && *component == "GridQuery"
        ));
        assert_eq!(
            err.to_string(),
            "Query is not set. Cannot call search on GridQuery"
        );

        assert!(grid.select_columns().is_err());
        assert!(grid.paginate(PageLimitOffset::new(10, 1)).is_err());
        assert!(grid.into_query().is_none());
    }

    #[test]
    fn test_select_columns() {
        let mut grid = grid().with_query(SelectQuery::new("posts"));
        grid.select_columns().unwrap();
        assert_eq!(
            grid.query().unwrap().to_sql(),
            "SELECT posts.title, authors.name as author_name FROM posts"
        );
    }

    #[test]
    fn test_set_select_query_on_other_query() {
        let grid = grid();
        let mut other = SelectQuery::new("archived_posts");
        grid.set_select_query(&mut other);
        assert_eq!(other.columns.len(), 2);
    }

    #[test]
    fn test_get_columns() {
        let grid = grid();
        assert_eq!(grid.get_column("title").as_deref(), Some("posts.title"));
        assert_eq!(
            grid.get_columns(&["author_name", "missing"]),
            vec![Some("authors.name".to_string()), None]
        );
    }

    #[test]
    fn test_search_having() {
        let mut grid = grid().with_query(SelectQuery::new("posts"));
        grid.set_operator(SearchOperator::Having)
            .sort_by_relevance(false)
            .search("x")
            .unwrap();

        let query = grid.into_query().unwrap();
        assert!(query.wheres.is_empty());
        assert_eq!(
            query.havings,
            vec!["(title LIKE \"%x%\" OR author_name LIKE \"%x%\")".to_string()]
        );
    }

    #[test]
    fn test_relevance_search_keeps_row_columns() {
        let mut grid =
            GridQuery::new(Columns::make(["posts.title"])).with_query(SelectQuery::new("posts"));
        grid.search("ab").unwrap();

        let sql = grid.query().unwrap().to_sql();
        assert!(
            sql.starts_with("SELECT posts.*, (LOCATE('a', CONCAT(IFNULL(posts.title, '')), 1)"),
            "{}",
            sql
        );
        assert!(sql.ends_with(
            "AS sort_index FROM posts WHERE (posts.title LIKE \"%a%b%\") ORDER BY sort_index ASC"
        ));
    }

    #[test]
    fn test_relevance_search_keeps_existing_select() {
        let mut grid = grid().with_query(SelectQuery::new("posts"));
        grid.select_columns().unwrap().search("a").unwrap();

        let query = grid.query().unwrap();
        assert_eq!(query.columns.len(), 3);
        assert_eq!(query.columns[0], SelectExpr::from("posts.title"));
        assert!(query.columns[2].to_string().ends_with("AS sort_index"));
    }

    #[test]
    fn test_relevance_search_without_sort_columns_leaves_query() {
        let search = Search::new(Columns::make(["posts.title"])).without_sort_columns();
        let mut grid = GridQuery::with_search(search).with_query(SelectQuery::new("posts"));
        assert!(matches!(grid.search("a"), Err(Error::MissingSortColumns)));
        assert_eq!(grid.query().unwrap(), &SelectQuery::new("posts"));
    }

    #[test]
    fn test_search_rejects_oversized_input() {
        let mut grid = grid().with_query(SelectQuery::new("posts"));
        let long = "a".repeat(crate::security::MAX_SEARCH_LENGTH + 1);
        assert!(matches!(grid.search(&long), Err(Error::InvalidInput(_))));
        assert!(matches!(grid.search("a\0b"), Err(Error::InvalidInput(_))));
        assert_eq!(grid.query().unwrap(), &SelectQuery::new("posts"));
    }

    #[test]
    fn test_order_by_key() {
        let mut grid = grid().with_query(SelectQuery::new("posts"));
        grid.order_by("author_name", OrderDirection::Desc).unwrap();
        assert!(matches!(
            grid.order_by("nope", OrderDirection::Asc),
            Err(Error::UnknownColumn(_))
        ));
        assert_eq!(
            grid.query().unwrap().to_sql(),
            "SELECT * FROM posts ORDER BY authors.name DESC"
        );
    }

    #[test]
    fn test_set_query_later() {
        let mut grid = grid();
        grid.set_query(SelectQuery::new("posts"));
        grid.paginate(PageLimitOffset::new(25, 3)).unwrap();
        let query = grid.query().unwrap();
        assert_eq!(query.limit, Some(25));
        assert_eq!(query.offset, Some(50));
    }
}

//! # QuerySift
//!
//! Search-as-you-type for SQL query builders. Given a base query and a set
//! of searchable column declarations, QuerySift narrows the query to rows
//! whose columns fuzzy-match the user's input and orders the survivors by
//! a positional relevance score.
//!
//! ## Quick Start
//!
//! ```rust
//! use querysift::{OrderDirection, Searchable, SearchableConfig, SearchJoin, SelectQuery};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let posts = Searchable::with_config(
//!         "posts",
//!         SearchableConfig::default()
//!             .with_columns(["posts.title", "authors.name as author_name"])
//!             .with_join(SearchJoin::new("authors", "authors.id", "posts.author_id")),
//!     );
//!
//!     let mut query = SelectQuery::new("posts");
//!     posts.search(&mut query, "my daily posts")?;
//!
//!     // User-supplied sort keys resolve through the declarations
//!     posts.order_by_column(&mut query, "author_name", OrderDirection::Asc)?;
//!
//!     println!("{}", query);
//!     Ok(())
//! }
//! ```
//!
//! ## Building blocks
//!
//! - [`Columns`]: logical keys to physical columns, and select lists
//! - [`Search`]: the fuzzy `LIKE` predicate and relevance ordering
//! - [`Searchable`]: per-table configuration with joins and table fallback
//! - [`GridQuery`]: a registry bound to a host query, with pagination
//!
//! Any query builder can be searched by implementing [`QueryBuilder`];
//! [`SelectQuery`] is a plain implementation that renders MySQL SQL.

#![warn(missing_docs)]

// Re-export core types
pub use querysift_core::{
    ColumnDecl, Columns, Error, JoinClause, JoinKind, OrderByColumn, OrderDirection, QueryBuilder,
    Result, SelectExpr, SelectQuery,
};

// Search engine
pub use querysift_search::{
    like_matches, score, score_expression, strip_non_alphanumeric, CustomSearch, FuzzySearch,
    Search, SearchConfig, SearchOperator, SearchParser, SortByRelevance, SortColumns,
    SORT_INDEX_ALIAS,
};

pub mod grid;
pub mod logging;
pub mod pagination;
pub mod searchable;
pub mod security;
pub mod table_columns;

pub use grid::GridQuery;
pub use pagination::PageLimitOffset;
pub use searchable::{SearchJoin, Searchable, SearchableConfig};
pub use table_columns::{SchemaSource, TableColumns};

/// Version of the `querysift` crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_quickstart_sql() {
        let mut posts = Searchable::with_config(
            "posts",
            SearchableConfig::default()
                .with_columns(["posts.title"])
                .with_join(SearchJoin::new("authors", "authors.id", "posts.author_id")),
        );
        let mut query = SelectQuery::new("posts");
        posts.sort_by_relevance(false);
        posts.search(&mut query, "ab").unwrap();

        assert_eq!(
            query.to_sql(),
            "SELECT posts.* FROM posts LEFT JOIN authors ON authors.id = posts.author_id \
             WHERE (posts.title LIKE \"%a%b%\")"
        );
    }
}

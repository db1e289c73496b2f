//! Query building module
//!
//! The capability the search engine needs from a host query builder, plus a
//! reference builder that renders MySQL-dialect SQL.

/// SQL clause types and the reference `SelectQuery`
#[allow(missing_docs)]
pub mod ast;
/// Query-builder capability trait
pub mod builder;

// Re-export main types
pub use ast::{JoinClause, JoinKind, OrderByColumn, OrderDirection, SelectExpr, SelectQuery};
pub use builder::QueryBuilder;

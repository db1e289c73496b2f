//! # QuerySift Core
//!
//! Core types for QuerySift: the error type, the column registry and the
//! query-builder capability the search engine writes into.
//!
//! ## ⚠️ Internal Implementation Detail
//!
//! **This crate is an internal implementation detail of QuerySift.**
//! Users should depend on the main [`querysift`](https://crates.io/crates/querysift)
//! crate instead.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod columns;
pub mod error;
pub mod query;

pub use columns::{ColumnDecl, Columns};
pub use error::{Error, Result};
pub use query::{
    JoinClause, JoinKind, OrderByColumn, OrderDirection, QueryBuilder, SelectExpr, SelectQuery,
};

//! # QuerySift Search
//!
//! Fuzzy `LIKE` search and relevance ordering for QuerySift.
//!
//! ## ⚠️ Internal Implementation Detail
//!
//! **This crate is an internal implementation detail of QuerySift.**
//! Users should depend on the main [`querysift`](https://crates.io/crates/querysift)
//! crate instead.
//!
//! ## How a search is applied
//!
//! ```text
//! "My Posts" → strip → "MyPosts" → %M%y%P%o%s%t%s%
//!                                      ↓
//!          WHERE (posts.title LIKE "%M%y%P%o%s%t%s%" OR ...)
//!                                      ↓
//!          SELECT ..., (LOCATE('M', CONCAT(...), 1) + ...) AS sort_index
//!          ORDER BY sort_index ASC
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod like;
pub mod parser;
pub mod relevance;
pub mod search;

pub use like::like_matches;
pub use parser::{strip_non_alphanumeric, CustomSearch, FuzzySearch, SearchParser};
pub use relevance::{score, score_expression, SortByRelevance, SORT_INDEX_ALIAS};
pub use search::{Search, SearchConfig, SearchOperator, SortColumns};

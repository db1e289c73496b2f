//! Error types for QuerySift.

/// The main error type for QuerySift operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An operation needed the wrapped query but none was set.
    #[error("Query is not set. Cannot call {operation} on {component}")]
    QueryNotSet {
        /// Operation that was attempted
        operation: String,
        /// Component type that owns the missing query
        component: &'static str,
    },

    /// Relevance sorting was requested without a sort-column source.
    #[error("Sort by relevance requires a sort-column source")]
    MissingSortColumns,

    /// A column key did not resolve against any declaration
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    /// Unrecognised search operator (expects `where` or `having`)
    #[error("Invalid search operator: {0}")]
    InvalidOperator(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Table introspection failed
    #[error("Schema error: {0}")]
    Schema(String),
}

impl Error {
    /// Create a [`Error::QueryNotSet`] for `operation` on `component`.
    pub fn query_not_set(operation: impl Into<String>, component: &'static str) -> Self {
        Error::QueryNotSet {
            operation: operation.into(),
            component,
        }
    }
}

/// A specialized `Result` type for QuerySift operations.
pub type Result<T> = std::result::Result<T, Error>;

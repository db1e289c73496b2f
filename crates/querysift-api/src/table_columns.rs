//! Table column listing cache.
//!
//! When a host declares no searchable columns, every column of its table is
//! searched. Listing a table's columns is an introspection round trip, so
//! results are cached per table for as long as the [`TableColumns`] value
//! lives. The owner decides that lifetime and shares it by reference or
//! `Arc`; there is no process-wide cache.

use querysift_core::{Error, Result};
use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;
use tracing::debug;

/// Lists the columns of a table.
pub trait SchemaSource: Send + Sync {
    /// Column names of `table`, in table order.
    fn column_listing(&self, table: &str) -> Result<Vec<String>>;
}

impl<F> SchemaSource for F
where
    F: Fn(&str) -> Result<Vec<String>> + Send + Sync,
{
    fn column_listing(&self, table: &str) -> Result<Vec<String>> {
        self(table)
    }
}

impl SchemaSource for HashMap<String, Vec<String>> {
    fn column_listing(&self, table: &str) -> Result<Vec<String>> {
        self.get(table)
            .cloned()
            .ok_or_else(|| Error::Schema(format!("unknown table {}", table)))
    }
}

/// Per-table cache in front of a [`SchemaSource`].
pub struct TableColumns {
    source: Box<dyn SchemaSource>,
    cache: RwLock<HashMap<String, Vec<String>>>,
}

impl TableColumns {
    /// Creates an empty cache over `source`.
    pub fn new<S: SchemaSource + 'static>(source: S) -> Self {
        Self {
            source: Box::new(source),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Columns of `table`, listed once and then served from the cache.
    ///
    /// Failed listings are not cached.
    pub fn get(&self, table: &str) -> Result<Vec<String>> {
        if let Some(columns) = self
            .cache
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(table)
        {
            return Ok(columns.clone());
        }

        debug!(table, "Listing table columns");
        let columns = self.source.column_listing(table)?;
        self.cache
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(table.to_string(), columns.clone());
        Ok(columns)
    }

    /// Drops the cached listing of `table`.
    pub fn forget(&self, table: &str) {
        self.cache
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(table);
    }

    /// Drops every cached listing.
    pub fn clear(&self) {
        self.cache
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }

    /// Whether `table` has a cached listing.
    pub fn is_cached(&self, table: &str) -> bool {
        self.cache
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .contains_key(table)
    }
}

impl fmt::Debug for TableColumns {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableColumns")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_listing_is_cached() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let tables = TableColumns::new(move |table: &str| -> Result<Vec<String>> {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(vec![format!("{}_id", table), "title".to_string()])
        });

        assert_eq!(tables.get("posts").unwrap(), vec!["posts_id", "title"]);
        assert_eq!(tables.get("posts").unwrap(), vec!["posts_id", "title"]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(tables.is_cached("posts"));

        tables.forget("posts");
        tables.get("posts").unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_failed_listing_not_cached() {
        let mut schema = HashMap::new();
        schema.insert("posts".to_string(), vec!["id".to_string()]);
        let tables = TableColumns::new(schema);

        assert!(matches!(tables.get("comments"), Err(Error::Schema(_))));
        assert!(!tables.is_cached("comments"));
        assert_eq!(tables.get("posts").unwrap(), vec!["id"]);

        tables.clear();
        assert!(!tables.is_cached("posts"));
    }
}

//! Column registry.
//!
//! Maps the logical column keys callers use (`author_name`, `title`) to the
//! physical SQL column expressions the database understands
//! (`authors.name`, `posts.title`), and builds `SELECT` lists from the same
//! declarations.
//!
//! A declaration list mixes three forms:
//!
//! ```text
//! "posts.title"                  positional, key = "title"
//! "description"                  positional, key = "description"
//! "author_name" => "authors.name"  keyed,     key = "author_name"
//! "authors.age as author_age"    inline alias, key = "author_age"
//! ```

use crate::query::SelectExpr;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;

/// One entry of a column declaration list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnDecl {
    /// `"table.column"`, `"column"` or `"table.column as alias"`
    Positional(String),
    /// `key => "table.column"`
    Keyed {
        /// Logical key exposed to callers
        key: String,
        /// Physical column expression
        column: String,
    },
}

impl ColumnDecl {
    /// Creates a positional declaration.
    pub fn positional(expr: impl Into<String>) -> Self {
        ColumnDecl::Positional(expr.into())
    }

    /// Creates a keyed declaration.
    pub fn keyed(key: impl Into<String>, column: impl Into<String>) -> Self {
        ColumnDecl::Keyed {
            key: key.into(),
            column: column.into(),
        }
    }

    /// The declared column string, without the key of a keyed declaration.
    pub fn raw(&self) -> &str {
        match self {
            ColumnDecl::Positional(expr) => expr,
            ColumnDecl::Keyed { column, .. } => column,
        }
    }

    /// The select expression this declaration contributes to a `SELECT` list.
    pub fn select(&self) -> SelectExpr {
        match self {
            ColumnDecl::Keyed { key, column } => SelectExpr::Raw(format!("{} as {}", column, key)),
            ColumnDecl::Positional(expr) if split_alias(expr).is_some() => {
                SelectExpr::Raw(expr.clone())
            }
            ColumnDecl::Positional(expr) => SelectExpr::Column(expr.clone()),
        }
    }

    /// The physical column reference, with any inline alias removed.
    pub fn actual(&self) -> &str {
        match self {
            ColumnDecl::Keyed { column, .. } => column,
            ColumnDecl::Positional(expr) => match split_alias(expr) {
                Some((physical, _)) => physical,
                None => expr,
            },
        }
    }
}

impl From<&str> for ColumnDecl {
    fn from(expr: &str) -> Self {
        ColumnDecl::Positional(expr.to_string())
    }
}

impl From<String> for ColumnDecl {
    fn from(expr: String) -> Self {
        ColumnDecl::Positional(expr)
    }
}

impl<K: Into<String>, V: Into<String>> From<(K, V)> for ColumnDecl {
    fn from((key, column): (K, V)) -> Self {
        ColumnDecl::keyed(key, column)
    }
}

impl fmt::Display for ColumnDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnDecl::Positional(expr) => write!(f, "{}", expr),
            ColumnDecl::Keyed { key, column } => write!(f, "{} => {}", key, column),
        }
    }
}

/// Splits `"expr as alias"` on the first ` as `.
///
/// The keyword matches ASCII case-insensitively, so `"expr AS alias"` and
/// `"expr As alias"` split too, the way SQL reads them. The surrounding
/// spaces are required.
pub fn split_alias(select: &str) -> Option<(&str, &str)> {
    let bytes = select.as_bytes();
    if bytes.len() < 4 {
        return None;
    }
    (0..=bytes.len() - 4)
        .find(|&i| {
            bytes[i] == b' '
                && bytes[i + 1].eq_ignore_ascii_case(&b'a')
                && bytes[i + 2].eq_ignore_ascii_case(&b's')
                && bytes[i + 3] == b' '
        })
        .map(|i| (&select[..i], &select[i + 4..]))
}

/// Derives the logical key of a select expression.
///
/// `"x as alias"` yields `alias`, `"table.column"` yields `column`, anything
/// else is its own key.
pub fn key_from_select(select: &str) -> &str {
    if let Some((_, alias)) = split_alias(select) {
        return alias;
    }
    match select.rsplit_once('.') {
        Some((_, column)) => column,
        None => select,
    }
}

/// A registry of column declarations.
///
/// Built once per query-building operation. The derived lists are computed
/// at construction; the lookup cache behind [`Columns::find`] only grows.
#[derive(Debug)]
pub struct Columns {
    declarations: Vec<ColumnDecl>,
    /// Keyed declarations only, last write wins
    keyed: HashMap<String, usize>,
    selects: Vec<SelectExpr>,
    keys: Vec<String>,
    actual: Vec<String>,
    cache: RwLock<HashMap<String, String>>,
}

impl Columns {
    /// Builds a registry from an ordered declaration list.
    pub fn new(declarations: Vec<ColumnDecl>) -> Self {
        let mut keyed = HashMap::new();
        for (idx, decl) in declarations.iter().enumerate() {
            if let ColumnDecl::Keyed { key, .. } = decl {
                keyed.insert(key.clone(), idx);
            }
        }

        let selects: Vec<SelectExpr> = declarations.iter().map(ColumnDecl::select).collect();
        let keys = selects
            .iter()
            .map(|select| key_from_select(select.as_str()).to_string())
            .collect();
        let actual = declarations
            .iter()
            .map(|decl| decl.actual().to_string())
            .collect();

        Columns {
            declarations,
            keyed,
            selects,
            keys,
            actual,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Builds a registry from anything convertible into declarations.
    pub fn make<I, D>(declarations: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<ColumnDecl>,
    {
        Self::new(declarations.into_iter().map(Into::into).collect())
    }

    /// The raw declaration list.
    pub fn declarations(&self) -> &[ColumnDecl] {
        &self.declarations
    }

    /// Select expressions suitable for a query builder's `select()`.
    pub fn selects(&self) -> &[SelectExpr] {
        &self.selects
    }

    /// Logical keys, index-aligned with [`Columns::selects`].
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Physical column references, index-aligned with [`Columns::keys`].
    pub fn actual(&self) -> &[String] {
        &self.actual
    }

    /// Number of declarations.
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    /// Whether the registry has no declarations.
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Iterates `(key, actual)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.keys
            .iter()
            .zip(self.actual.iter())
            .map(|(key, actual)| (key.as_str(), actual.as_str()))
    }

    /// Finds the physical column behind `key`.
    ///
    /// Keyed declarations are matched exactly first. Otherwise declarations
    /// are scanned in order for one that equals `key`, ends with `.key`, or
    /// carries an ` as key` alias; the first hit is memoized.
    pub fn find(&self, key: &str) -> Option<String> {
        if let Some(&idx) = self.keyed.get(key) {
            return Some(self.declarations[idx].raw().to_string());
        }

        if let Some(hit) = self.cached(key) {
            return Some(hit);
        }

        let dotted = format!(".{}", key);
        let found = self.declarations.iter().find_map(|decl| {
            let column = decl.raw();
            if column == key || column.ends_with(&dotted) {
                return Some(column.to_string());
            }
            match split_alias(column) {
                Some((physical, alias)) if alias == key => Some(physical.to_string()),
                _ => None,
            }
        })?;

        self.cache
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.to_string(), found.clone());
        Some(found)
    }

    /// Explicit accessor for a column by key. Same as [`Columns::find`].
    pub fn get(&self, key: &str) -> Option<String> {
        self.find(key)
    }

    /// Whether `key` resolves to a column.
    pub fn contains(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    /// Resolves several keys in order, skipping the ones that don't resolve.
    pub fn find_many<S: AsRef<str>>(&self, keys: &[S]) -> Vec<String> {
        keys.iter().filter_map(|key| self.find(key.as_ref())).collect()
    }

    /// Whether a scan result for `key` has been memoized.
    pub fn is_cached(&self, key: &str) -> bool {
        self.cached(key).is_some()
    }

    /// A new registry holding this registry's declarations followed by `other`'s.
    pub fn merge(&self, other: &Columns) -> Columns {
        Columns::new(
            self.declarations
                .iter()
                .chain(other.declarations.iter())
                .cloned()
                .collect(),
        )
    }

    fn cached(&self, key: &str) -> Option<String> {
        self.cache
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(key)
            .cloned()
    }
}

impl Clone for Columns {
    fn clone(&self) -> Self {
        let cache = self
            .cache
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();
        Columns {
            declarations: self.declarations.clone(),
            keyed: self.keyed.clone(),
            selects: self.selects.clone(),
            keys: self.keys.clone(),
            actual: self.actual.clone(),
            cache: RwLock::new(cache),
        }
    }
}

impl Default for Columns {
    fn default() -> Self {
        Columns::new(Vec::new())
    }
}

impl From<Vec<ColumnDecl>> for Columns {
    fn from(declarations: Vec<ColumnDecl>) -> Self {
        Columns::new(declarations)
    }
}

impl FromIterator<ColumnDecl> for Columns {
    fn from_iter<I: IntoIterator<Item = ColumnDecl>>(iter: I) -> Self {
        Columns::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post_columns() -> Columns {
        Columns::new(vec![
            "posts.title".into(),
            "description".into(),
            ("author_name", "authors.name").into(),
            "authors.age as author_age".into(),
        ])
    }

    #[test]
    fn test_find_returns_actual_column() {
        let columns = post_columns();
        assert_eq!(columns.find("title").as_deref(), Some("posts.title"));
        assert_eq!(columns.find("description").as_deref(), Some("description"));
        assert_eq!(columns.find("author_name").as_deref(), Some("authors.name"));
        assert_eq!(columns.find("author_age").as_deref(), Some("authors.age"));
        assert_eq!(columns.get("author_age").as_deref(), Some("authors.age"));
    }

    #[test]
    fn test_find_unknown_key() {
        let columns = post_columns();
        assert_eq!(columns.find("title_x"), None);
        assert_eq!(columns.find("author_age_x"), None);
        assert!(!columns.contains("description_x"));
        assert!(!columns.is_cached("title_x"));
    }

    #[test]
    fn test_selects() {
        let columns = post_columns();
        let selects: Vec<String> = columns.selects().iter().map(|s| s.to_string()).collect();
        assert_eq!(
            selects,
            vec![
                "posts.title",
                "description",
                "authors.name as author_name",
                "authors.age as author_age",
            ]
        );
        assert!(matches!(columns.selects()[0], SelectExpr::Column(_)));
        assert!(matches!(columns.selects()[2], SelectExpr::Raw(_)));
        assert!(matches!(columns.selects()[3], SelectExpr::Raw(_)));
    }

    #[test]
    fn test_keys() {
        let columns = post_columns();
        assert_eq!(
            columns.keys(),
            &["title", "description", "author_name", "author_age"]
        );
        assert_eq!(columns.keys().len(), columns.selects().len());
    }

    #[test]
    fn test_actual() {
        let columns = post_columns();
        assert_eq!(
            columns.actual(),
            &["posts.title", "description", "authors.name", "authors.age"]
        );
    }

    #[test]
    fn test_find_is_memoized() {
        let columns = post_columns();
        assert!(!columns.is_cached("title"));
        let first = columns.find("title");
        assert!(columns.is_cached("title"));
        let second = columns.find("title");
        assert_eq!(first, second);

        // Keyed hits never touch the cache
        columns.find("author_name");
        assert!(!columns.is_cached("author_name"));
    }

    #[test]
    fn test_keyed_collision_last_write_wins() {
        let columns = Columns::new(vec![
            ("name", "authors.name").into(),
            ("name", "editors.name").into(),
        ]);
        assert_eq!(columns.find("name").as_deref(), Some("editors.name"));
    }

    #[test]
    fn test_first_scan_match_wins() {
        let columns = Columns::make(["posts.title", "drafts.title"]);
        assert_eq!(columns.find("title").as_deref(), Some("posts.title"));
    }

    #[test]
    fn test_key_from_select() {
        assert_eq!(key_from_select("authors.age as author_age"), "author_age");
        assert_eq!(key_from_select("authors.age AS author_age"), "author_age");
        assert_eq!(key_from_select("db.posts.title"), "title");
        assert_eq!(key_from_select("description"), "description");
    }

    #[test]
    fn test_split_alias() {
        assert_eq!(split_alias("a.b as c"), Some(("a.b", "c")));
        assert_eq!(split_alias("a.b"), None);
        assert_eq!(split_alias("alias"), None);
        assert_eq!(split_alias("has_ass"), None);
    }

    #[test]
    fn test_split_alias_any_case() {
        assert_eq!(split_alias("a.b AS c"), Some(("a.b", "c")));
        assert_eq!(split_alias("a.b As c"), Some(("a.b", "c")));
        assert_eq!(split_alias("a.bAS c"), None);

        let columns = Columns::make(["authors.age AS author_age"]);
        assert_eq!(columns.keys(), &["author_age"]);
        assert_eq!(columns.find("author_age").as_deref(), Some("authors.age"));
    }

    #[test]
    fn test_find_many_and_merge() {
        let searchable = Columns::make(["posts.title"]);
        let sortable = Columns::new(vec![("author_name", "authors.name").into()]);
        let all = searchable.merge(&sortable);

        assert_eq!(all.len(), 2);
        assert_eq!(
            all.find_many(&["title", "missing", "author_name"]),
            vec!["posts.title".to_string(), "authors.name".to_string()]
        );
    }

    #[test]
    fn test_clone_keeps_cache() {
        let columns = post_columns();
        columns.find("title");
        let cloned = columns.clone();
        assert!(cloned.is_cached("title"));
    }

    #[test]
    fn test_declarations_from_json() {
        let decls: Vec<ColumnDecl> = serde_json::from_str(
            r#"["posts.title", {"key": "author_name", "column": "authors.name"}]"#,
        )
        .unwrap();
        assert_eq!(
            decls,
            vec![
                ColumnDecl::positional("posts.title"),
                ColumnDecl::keyed("author_name", "authors.name"),
            ]
        );
    }

    #[test]
    fn test_empty_registry() {
        let columns = Columns::default();
        assert!(columns.is_empty());
        assert!(columns.keys().is_empty());
        assert_eq!(columns.find("anything"), None);
    }
}

//! SQL clause types for the reference query builder
//!
//! Defines select expressions, joins, ordering and the `SelectQuery` that
//! renders them as MySQL-dialect SQL.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One entry of a `SELECT` list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectExpr {
    /// A plain column reference such as `posts.title`
    Column(String),
    /// A raw expression emitted verbatim, such as `authors.name as author_name`
    Raw(String),
}

impl SelectExpr {
    /// Creates a raw select expression.
    pub fn raw(sql: impl Into<String>) -> Self {
        SelectExpr::Raw(sql.into())
    }

    /// The SQL text of this expression.
    pub fn as_str(&self) -> &str {
        match self {
            SelectExpr::Column(name) => name,
            SelectExpr::Raw(sql) => sql,
        }
    }
}

impl From<&str> for SelectExpr {
    fn from(name: &str) -> Self {
        SelectExpr::Column(name.to_string())
    }
}

impl From<String> for SelectExpr {
    fn from(name: String) -> Self {
        SelectExpr::Column(name)
    }
}

/// Types of joins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinKind {
    Inner,
    #[default]
    Left,
    Right,
}

/// `<kind> JOIN table ON first = second`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinClause {
    pub kind: JoinKind,
    pub table: String,
    pub first: String,
    pub second: String,
}

impl JoinClause {
    /// Creates an equi-join clause.
    pub fn new(
        kind: JoinKind,
        table: impl Into<String>,
        first: impl Into<String>,
        second: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            table: table.into(),
            first: first.into(),
            second: second.into(),
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderDirection {
    #[default]
    Asc,
    Desc,
}

/// A column in ORDER BY
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderByColumn {
    pub column: String,
    pub direction: OrderDirection,
}

/// A `SELECT` statement assembled clause by clause.
///
/// Conditions are kept as raw SQL fragments and ANDed together on render.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectQuery {
    pub table: String,
    pub columns: Vec<SelectExpr>,
    pub joins: Vec<JoinClause>,
    pub wheres: Vec<String>,
    pub group_by: Vec<String>,
    pub havings: Vec<String>,
    pub order_by: Vec<OrderByColumn>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl SelectQuery {
    /// Creates an empty query over `table`.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Default::default()
        }
    }

    /// Appends a `GROUP BY` expression.
    pub fn group_by(&mut self, expr: impl Into<String>) -> &mut Self {
        self.group_by.push(expr.into());
        self
    }

    /// Renders the query as SQL.
    pub fn to_sql(&self) -> String {
        self.to_string()
    }
}

impl From<&str> for SelectQuery {
    fn from(table: &str) -> Self {
        SelectQuery::new(table)
    }
}

// Display implementations render the SQL text

impl fmt::Display for SelectQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SELECT ")?;
        if self.columns.is_empty() {
            write!(f, "*")?;
        }
        for (i, col) in self.columns.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", col)?;
        }
        write!(f, " FROM {}", self.table)?;
        for join in &self.joins {
            write!(f, " {}", join)?;
        }
        if !self.wheres.is_empty() {
            write!(f, " WHERE {}", self.wheres.join(" AND "))?;
        }
        if !self.group_by.is_empty() {
            write!(f, " GROUP BY {}", self.group_by.join(", "))?;
        }
        if !self.havings.is_empty() {
            write!(f, " HAVING {}", self.havings.join(" AND "))?;
        }
        if !self.order_by.is_empty() {
            write!(f, " ORDER BY ")?;
            for (i, col) in self.order_by.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", col)?;
            }
        }
        if let Some(limit) = self.limit {
            write!(f, " LIMIT {}", limit)?;
        }
        if let Some(offset) = self.offset {
            write!(f, " OFFSET {}", offset)?;
        }
        Ok(())
    }
}

impl fmt::Display for SelectExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for JoinClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} JOIN {} ON {} = {}",
            self.kind, self.table, self.first, self.second
        )
    }
}

impl fmt::Display for JoinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinKind::Inner => write!(f, "INNER"),
            JoinKind::Left => write!(f, "LEFT"),
            JoinKind::Right => write!(f, "RIGHT"),
        }
    }
}

impl fmt::Display for OrderByColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.column, self.direction)
    }
}

impl fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderDirection::Asc => write!(f, "ASC"),
            OrderDirection::Desc => write!(f, "DESC"),
        }
    }
}

//! Query-builder capability.
//!
//! The search engine never owns the query it augments. It is handed a
//! `&mut` to something implementing [`QueryBuilder`] and appends raw
//! fragments to it. Only the operations the engine and the facade actually
//! call are part of the trait; there is no general forwarding.

use super::ast::{JoinClause, OrderByColumn, OrderDirection, SelectExpr, SelectQuery};

/// Mutable query handle supplied by the host.
pub trait QueryBuilder {
    /// Replaces the select list.
    fn select(&mut self, columns: Vec<SelectExpr>);

    /// Appends one expression to the select list.
    ///
    /// On an empty list this replaces the implicit `*`; callers that need
    /// the row columns select them first.
    fn add_select(&mut self, column: SelectExpr);

    /// ANDs a raw boolean fragment into the `WHERE` clause.
    fn where_raw(&mut self, sql: &str);

    /// ANDs a raw boolean fragment into the `HAVING` clause.
    fn having_raw(&mut self, sql: &str);

    /// Appends an `ORDER BY` term.
    fn order_by(&mut self, column: &str, direction: OrderDirection);

    /// Sets `LIMIT`.
    fn limit(&mut self, count: usize);

    /// Sets `OFFSET`.
    fn offset(&mut self, count: usize);

    /// Adds a join.
    fn join(&mut self, join: JoinClause);

    /// Whether a select list has been set.
    fn has_select(&self) -> bool;

    /// The base table the query reads from.
    fn table(&self) -> &str;
}

impl QueryBuilder for SelectQuery {
    fn select(&mut self, columns: Vec<SelectExpr>) {
        self.columns = columns;
    }

    fn add_select(&mut self, column: SelectExpr) {
        self.columns.push(column);
    }

    fn where_raw(&mut self, sql: &str) {
        self.wheres.push(sql.to_string());
    }

    fn having_raw(&mut self, sql: &str) {
        self.havings.push(sql.to_string());
    }

    fn order_by(&mut self, column: &str, direction: OrderDirection) {
        self.order_by.push(OrderByColumn {
            column: column.to_string(),
            direction,
        });
    }

    fn limit(&mut self, count: usize) {
        self.limit = Some(count);
    }

    fn offset(&mut self, count: usize) {
        self.offset = Some(count);
    }

    fn join(&mut self, join: JoinClause) {
        self.joins.push(join);
    }

    fn has_select(&self) -> bool {
        !self.columns.is_empty()
    }

    fn table(&self) -> &str {
        &self.table
    }
}

//! Relevance ordering.
//!
//! Adds a synthetic `sort_index` column to the query and orders by it
//! ascending. For the `i`-th character of the stripped search string the
//! score adds `LOCATE(char, concat, i + 1)`, the 1-based position of that
//! character in the concatenated sort columns at or after position `i + 1`.
//! Rows whose matches sit early in the text get small sums and sort first.
//!
//! `LOCATE` returns 0 on a miss, so a character that is absent lowers the
//! score more than a late match does. The heuristic is a positional proxy,
//! not a relevance guarantee.

use crate::like::chars_eq;
use crate::parser::strip_non_alphanumeric;
use querysift_core::query::{OrderDirection, QueryBuilder, SelectExpr};
use tracing::{debug, trace};

/// Alias of the synthetic score column.
pub const SORT_INDEX_ALIAS: &str = "sort_index";

/// Escapes a character for a single-quoted SQL literal.
pub fn escape_sql_char(c: char) -> String {
    match c {
        '\'' => "\\'".to_string(),
        '"' => "\\\"".to_string(),
        '\\' => "\\\\".to_string(),
        '\0' => "\\0".to_string(),
        c => c.to_string(),
    }
}

/// `CONCAT(IFNULL(col1, ''), IFNULL(col2, ''), ...)`
pub fn concat_expression<S: AsRef<str>>(sort_columns: &[S]) -> String {
    let guarded: Vec<String> = sort_columns
        .iter()
        .map(|column| format!("IFNULL({}, '')", column.as_ref()))
        .collect();
    format!("CONCAT({})", guarded.join(", "))
}

/// Builds the score expression, without alias.
///
/// Returns `None` when the stripped search string or the column list is
/// empty.
pub fn score_expression<S: AsRef<str>>(sort_columns: &[S], search: &str) -> Option<String> {
    let stripped = strip_non_alphanumeric(search);
    if stripped.is_empty() || sort_columns.is_empty() {
        return None;
    }

    let concat = concat_expression(sort_columns);
    let locates: Vec<String> = stripped
        .chars()
        .enumerate()
        .map(|(i, c)| format!("LOCATE('{}', {}, {})", escape_sql_char(c), concat, i + 1))
        .collect();

    Some(format!("({})", locates.join(" + ")))
}

/// Applies relevance ordering to a query.
pub struct SortByRelevance;

impl SortByRelevance {
    /// Adds `(<score>) AS sort_index` to the select list and orders by it.
    ///
    /// Leaves the query untouched when there is nothing to score.
    pub fn sort<'q, Q, S>(query: &'q mut Q, sort_columns: &[S], search: &str) -> &'q mut Q
    where
        Q: QueryBuilder + ?Sized,
        S: AsRef<str>,
    {
        let Some(expression) = score_expression(sort_columns, search) else {
            debug!(
                columns = sort_columns.len(),
                "Skipping relevance sort, nothing to score"
            );
            return query;
        };

        trace!(expression = %expression, "Relevance score expression");
        query.add_select(SelectExpr::raw(format!(
            "{} AS {}",
            expression, SORT_INDEX_ALIAS
        )));
        query.order_by(SORT_INDEX_ALIAS, OrderDirection::Asc);
        debug!(columns = sort_columns.len(), "Applied relevance sort");
        query
    }
}

/// 1-based position of `needle` in `haystack` at or after `from`, 0 if absent.
fn locate(needle: char, haystack: &[char], from: usize) -> usize {
    if from == 0 {
        return 0;
    }
    haystack
        .iter()
        .enumerate()
        .skip(from - 1)
        .find(|(_, c)| chars_eq(**c, needle))
        .map_or(0, |(idx, _)| idx + 1)
}

/// Computes in memory the value the generated `sort_index` column takes for
/// a row whose sort columns hold `values` (`None` being SQL `NULL`).
///
/// Returns `None` in the cases where no score column would be generated.
pub fn score(values: &[Option<&str>], search: &str) -> Option<usize> {
    let stripped = strip_non_alphanumeric(search);
    if stripped.is_empty() || values.is_empty() {
        return None;
    }

    let haystack: Vec<char> = values
        .iter()
        .flat_map(|value| value.unwrap_or_default().chars())
        .collect();

    Some(
        stripped
            .chars()
            .enumerate()
            .map(|(i, c)| locate(c, &haystack, i + 1))
            .sum(),
    )
}

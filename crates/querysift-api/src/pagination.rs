//! Page-number pagination.

use querysift_core::QueryBuilder;
use serde::{Deserialize, Serialize};

/// Converts a 1-based page number and page size into `LIMIT`/`OFFSET`.
///
/// Page `0` means "no pagination": both values are `0` and [`apply`]
/// leaves the query alone.
///
/// [`apply`]: PageLimitOffset::apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PageLimitOffset {
    /// Rows per page
    pub per_page: usize,
    /// 1-based page number, `0` for all rows
    pub page: usize,
}

impl PageLimitOffset {
    /// Creates a paginator for `page` of `per_page` rows.
    pub fn new(per_page: usize, page: usize) -> Self {
        Self { per_page, page }
    }

    /// `per_page` for a real page, otherwise `0`.
    pub fn limit(&self) -> usize {
        if self.page == 0 {
            0
        } else {
            self.per_page
        }
    }

    /// Rows skipped before the page starts.
    pub fn offset(&self) -> usize {
        if self.page == 0 {
            0
        } else {
            (self.page - 1).saturating_mul(self.per_page)
        }
    }

    /// Writes `LIMIT` and `OFFSET` into `query`, unless page is `0`.
    pub fn apply<Q: QueryBuilder + ?Sized>(&self, query: &mut Q) {
        if self.page == 0 {
            return;
        }
        query.limit(self.limit());
        query.offset(self.offset());
    }
}

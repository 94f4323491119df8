//! Page - one numbered page of an ordered listing
//!
//! Listings are paginated by page number with a fixed page size. A request
//! past the last page yields an empty page rather than an error.

use serde::Serialize;

/// Default number of posts per listing page
pub const DEFAULT_PAGE_SIZE: i64 = 5;

/// One page of results plus the surrounding pagination facts
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number that was requested
    pub page: i64,
    pub per_page: i64,
    pub total_items: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl<T> Page<T> {
    /// Assemble a page from the fetched items and the total row count.
    ///
    /// `page` is clamped to 1 at minimum; `total_pages` is the ceiling of
    /// `total_items / per_page` (zero items means zero pages).
    pub fn new(items: Vec<T>, page: i64, per_page: i64, total_items: i64) -> Self {
        let page = page.max(1);
        let per_page = per_page.max(1);
        let total_pages = if total_items == 0 {
            0
        } else {
            (total_items + per_page - 1) / per_page
        };

        Self {
            has_next: page < total_pages,
            has_prev: page > 1 && total_pages > 0,
            items,
            page,
            per_page,
            total_items,
            total_pages,
        }
    }

    /// An empty page (no items at all)
    pub fn empty(page: i64, per_page: i64) -> Self {
        Self::new(Vec::new(), page, per_page, 0)
    }

    /// Map the items while keeping the pagination facts
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            total_items: self.total_items,
            total_pages: self.total_pages,
            has_next: self.has_next,
            has_prev: self.has_prev,
        }
    }

    /// The OFFSET corresponding to a 1-based page number
    #[inline]
    pub fn offset(page: i64, per_page: i64) -> i64 {
        (page.max(1) - 1) * per_page
    }
}

/// The slice of a result set that one page covers.
///
/// Pages are 1-based. A missing page or page 0 means page 1. A page past the
/// end is empty rather than an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageWindow {
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl PageWindow {
    pub fn new(total: u64, per_page: u64, requested: Option<u64>) -> Self {
        let per_page = per_page.max(1);
        Self {
            page: requested.unwrap_or(1).max(1),
            per_page,
            total,
            total_pages: total.div_ceil(per_page),
        }
    }

    /// Rows to skip before this page.
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.per_page)
    }

    /// Number of rows on this page: `min(per_page, max(0, total - offset))`.
    pub fn len(&self) -> u64 {
        self.total.saturating_sub(self.offset()).min(self.per_page)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when the full result set does not fit on one page.
    pub fn is_paginated(&self) -> bool {
        self.total > self.per_page
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1 && self.total > 0
    }
}

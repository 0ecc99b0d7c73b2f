//! Offset pagination over published listings.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;
pub const MAX_LIMIT: u64 = 100;

/// A validated page window. Construct through [`PageRequest::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    limit: u64,
}

impl PageRequest {
    /// Build a window from raw query values. Missing or non-positive values
    /// fall back to the defaults and `limit` is capped at [`MAX_LIMIT`].
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        let page = page
            .filter(|p| *p >= 1)
            .map(|p| p as u64)
            .unwrap_or(DEFAULT_PAGE);
        let limit = limit
            .filter(|l| *l >= 1)
            .map(|l| (l as u64).min(MAX_LIMIT))
            .unwrap_or(DEFAULT_LIMIT);
        Self { page, limit }
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Number of pages needed to hold `total` items.
    pub fn page_count(&self, total: u64) -> u64 {
        total.div_ceil(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// One window of a listing plus the totals the client needs to page through it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page_count: u64,
    pub current_page: u64,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            page_count: request.page_count(total),
            current_page: request.page(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let req = PageRequest::default();
        assert_eq!(req.page(), 1);
        assert_eq!(req.limit(), 10);
        assert_eq!(req.offset(), 0);
    }

    #[test]
    fn test_non_positive_values_fall_back() {
        let req = PageRequest::new(Some(0), Some(-5));
        assert_eq!(req.page(), DEFAULT_PAGE);
        assert_eq!(req.limit(), DEFAULT_LIMIT);
    }

    #[test]
    fn test_limit_is_capped() {
        assert_eq!(PageRequest::new(None, Some(5000)).limit(), MAX_LIMIT);
    }

    #[test]
    fn test_offset_and_page_count() {
        let req = PageRequest::new(Some(3), Some(10));
        assert_eq!(req.offset(), 20);
        assert_eq!(req.page_count(25), 3);
        assert_eq!(req.page_count(30), 3);
        assert_eq!(req.page_count(0), 0);
    }
}

// src/recipe/page.rs

//! Page arithmetic for recipe listings

use serde::Serialize;

/// Page size used when the caller does not ask for one
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Hard cap on page size, whatever the caller requests
pub const MAX_PAGE_SIZE: u64 = 30;

/// A normalized page request (`page >= 1`, `1 <= limit <= MAX_PAGE_SIZE`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    limit: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Build a request from raw caller input, clamping out-of-range values
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        let page = match page {
            Some(p) if p >= 1 => p as u64,
            _ => 1,
        };
        let limit = match limit {
            Some(l) if l >= 1 => (l as u64).min(MAX_PAGE_SIZE),
            _ => DEFAULT_PAGE_SIZE,
        };
        Self { page, limit }
    }

    /// Build a request from raw query-string values
    ///
    /// Numbers too large for `i64` saturate, so an absurd `limit` still
    /// lands on the cap. Text that is not a number counts as absent.
    pub fn from_query(page: Option<&str>, limit: Option<&str>) -> Self {
        Self::new(
            page.and_then(parse_query_number),
            limit.and_then(parse_query_number),
        )
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    /// The effective limit (already clamped)
    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Number of records to skip
    pub fn skip(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

fn parse_query_number(text: &str) -> Option<i64> {
    let text = text.trim();
    if let Ok(n) = text.parse::<i64>() {
        return Some(n);
    }
    // Float-to-int casts saturate at the i64 bounds
    text.parse::<f64>()
        .ok()
        .filter(|n| !n.is_nan())
        .map(|n| n as i64)
}

/// One page of results plus the numbers a client needs to page further
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub results: Vec<T>,
    /// Count of all records, irrespective of paging
    pub total: u64,
    pub current_page: u64,
    pub page_size: u64,
    pub total_pages: u64,
    pub has_next_page: bool,
}

impl<T> Page<T> {
    pub fn new(results: Vec<T>, total: u64, request: PageRequest) -> Self {
        let limit = request.limit();
        Self {
            results,
            total,
            current_page: request.page(),
            page_size: limit,
            total_pages: total.div_ceil(limit),
            has_next_page: request.page().saturating_mul(limit) < total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let req = PageRequest::new(None, None);
        assert_eq!(req.page(), 1);
        assert_eq!(req.limit(), DEFAULT_PAGE_SIZE);
        assert_eq!(req.skip(), 0);
    }

    #[test]
    fn test_limit_is_capped() {
        assert_eq!(PageRequest::new(Some(1), Some(500)).limit(), MAX_PAGE_SIZE);
        assert_eq!(PageRequest::new(Some(1), Some(30)).limit(), 30);
        assert_eq!(PageRequest::new(Some(1), Some(0)).limit(), DEFAULT_PAGE_SIZE);
        assert_eq!(PageRequest::new(Some(1), Some(-4)).limit(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_page_below_one_clamped() {
        assert_eq!(PageRequest::new(Some(0), None).page(), 1);
        assert_eq!(PageRequest::new(Some(-3), None).page(), 1);
    }

    #[test]
    fn test_skip_uses_effective_limit() {
        // Requested 100 per page, capped to 30
        let req = PageRequest::new(Some(3), Some(100));
        assert_eq!(req.skip(), 60);
    }

    #[test]
    fn test_from_query_saturates() {
        let req = PageRequest::from_query(Some("2"), Some("99999999999999999999"));
        assert_eq!(req.page(), 2);
        assert_eq!(req.limit(), MAX_PAGE_SIZE);

        let req = PageRequest::from_query(Some("1e3"), Some("-99999999999999999999"));
        assert_eq!(req.page(), 1000);
        assert_eq!(req.limit(), DEFAULT_PAGE_SIZE);

        let req = PageRequest::from_query(Some("99999999999999999999"), Some("10"));
        assert_eq!(req.page(), i64::MAX as u64);
        assert_eq!(req.limit(), 10);
    }

    #[test]
    fn test_from_query_ignores_non_numbers() {
        let req = PageRequest::from_query(Some("two"), Some(""));
        assert_eq!(req, PageRequest::default());

        let req = PageRequest::from_query(Some(" 3 "), Some("NaN"));
        assert_eq!(req.page(), 3);
        assert_eq!(req.limit(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_second_page_of_fifteen() {
        let req = PageRequest::new(Some(2), Some(10));
        let page = Page::new(vec![0u8; 5], 15, req);
        assert_eq!(page.total_pages, 2);
        assert!(!page.has_next_page);
        assert_eq!(page.current_page, 2);
        assert_eq!(page.page_size, 10);
    }

    #[test]
    fn test_empty_store() {
        let page: Page<u8> = Page::new(Vec::new(), 0, PageRequest::default());
        assert_eq!(page.total_pages, 0);
        assert!(!page.has_next_page);
    }

    #[test]
    fn test_exact_multiple() {
        let page: Page<u8> = Page::new(vec![0; 10], 20, PageRequest::new(Some(1), Some(10)));
        assert!(page.has_next_page);
        assert_eq!(page.total_pages, 2);

        let page: Page<u8> = Page::new(vec![0; 10], 20, PageRequest::new(Some(2), Some(10)));
        assert!(!page.has_next_page);
    }

    #[test]
    fn test_serializes_camel_case() {
        let page: Page<u8> = Page::new(vec![1], 1, PageRequest::default());
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["currentPage"], 1);
        assert_eq!(json["pageSize"], 10);
        assert_eq!(json["totalPages"], 1);
        assert_eq!(json["hasNextPage"], false);
    }
}

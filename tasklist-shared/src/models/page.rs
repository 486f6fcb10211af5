/// Offset pagination for list views
///
/// Pages are 1-based. A page past the end is valid and simply empty, so a
/// stale "next" link never turns into an error.

use serde::{Deserialize, Serialize};

/// Number of tasks shown per page
pub const PER_PAGE: u32 = 10;

/// Position of a page within a result set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    /// Requested page (1-based)
    pub current_page: u32,

    /// Page size
    pub per_page: u32,

    /// Total matching rows across all pages
    pub total: u64,

    /// Last page that has rows (1 when there are none)
    pub last_page: u32,
}

impl PageInfo {
    /// Builds page info; `page` values below 1 are clamped to 1
    pub fn new(page: u32, per_page: u32, total: u64) -> Self {
        let per_page = per_page.max(1);
        let last_page = total.div_ceil(u64::from(per_page)).max(1);

        Self {
            current_page: page.max(1),
            per_page,
            total,
            last_page: u32::try_from(last_page).unwrap_or(u32::MAX),
        }
    }

    /// Rows to skip for this page
    pub fn offset(&self) -> u64 {
        u64::from(self.current_page - 1) * u64::from(self.per_page)
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.last_page
    }
}

/// One page of results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub info: PageInfo,
}

impl<T> Page<T> {
    /// A page with nothing in it (e.g. the guest view)
    pub fn empty(page: u32) -> Self {
        Self {
            items: Vec::new(),
            info: PageInfo::new(page, PER_PAGE, 0),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Parses a `?page=` query value the lenient way: anything unusable is page 1
pub fn parse_page(raw: Option<&str>) -> u32 {
    raw.and_then(|v| v.trim().parse::<u32>().ok())
        .filter(|p| *p >= 1)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_math() {
        let info = PageInfo::new(1, PER_PAGE, 25);
        assert_eq!(info.last_page, 3);
        assert_eq!(info.offset(), 0);
        assert!(!info.has_previous());
        assert!(info.has_next());

        let info = PageInfo::new(3, PER_PAGE, 25);
        assert_eq!(info.offset(), 20);
        assert!(info.has_previous());
        assert!(!info.has_next());
    }

    #[test]
    fn test_exact_multiple() {
        assert_eq!(PageInfo::new(1, PER_PAGE, 20).last_page, 2);
        assert_eq!(PageInfo::new(1, PER_PAGE, 10).last_page, 1);
    }

    #[test]
    fn test_empty_has_one_page() {
        let info = PageInfo::new(1, PER_PAGE, 0);
        assert_eq!(info.last_page, 1);
        assert!(!info.has_next());
    }

    #[test]
    fn test_page_zero_clamped() {
        let info = PageInfo::new(0, PER_PAGE, 5);
        assert_eq!(info.current_page, 1);
        assert_eq!(info.offset(), 0);
    }

    #[test]
    fn test_parse_page() {
        assert_eq!(parse_page(None), 1);
        assert_eq!(parse_page(Some("2")), 2);
        assert_eq!(parse_page(Some(" 4 ")), 4);
        assert_eq!(parse_page(Some("0")), 1);
        assert_eq!(parse_page(Some("-3")), 1);
        assert_eq!(parse_page(Some("abc")), 1);
    }

    #[test]
    fn test_empty_page() {
        let page: Page<i64> = Page::empty(2);
        assert!(page.is_empty());
        assert_eq!(page.info.current_page, 2);
        assert_eq!(page.info.total, 0);
    }
}

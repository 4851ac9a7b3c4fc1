//! Ordering and page arithmetic for collection queries
//!
//! # Example
//!
//! ```rust
//! use library_api::repository::{paginate, PageRequest};
//!
//! let page = paginate(1..=25, PageRequest::new(3, 10));
//! assert_eq!(page.total_pages, 3);
//! assert_eq!(page.items, vec![21, 22, 23, 24, 25]);
//! assert!(page.has_previous());
//! assert!(!page.has_next());
//! ```

use std::fmt;

use serde::Serialize;

/// Direction for ordering results
///
/// ```rust
/// use library_api::repository::OrderDirection;
///
/// assert_eq!(OrderDirection::Ascending.to_string(), "asc");
/// assert_eq!(OrderDirection::Descending.to_string(), "desc");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OrderDirection {
    /// Sort in ascending order (A-Z, 0-9)
    #[default]
    Ascending,
    /// Sort in descending order (Z-A, 9-0)
    Descending,
}

impl fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ascending => write!(f, "asc"),
            Self::Descending => write!(f, "desc"),
        }
    }
}

/// Which page of a collection to return (1-indexed)
///
/// Bounds are enforced where requests are bound, not here: a page past the
/// end simply comes back empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Page to return, starting at 1
    pub page_number: u64,
    /// Items per page
    pub page_size: u64,
}

impl PageRequest {
    /// Create a page request
    #[must_use]
    pub const fn new(page_number: u64, page_size: u64) -> Self {
        Self {
            page_number,
            page_size,
        }
    }

    /// Items to skip before this page
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.page_number.saturating_sub(1).saturating_mul(self.page_size)
    }
}

/// One page of an ordered result set with the counts needed to navigate it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items on this page, in result order
    pub items: Vec<T>,
    /// Items across all pages
    pub total_count: u64,
    /// Requested page size
    pub page_size: u64,
    /// This page's number
    pub current_page: u64,
    /// `ceil(total_count / page_size)`, zero for an empty result
    pub total_pages: u64,
}

impl<T> Page<T> {
    /// A page before this one exists; never for an empty result
    pub fn has_previous(&self) -> bool {
        self.current_page > 1 && self.total_pages > 0
    }

    /// A page after this one exists
    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// Convert the items, keeping the page counts
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            page_size: self.page_size,
            current_page: self.current_page,
            total_pages: self.total_pages,
        }
    }
}

/// Calculate total pages from total items and page size
pub fn total_pages(total_count: u64, page_size: u64) -> u64 {
    if page_size == 0 {
        0
    } else {
        total_count.div_ceil(page_size)
    }
}

/// Cut one page out of an already filtered and sorted sequence
///
/// The whole sequence is counted before slicing.
pub fn paginate<I>(source: I, request: PageRequest) -> Page<I::Item>
where
    I: IntoIterator,
{
    let all: Vec<I::Item> = source.into_iter().collect();
    let total_count = all.len() as u64;

    let skip = usize::try_from(request.offset()).unwrap_or(usize::MAX);
    let take = usize::try_from(request.page_size).unwrap_or(usize::MAX);
    let items = all.into_iter().skip(skip).take(take).collect();

    Page {
        items,
        total_count,
        page_size: request.page_size,
        current_page: request.page_number,
        total_pages: total_pages(total_count, request.page_size),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_direction_default() {
        assert_eq!(OrderDirection::default(), OrderDirection::Ascending);
    }

    #[test]
    fn test_offset() {
        assert_eq!(PageRequest::new(1, 10).offset(), 0);
        assert_eq!(PageRequest::new(3, 10).offset(), 20);
        assert_eq!(PageRequest::new(0, 10).offset(), 0);
        assert_eq!(PageRequest::new(u64::MAX, u64::MAX).offset(), u64::MAX);
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(25, 10), 3);
        assert_eq!(total_pages(5, 0), 0);
    }

    #[test]
    fn test_empty_source() {
        for current_page in [1, 2, 10] {
            let page = paginate(Vec::<u32>::new(), PageRequest::new(current_page, 10));
            assert_eq!(page.total_count, 0);
            assert_eq!(page.total_pages, 0);
            assert!(!page.has_next());
            assert!(!page.has_previous());
            assert!(page.items.is_empty());
        }
    }

    #[test]
    fn test_past_the_end_of_non_empty_result_has_previous() {
        let page = paginate(1..=5, PageRequest::new(4, 10));
        assert!(page.items.is_empty());
        assert!(page.has_previous());
        assert!(!page.has_next());
    }

    #[test]
    fn test_twenty_five_items_by_ten() {
        let first = paginate(1..=25, PageRequest::new(1, 10));
        assert_eq!(first.total_pages, 3);
        assert!(!first.has_previous());
        assert!(first.has_next());
        assert_eq!(first.items, (1..=10).collect::<Vec<_>>());

        let middle = paginate(1..=25, PageRequest::new(2, 10));
        assert!(middle.has_previous());
        assert!(middle.has_next());

        let last = paginate(1..=25, PageRequest::new(3, 10));
        assert!(last.has_previous());
        assert!(!last.has_next());
        assert_eq!(last.items.len(), 5);
    }

    #[test]
    fn test_page_past_end_is_empty() {
        let page = paginate(1..=25, PageRequest::new(7, 10));
        assert!(page.items.is_empty());
        assert_eq!(page.total_count, 25);
        assert!(!page.has_next());
        assert!(page.has_previous());
    }

    #[test]
    fn test_map_keeps_counts() {
        let page = paginate(1..=25, PageRequest::new(2, 10)).map(|n| n * 2);
        assert_eq!(page.items[0], 22);
        assert_eq!(page.total_count, 25);
        assert_eq!(page.current_page, 2);
    }
}

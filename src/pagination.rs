//! Page-number pagination shared by repositories and templates.

use serde::Serialize;

/// Categories shown per page in the management list.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 5;

/// Requested page window, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

impl Pagination {
    /// Rows to skip; saturates instead of overflowing on huge page numbers.
    pub fn offset(&self) -> usize {
        (self.page.max(1) - 1).saturating_mul(self.per_page)
    }
}

/// A single page of items plus the metadata templates need for navigation.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub has_next: bool,
    pub has_previous: bool,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, page: usize, total_items: usize, per_page: usize) -> Self {
        let total_pages = total_pages(total_items, per_page);
        Self {
            items,
            page,
            total_pages,
            total_items,
            has_next: page < total_pages,
            has_previous: page > 1,
        }
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            total_pages: self.total_pages,
            total_items: self.total_items,
            has_next: self.has_next,
            has_previous: self.has_previous,
        }
    }
}

/// Number of pages for `total_items`; an empty result still has one page.
pub fn total_pages(total_items: usize, per_page: usize) -> usize {
    total_items.div_ceil(per_page.max(1)).max(1)
}

/// Whether `page` addresses an existing page.
pub fn page_in_range(page: usize, total_items: usize, per_page: usize) -> bool {
    page >= 1 && page <= total_pages(total_items, per_page)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_has_a_single_valid_page() {
        assert_eq!(total_pages(0, 5), 1);
        assert!(page_in_range(1, 0, 5));
        assert!(!page_in_range(2, 0, 5));
    }

    #[test]
    fn page_zero_and_past_end_are_out_of_range() {
        assert!(!page_in_range(0, 12, 5));
        assert!(page_in_range(3, 12, 5));
        assert!(!page_in_range(4, 12, 5));
    }

    #[test]
    fn offset_saturates_on_huge_pages() {
        let pagination = Pagination {
            page: usize::MAX,
            per_page: 5,
        };
        assert_eq!(pagination.offset(), usize::MAX);
        assert!(!page_in_range(usize::MAX, 12, 5));
    }

    #[test]
    fn paginated_reports_neighbours() {
        let page = Paginated::new(vec![6, 7, 8, 9, 10], 2, 12, 5);
        assert_eq!(page.total_pages, 3);
        assert!(page.has_next);
        assert!(page.has_previous);

        let last = Paginated::new(vec![11, 12], 3, 12, 5);
        assert!(!last.has_next);
    }
}

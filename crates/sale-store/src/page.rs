use serde::{Deserialize, Serialize};

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items on this page.
    pub data: Vec<T>,

    /// 1-based page number.
    pub current_page: usize,

    pub page_size: usize,

    /// Number of items matching the query across all pages.
    pub total_items: usize,

    pub total_pages: usize,
}

impl<T> Page<T> {
    /// Builds a page, deriving the page count from the totals.
    pub fn new(data: Vec<T>, current_page: usize, page_size: usize, total_items: usize) -> Self {
        let total_pages = if page_size == 0 {
            0
        } else {
            total_items.div_ceil(page_size)
        };

        Self {
            data,
            current_page,
            page_size,
            total_items,
            total_pages,
        }
    }

    pub fn has_next_page(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn has_previous_page(&self) -> bool {
        self.current_page > 1
    }

    /// Converts the items while keeping the paging information.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            data: self.data.into_iter().map(f).collect(),
            current_page: self.current_page,
            page_size: self.page_size,
            total_items: self.total_items,
            total_pages: self.total_pages,
        }
    }
}

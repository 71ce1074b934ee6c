use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_PER_PAGE: u32 = 20;
pub const MAX_PER_PAGE: u32 = 100;

/// A validated, 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    per_page: u32,
}

impl PageRequest {
    pub fn new(page: u32, per_page: u32) -> Result<Self> {
        if page == 0 {
            return Err(Error::BadRequest("page must be >= 1".to_string()));
        }
        if per_page == 0 || per_page > MAX_PER_PAGE {
            return Err(Error::BadRequest(format!(
                "per_page must be between 1 and {}",
                MAX_PER_PAGE
            )));
        }
        Ok(Self { page, per_page })
    }

    /// Builds a request from optional query values, defaulting to the first page.
    pub fn from_query(page: Option<u32>, per_page: Option<u32>) -> Result<Self> {
        Self::new(page.unwrap_or(1), per_page.unwrap_or(DEFAULT_PER_PAGE))
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    pub fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.per_page as i64
    }

    pub fn limit(&self) -> i64 {
        self.per_page as i64
    }

    pub fn total_pages(&self, total: i64) -> i64 {
        if total <= 0 {
            return 0;
        }
        (total + self.per_page as i64 - 1) / self.per_page as i64
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            page: request.page(),
            per_page: request.per_page(),
            total_pages: request.total_pages(total),
        }
    }

    /// Slices an already ordered, fully materialized result set.
    pub fn from_vec(all: Vec<T>, request: PageRequest) -> Self {
        let total = all.len() as i64;
        let items = all
            .into_iter()
            .skip(request.offset() as usize)
            .take(request.per_page() as usize)
            .collect();
        Self::new(items, total, request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_page_and_oversized_pages() {
        assert!(PageRequest::new(0, 10).is_err());
        assert!(PageRequest::new(1, 0).is_err());
        assert!(PageRequest::new(1, MAX_PER_PAGE + 1).is_err());
    }

    #[test]
    fn total_pages_rounds_up() {
        let req = PageRequest::new(1, 20).unwrap();
        assert_eq!(req.total_pages(0), 0);
        assert_eq!(req.total_pages(20), 1);
        assert_eq!(req.total_pages(21), 2);
    }

    #[test]
    fn page_past_the_end_is_empty() {
        let req = PageRequest::new(4, 2).unwrap();
        let page = Page::from_vec(vec![1, 2, 3, 4, 5], req);
        assert!(page.items.is_empty());
        assert_eq!(page.total, 5);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn slices_the_requested_page() {
        let req = PageRequest::new(2, 2).unwrap();
        let page = Page::from_vec(vec![1, 2, 3, 4, 5], req);
        assert_eq!(page.items, vec![3, 4]);
    }
}

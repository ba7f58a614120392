//! Search result types for the product search service.
//!
//! This module defines the response structures returned from search and
//! aggregation operations.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Product count per category.
pub type CategoryCounts = BTreeMap<String, u64>;

/// Product count per sub-category, grouped by category.
pub type SubCategoryCounts = BTreeMap<String, BTreeMap<String, u64>>;

/// One page of search results with paging metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PageResult<T> {
    /// The 1-based page that was requested.
    pub current_page: usize,

    pub page_size: usize,

    /// Total number of matching documents.
    /// Zero when the search engine only reports a lower bound.
    pub total_count: u64,

    pub total_page: u64,

    /// Items on this page.
    pub list: Vec<T>,
}

impl<T> PageResult<T> {
    /// Create a page, deriving `total_page` from the total count and page size.
    pub fn new(list: Vec<T>, total_count: u64, current_page: usize, page_size: usize) -> Self {
        Self {
            current_page,
            page_size,
            total_count,
            total_page: total_pages(total_count, page_size),
            list,
        }
    }

    /// Create an empty page.
    pub fn empty(current_page: usize, page_size: usize) -> Self {
        Self::new(Vec::new(), 0, current_page, page_size)
    }

    /// Returns true if this page holds no items.
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Returns the number of items on this page.
    pub fn len(&self) -> usize {
        self.list.len()
    }
}

/// Number of pages needed to hold `total_count` items.
pub fn total_pages(total_count: u64, page_size: usize) -> u64 {
    if page_size == 0 {
        return 0;
    }
    total_count.div_ceil(page_size as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 20), 0);
        assert_eq!(total_pages(1, 20), 1);
        assert_eq!(total_pages(20, 20), 1);
        assert_eq!(total_pages(21, 20), 2);
        assert_eq!(total_pages(100, 0), 0);
    }

    #[test]
    fn test_page_result_empty() {
        let page: PageResult<String> = PageResult::empty(2, 10);
        assert!(page.is_empty());
        assert_eq!(page.len(), 0);
        assert_eq!(page.current_page, 2);
        assert_eq!(page.total_page, 0);
    }

    #[test]
    fn test_page_result_serializes_camel_case() {
        let page = PageResult::new(vec!["a".to_string(), "b".to_string()], 42, 1, 20);
        let json = serde_json::to_value(&page).unwrap();

        assert_eq!(json["currentPage"], 1);
        assert_eq!(json["pageSize"], 20);
        assert_eq!(json["totalCount"], 42);
        assert_eq!(json["totalPage"], 3);
        assert_eq!(json["list"].as_array().unwrap().len(), 2);
    }
}

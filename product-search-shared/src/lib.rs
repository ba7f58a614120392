//! # Product Search Shared
//!
//! This crate defines shared data structures used across the product search service.
//! It includes the product document stored in the index, the search query built from
//! HTTP parameters, and the result shapes returned to callers.

pub mod types;

pub use types::product_document::ProductDocument;
pub use types::search_query::{
    ProductSearchQuery, SortOrder, ALLOWED_SORT_FIELDS, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
    MAX_RESULT_WINDOW,
};
pub use types::search_result::{total_pages, CategoryCounts, PageResult, SubCategoryCounts};

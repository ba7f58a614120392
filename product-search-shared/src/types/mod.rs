//! This module defines the core data structures used across the product search service.
//! It re-exports specific types like `ProductDocument` and `ProductSearchQuery`.

pub mod product_document;
pub mod search_query;
pub mod search_result;

pub use product_document::ProductDocument;
pub use search_query::{ProductSearchQuery, SortOrder};
pub use search_result::{CategoryCounts, PageResult, SubCategoryCounts};

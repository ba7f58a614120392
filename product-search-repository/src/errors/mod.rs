//! Error types for the product search repository.
//!
//! This module provides a unified error type for all product index operations.

mod product_search_error;

pub use product_search_error::ProductSearchError;

//! Interface definitions for the product index provider.
//!
//! This module defines the abstract `ProductIndexProvider` trait that allows
//! for dependency injection and swappable search backend implementations.

mod product_index_provider;

pub use product_index_provider::ProductIndexProvider;

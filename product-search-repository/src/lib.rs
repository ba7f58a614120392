//! # Product Search Repository
//!
//! This crate provides traits and implementations for interacting with the
//! product index. It includes definitions for errors, interfaces, the service
//! layer, and a concrete implementation for Elasticsearch.

pub mod config;
pub mod elasticsearch;
pub mod errors;
pub mod interfaces;
pub mod service;
pub mod types;
pub mod utils;

pub use config::ProductSearchServiceConfig;
pub use crate::elasticsearch::ElasticsearchProvider;
pub use errors::ProductSearchError;
pub use interfaces::ProductIndexProvider;
pub use service::ProductSearchService;
pub use types::{BatchOperationResult, BatchOperationSummary, SearchHits, WriteOutcome};
pub use utils::{require_product_id, validate_product};

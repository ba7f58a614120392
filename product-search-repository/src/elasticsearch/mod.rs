//! Elasticsearch implementation of the product index provider.
//!
//! This module provides a concrete implementation of `ProductIndexProvider`
//! using Elasticsearch as the backend. Request bodies are built in `queries`
//! and responses are decoded in `response`, so both can be tested without a cluster.

mod index_config;
mod provider;
pub mod queries;
pub mod response;

pub use index_config::{
    IndexConfig, DEFAULT_DESCRIPTION_ANALYZER, DEFAULT_NAME_ANALYZER, INDEX_NAME,
};
pub use provider::{ConnectionOptions, ElasticsearchProvider};

//! # Product Search API
//!
//! REST service exposing product catalog search over Elasticsearch.
//!
//! ## Architecture
//!
//! Every request passes through three layers:
//!
//! 1. **Server**: Decodes the HTTP request and maps errors to status codes
//! 2. **Service**: Validates input (`product_search_repository::ProductSearchService`)
//! 3. **Provider**: Builds the Elasticsearch request and maps the response back
//!
//! ## Modules
//!
//! - [`config`]: Settings, CORS and dependency initialization
//! - [`server`]: Router, handlers and response bodies
//! - [`errors`]: HTTP error type

pub mod config;
pub mod errors;
pub mod server;

pub use config::{Dependencies, Settings};
pub use errors::ApiError;
pub use server::{create_app, run_server};

use thiserror::Error;

/// Errors that can occur during service startup or while serving.
#[derive(Error, Debug)]
pub enum StartupError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Server I/O error.
    #[error("Server error: {0}")]
    ServerError(#[from] std::io::Error),
}

impl StartupError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}

//! Product search error types.
//!
//! This module defines the unified error type for all product index operations,
//! including both low-level backend errors and high-level validation errors.

use thiserror::Error;

/// Unified errors from product index operations.
///
/// Used by the `ProductIndexProvider` trait and `ProductSearchService`. Includes both
/// low-level backend errors (connection, serialization, etc.) and request validation
/// errors that the HTTP layer reports back as bad requests.
#[derive(Debug, Clone, Error)]
pub enum ProductSearchError {
    /// Validation error (e.g., missing id or name, inverted price range).
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Failed to establish connection to Elasticsearch.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Failed to index a document.
    #[error("Index error: {0}")]
    IndexError(String),

    /// Bulk indexing request failed.
    #[error("Bulk index error: {0}")]
    BulkIndexError(String),

    /// Failed to update a document.
    #[error("Update error: {0}")]
    UpdateError(String),

    /// Failed to delete a document.
    #[error("Delete error: {0}")]
    DeleteError(String),

    /// Failed to create the product index.
    #[error("Index creation error: {0}")]
    IndexCreationError(String),

    /// Failed to delete the product index.
    #[error("Index deletion error: {0}")]
    IndexDeletionError(String),

    /// Search request failed.
    #[error("Search error: {0}")]
    SearchError(String),

    /// Aggregation request failed.
    #[error("Aggregation error: {0}")]
    AggregationError(String),

    /// Failed to parse response from Elasticsearch.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Failed to serialize data for Elasticsearch.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Document not found.
    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    /// Batch size exceeds configured maximum.
    #[error("Batch size {provided} exceeds maximum {max}")]
    BatchSizeExceeded { provided: usize, max: usize },

    /// Unknown error.
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl ProductSearchError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create an index error.
    pub fn index(msg: impl Into<String>) -> Self {
        Self::IndexError(msg.into())
    }

    /// Create a bulk index error.
    pub fn bulk_index(msg: impl Into<String>) -> Self {
        Self::BulkIndexError(msg.into())
    }

    /// Create an update error.
    pub fn update(msg: impl Into<String>) -> Self {
        Self::UpdateError(msg.into())
    }

    /// Create a delete error.
    pub fn delete(msg: impl Into<String>) -> Self {
        Self::DeleteError(msg.into())
    }

    /// Create an index creation error.
    pub fn index_creation(msg: impl Into<String>) -> Self {
        Self::IndexCreationError(msg.into())
    }

    /// Create an index deletion error.
    pub fn index_deletion(msg: impl Into<String>) -> Self {
        Self::IndexDeletionError(msg.into())
    }

    /// Create a search error.
    pub fn search(msg: impl Into<String>) -> Self {
        Self::SearchError(msg.into())
    }

    /// Create an aggregation error.
    pub fn aggregation(msg: impl Into<String>) -> Self {
        Self::AggregationError(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create a serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::SerializationError(msg.into())
    }

    /// Create a document not found error.
    pub fn document_not_found(product_id: &str) -> Self {
        Self::DocumentNotFound(format!("product_id={}", product_id))
    }

    /// Create a batch size exceeded error.
    pub fn batch_size_exceeded(provided: usize, max: usize) -> Self {
        Self::BatchSizeExceeded { provided, max }
    }

    /// Create an unknown error.
    pub fn unknown(msg: impl Into<String>) -> Self {
        Self::Unknown(msg.into())
    }

    /// Returns true if the error was caused by the caller's input rather than the backend.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_) | Self::BatchSizeExceeded { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            ProductSearchError::validation("id is required").to_string(),
            "Validation error: id is required"
        );
        assert_eq!(
            ProductSearchError::batch_size_exceeded(1500, 1000).to_string(),
            "Batch size 1500 exceeds maximum 1000"
        );
        assert_eq!(
            ProductSearchError::document_not_found("1001").to_string(),
            "Document not found: product_id=1001"
        );
    }

    #[test]
    fn test_is_client_error() {
        assert!(ProductSearchError::validation("bad").is_client_error());
        assert!(ProductSearchError::batch_size_exceeded(2, 1).is_client_error());
        assert!(!ProductSearchError::connection("refused").is_client_error());
        assert!(!ProductSearchError::document_not_found("1").is_client_error());
        assert!(!ProductSearchError::search("boom").is_client_error());
    }
}

//! Error types for the HTTP layer.

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::QueryRejection;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use product_search_repository::ProductSearchError;

/// Errors returned by the HTTP handlers.
///
/// Every variant renders as `{"status": "error", "message": ...}`.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request could not be decoded.
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// The requested product does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Error from the product search service.
    #[error(transparent)]
    Search(#[from] ProductSearchError),
}

impl ApiError {
    /// Create a bad request error.
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    /// Create a not found error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Search(ProductSearchError::DocumentNotFound(_)) => StatusCode::NOT_FOUND,
            Self::Search(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            Self::Search(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        error!(status = %status, error = %self, "Request failed");

        (
            status,
            Json(json!({
                "status": "error",
                "message": self.to_string()
            })),
        )
            .into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.to_string())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.to_string())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::bad_request("bad json").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::not_found("Product 1 not found").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(ProductSearchError::validation("id is required")).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(ProductSearchError::batch_size_exceeded(2000, 1000)).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(ProductSearchError::document_not_found("1")).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(ProductSearchError::search("timeout")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_search_errors_keep_their_message() {
        let err = ApiError::from(ProductSearchError::validation("page must be at least 1"));
        assert_eq!(err.to_string(), "Validation error: page must be at least 1");
    }
}

//! Request and response bodies of the HTTP API.

use serde::{Deserialize, Serialize};

use product_search_repository::{BatchOperationSummary, WriteOutcome};
use product_search_shared::{ProductSearchQuery, SortOrder};

/// Query parameters of the search endpoints.
///
/// `tags` accepts both repeated parameters (`tags=a&tags=b`) and
/// comma-separated values (`tags=a,b`).
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub keyword: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub sort_field: Option<String>,
    pub sort_order: Option<SortOrder>,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

impl SearchParams {
    /// Convert to a search query, using `default_page_size` when `pageSize` is absent.
    pub fn into_query(self, default_page_size: usize) -> ProductSearchQuery {
        let tags = self
            .tags
            .iter()
            .flat_map(|tags| tags.split(','))
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(String::from)
            .collect::<Vec<_>>();

        ProductSearchQuery {
            keyword: self.keyword,
            min_price: self.min_price,
            max_price: self.max_price,
            category: self.category,
            tags,
            sort_field: self.sort_field,
            sort_order: self.sort_order.unwrap_or_default(),
            page: self.page.unwrap_or(1),
            page_size: self.page_size.unwrap_or(default_page_size),
        }
    }
}

/// Response of the index management endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct IndexResponse {
    pub acknowledged: bool,
    pub message: String,
}

/// Response of single-product writes.
#[derive(Debug, Serialize, Deserialize)]
pub struct WriteResponse {
    pub status: String,
    pub message: String,
    /// The write outcome, e.g. `Created` or `NotFound`.
    pub result: String,
}

impl WriteResponse {
    pub fn success(message: impl Into<String>, outcome: WriteOutcome) -> Self {
        Self {
            status: "success".to_string(),
            message: message.into(),
            result: outcome.to_string(),
        }
    }
}

/// A product that failed in a bulk save.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchFailure {
    pub product_id: String,
    pub error: String,
}

/// Response of the bulk save endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct BatchSaveResponse {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub failures: Vec<BatchFailure>,
    pub message: String,
}

impl From<BatchOperationSummary> for BatchSaveResponse {
    fn from(summary: BatchOperationSummary) -> Self {
        let failures = summary
            .failures()
            .map(|failure| BatchFailure {
                product_id: failure.product_id.clone(),
                error: failure
                    .error
                    .as_ref()
                    .map(|e| e.to_string())
                    .unwrap_or_else(|| "unknown error".to_string()),
            })
            .collect();

        let message = if summary.has_failures() {
            format!(
                "Saved {} of {} products, {} failed",
                summary.succeeded, summary.total, summary.failed
            )
        } else {
            format!("Saved {} products", summary.succeeded)
        };

        Self {
            total: summary.total,
            succeeded: summary.succeeded,
            failed: summary.failed,
            failures,
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use product_search_repository::{BatchOperationResult, ProductSearchError};

    #[test]
    fn test_into_query_defaults() {
        let query = SearchParams::default().into_query(20);

        assert_eq!(query.page, 1);
        assert_eq!(query.page_size, 20);
        assert_eq!(query.sort_order, SortOrder::Desc);
        assert_eq!(query.effective_sort_field(), "sales");
        assert!(query.tags.is_empty());
    }

    #[test]
    fn test_into_query_splits_tags() {
        let params = SearchParams {
            tags: vec!["5G, new".to_string(), "sale".to_string(), " ".to_string()],
            ..Default::default()
        };
        let query = params.into_query(100);

        assert_eq!(query.tags, vec!["5G", "new", "sale"]);
        assert_eq!(query.page_size, 100);
    }

    #[test]
    fn test_batch_save_response_lists_failures() {
        let summary = BatchOperationSummary::from_results(vec![
            BatchOperationResult {
                product_id: "1001".to_string(),
                success: true,
                error: None,
            },
            BatchOperationResult {
                product_id: "1002".to_string(),
                success: false,
                error: Some(ProductSearchError::bulk_index("mapper_parsing_exception")),
            },
        ]);

        let response = BatchSaveResponse::from(summary);

        assert_eq!(response.total, 2);
        assert_eq!(response.failed, 1);
        assert_eq!(response.failures.len(), 1);
        assert_eq!(response.failures[0].product_id, "1002");
        assert!(response.failures[0].error.contains("mapper_parsing_exception"));
        assert_eq!(response.message, "Saved 1 of 2 products, 1 failed");
    }
}

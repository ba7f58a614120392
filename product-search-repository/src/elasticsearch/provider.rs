//! Elasticsearch provider implementation.
//!
//! This module provides the concrete implementation of `ProductIndexProvider`
//! using the official Elasticsearch Rust crate.

use async_trait::async_trait;
use elasticsearch::{
    auth::Credentials,
    http::{
        request::JsonBody,
        response::Response,
        transport::{SingleNodeConnectionPool, TransportBuilder},
        StatusCode,
    },
    indices::{IndicesCreateParts, IndicesDeleteParts, IndicesExistsParts},
    BulkParts, DeleteParts, Elasticsearch, GetParts, IndexParts, SearchParts, UpdateParts,
};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, error, info, warn};
use url::Url;

use product_search_shared::{CategoryCounts, ProductDocument, ProductSearchQuery, SubCategoryCounts};

use crate::elasticsearch::index_config::IndexConfig;
use crate::elasticsearch::queries::{self, CATEGORY_AGG, SUB_CATEGORY_AGG};
use crate::elasticsearch::response;
use crate::errors::ProductSearchError;
use crate::interfaces::ProductIndexProvider;
use crate::types::{BatchOperationSummary, SearchHits, WriteOutcome};

/// Connection options for the Elasticsearch client.
#[derive(Debug, Clone, Default)]
pub struct ConnectionOptions {
    /// Basic-auth user; credentials are only sent when this is set.
    pub username: Option<String>,
    pub password: Option<String>,
    /// Global request timeout.
    pub timeout: Option<Duration>,
}

/// Elasticsearch provider implementation.
///
/// Every trait method issues one request against the configured index.
///
/// # Example
///
/// ```ignore
/// use product_search_repository::elasticsearch::{ElasticsearchProvider, IndexConfig};
/// use product_search_shared::ProductDocument;
///
/// let provider = ElasticsearchProvider::new("http://localhost:9200", IndexConfig::default())?;
/// provider.create_index().await?;
/// provider.save_product(&ProductDocument::new("1001", "Test phone")).await?;
/// ```
pub struct ElasticsearchProvider {
    client: Elasticsearch,
    index_config: IndexConfig,
}

impl ElasticsearchProvider {
    /// Create a new provider connected to the specified URL without authentication.
    ///
    /// No request is sent; call `ping` to check that the cluster is reachable.
    ///
    /// # Arguments
    ///
    /// * `url` - The Elasticsearch server URL (e.g., "http://localhost:9200")
    /// * `index_config` - The product index configuration
    pub fn new(url: &str, index_config: IndexConfig) -> Result<Self, ProductSearchError> {
        Self::with_options(url, index_config, ConnectionOptions::default())
    }

    /// Create a new provider with authentication and timeout options.
    pub fn with_options(
        url: &str,
        index_config: IndexConfig,
        options: ConnectionOptions,
    ) -> Result<Self, ProductSearchError> {
        let parsed_url =
            Url::parse(url).map_err(|e| ProductSearchError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let mut builder = TransportBuilder::new(conn_pool).disable_proxy();

        if let Some(username) = options.username.as_ref().filter(|u| !u.is_empty()) {
            builder = builder.auth(Credentials::Basic(
                username.clone(),
                options.password.clone().unwrap_or_default(),
            ));
        }
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }

        let transport = builder
            .build()
            .map_err(|e| ProductSearchError::connection(e.to_string()))?;

        let client = Elasticsearch::new(transport);

        info!(
            url = %url,
            index = %index_config.name,
            authenticated = options.username.is_some(),
            "Created Elasticsearch provider"
        );

        Ok(Self {
            client,
            index_config,
        })
    }

    /// The index this provider operates on.
    pub fn index_config(&self) -> &IndexConfig {
        &self.index_config
    }

    fn index(&self) -> &str {
        &self.index_config.name
    }

    /// Read a successful response body as JSON, or turn a failed response into
    /// an error built by `make_error`.
    async fn read_json(
        response: Response,
        operation: &str,
        make_error: fn(String) -> ProductSearchError,
    ) -> Result<Value, ProductSearchError> {
        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, operation = %operation, "Elasticsearch request failed");
            return Err(make_error(format!(
                "{} failed with status {}: {}",
                operation, status, error_body
            )));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| ProductSearchError::parse(format!("{} response: {}", operation, e)))
    }

    fn require_id(product: &ProductDocument) -> Result<&str, ProductSearchError> {
        product
            .document_id()
            .ok_or_else(|| ProductSearchError::validation("Product id is required"))
    }
}

#[async_trait]
impl ProductIndexProvider for ElasticsearchProvider {
    async fn ping(&self) -> Result<bool, ProductSearchError> {
        let response = self
            .client
            .ping()
            .send()
            .await
            .map_err(|e| ProductSearchError::connection(e.to_string()))?;

        Ok(response.status_code().is_success())
    }

    async fn index_exists(&self) -> Result<bool, ProductSearchError> {
        let response = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[self.index()]))
            .send()
            .await
            .map_err(|e| ProductSearchError::connection(e.to_string()))?;

        let status = response.status_code();
        match status {
            s if s.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            s => Err(ProductSearchError::unknown(format!(
                "Index exists check failed with status {}",
                s
            ))),
        }
    }

    /// Create the product index with its settings and mappings.
    ///
    /// The existence check runs first, so an existing index (possibly holding data)
    /// is never recreated.
    async fn create_index(&self) -> Result<bool, ProductSearchError> {
        if self.index_exists().await? {
            info!(index = %self.index(), "Product index already exists, skipping creation");
            return Ok(true);
        }

        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(self.index()))
            .body(self.index_config.index_settings())
            .send()
            .await
            .map_err(|e| ProductSearchError::index_creation(e.to_string()))?;

        let body =
            Self::read_json(response, "Create index", ProductSearchError::IndexCreationError)
                .await?;
        let acknowledged = response::parse_acknowledged(&body);

        info!(index = %self.index(), acknowledged, "Product index created");
        Ok(acknowledged)
    }

    async fn delete_index(&self) -> Result<bool, ProductSearchError> {
        if !self.index_exists().await? {
            info!(index = %self.index(), "Product index does not exist, nothing to delete");
            return Ok(true);
        }

        let response = self
            .client
            .indices()
            .delete(IndicesDeleteParts::Index(&[self.index()]))
            .send()
            .await
            .map_err(|e| ProductSearchError::index_deletion(e.to_string()))?;

        let body =
            Self::read_json(response, "Delete index", ProductSearchError::IndexDeletionError)
                .await?;
        let acknowledged = response::parse_acknowledged(&body);

        info!(index = %self.index(), acknowledged, "Product index deleted");
        Ok(acknowledged)
    }

    async fn save_product(
        &self,
        product: &ProductDocument,
    ) -> Result<WriteOutcome, ProductSearchError> {
        let doc_id = Self::require_id(product)?;

        let response = self
            .client
            .index(IndexParts::IndexId(self.index(), doc_id))
            .body(product)
            .send()
            .await
            .map_err(|e| ProductSearchError::index(e.to_string()))?;

        let body = Self::read_json(response, "Index", ProductSearchError::IndexError).await?;
        let outcome = response::parse_write_outcome(body)?;

        info!(product_id = %doc_id, result = %outcome, "Product saved");
        Ok(outcome)
    }

    /// Index multiple products with one `_bulk` request of `index` actions.
    ///
    /// Failed items are logged with their reason and reported in the summary.
    async fn bulk_save_products(
        &self,
        products: &[ProductDocument],
    ) -> Result<BatchOperationSummary, ProductSearchError> {
        let mut product_ids = Vec::with_capacity(products.len());
        let mut body: Vec<JsonBody<Value>> = Vec::with_capacity(products.len() * 2);

        for product in products {
            let doc_id = Self::require_id(product)?;
            let source = serde_json::to_value(product)
                .map_err(|e| ProductSearchError::serialization(e.to_string()))?;

            body.push(json!({ "index": { "_id": doc_id } }).into());
            body.push(source.into());
            product_ids.push(doc_id);
        }

        let response = self
            .client
            .bulk(BulkParts::Index(self.index()))
            .body(body)
            .send()
            .await
            .map_err(|e| ProductSearchError::bulk_index(e.to_string()))?;

        let body = Self::read_json(response, "Bulk", ProductSearchError::BulkIndexError).await?;
        let summary = response::parse_bulk_response(body, &product_ids)?;

        if summary.has_failures() {
            error!(
                total = summary.total,
                failed = summary.failed,
                "Bulk save finished with failures"
            );
            for failure in summary.failures() {
                if let Some(ref e) = failure.error {
                    error!(product_id = %failure.product_id, error = %e, "Product failed to index");
                }
            }
        } else {
            info!(total = summary.total, "Bulk save succeeded");
        }

        Ok(summary)
    }

    async fn get_product(
        &self,
        product_id: &str,
    ) -> Result<Option<ProductDocument>, ProductSearchError> {
        let response = self
            .client
            .get(GetParts::IndexId(self.index(), product_id))
            .send()
            .await
            .map_err(|e| ProductSearchError::connection(e.to_string()))?;

        // A missing document answers 404 with `found: false`.
        if response.status_code() == StatusCode::NOT_FOUND {
            warn!(product_id = %product_id, "Product not found");
            return Ok(None);
        }

        let body = Self::read_json(response, "Get", ProductSearchError::Unknown).await?;
        let product = response::parse_get_response(body)?;

        match product {
            Some(_) => debug!(product_id = %product_id, "Product fetched"),
            None => warn!(product_id = %product_id, "Product not found"),
        }
        Ok(product)
    }

    /// Partially update a product with the `_update` API.
    ///
    /// Only fields present on `product` are sent, so absent fields keep their
    /// stored values.
    async fn update_product(
        &self,
        product: &ProductDocument,
    ) -> Result<WriteOutcome, ProductSearchError> {
        let doc_id = Self::require_id(product)?;

        let response = self
            .client
            .update(UpdateParts::IndexId(self.index(), doc_id))
            .body(json!({ "doc": product }))
            .send()
            .await
            .map_err(|e| ProductSearchError::update(e.to_string()))?;

        if response.status_code() == StatusCode::NOT_FOUND {
            warn!(product_id = %doc_id, "Cannot update missing product");
            return Err(ProductSearchError::document_not_found(doc_id));
        }

        let body = Self::read_json(response, "Update", ProductSearchError::UpdateError).await?;
        let outcome = response::parse_write_outcome(body)?;

        info!(product_id = %doc_id, result = %outcome, "Product updated");
        Ok(outcome)
    }

    async fn delete_product(&self, product_id: &str) -> Result<WriteOutcome, ProductSearchError> {
        let response = self
            .client
            .delete(DeleteParts::IndexId(self.index(), product_id))
            .send()
            .await
            .map_err(|e| ProductSearchError::delete(e.to_string()))?;

        // 404 is acceptable - the product may already be gone
        if response.status_code() == StatusCode::NOT_FOUND {
            info!(product_id = %product_id, "Product already absent");
            return Ok(WriteOutcome::NotFound);
        }

        let body = Self::read_json(response, "Delete", ProductSearchError::DeleteError).await?;
        let outcome = response::parse_write_outcome(body)?;

        info!(product_id = %product_id, result = %outcome, "Product deleted");
        Ok(outcome)
    }

    async fn search_products(
        &self,
        query: &ProductSearchQuery,
    ) -> Result<SearchHits, ProductSearchError> {
        let request_body = queries::build_search_body(query, &self.index_config);
        debug!(body = %request_body, "Sending search request");

        let response = self
            .client
            .search(SearchParts::Index(&[self.index()]))
            .body(request_body)
            .send()
            .await
            .map_err(|e| ProductSearchError::search(e.to_string()))?;

        let body = Self::read_json(response, "Search", ProductSearchError::SearchError).await?;
        let hits = response::parse_search_hits(body)?;

        info!(
            keyword = ?query.effective_keyword(),
            matched = hits.products.len(),
            total = ?hits.total,
            "Product search completed"
        );
        Ok(hits)
    }

    async fn aggregate_by_category(
        &self,
        size: usize,
    ) -> Result<CategoryCounts, ProductSearchError> {
        let response = self
            .client
            .search(SearchParts::Index(&[self.index()]))
            .body(queries::build_category_aggregation(size))
            .send()
            .await
            .map_err(|e| ProductSearchError::aggregation(e.to_string()))?;

        let body =
            Self::read_json(response, "Category aggregation", ProductSearchError::AggregationError)
                .await?;
        let counts = response::parse_terms_counts(body, CATEGORY_AGG)?;

        info!(categories = counts.len(), "Category aggregation completed");
        Ok(counts)
    }

    async fn aggregate_by_category_and_sub_category(
        &self,
        size: usize,
        sub_size: usize,
    ) -> Result<SubCategoryCounts, ProductSearchError> {
        let response = self
            .client
            .search(SearchParts::Index(&[self.index()]))
            .body(queries::build_category_sub_category_aggregation(
                size, sub_size,
            ))
            .send()
            .await
            .map_err(|e| ProductSearchError::aggregation(e.to_string()))?;

        let body = Self::read_json(
            response,
            "Sub-category aggregation",
            ProductSearchError::AggregationError,
        )
        .await?;
        let counts = response::parse_nested_terms_counts(body, CATEGORY_AGG, SUB_CATEGORY_AGG)?;

        info!(categories = counts.len(), "Sub-category aggregation completed");
        Ok(counts)
    }
}

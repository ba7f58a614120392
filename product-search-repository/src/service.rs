//! Product search service implementation.
//!
//! This module provides the main service for interacting with the product index.
//! The HTTP layer calls it for every operation; it validates input and delegates
//! to a `ProductIndexProvider`.

use std::sync::Arc;

use tracing::{info, instrument};

use product_search_shared::{
    CategoryCounts, PageResult, ProductDocument, ProductSearchQuery, SubCategoryCounts,
};

use crate::config::ProductSearchServiceConfig;
use crate::errors::ProductSearchError;
use crate::interfaces::ProductIndexProvider;
use crate::types::{BatchOperationSummary, WriteOutcome};
use crate::utils::{require_product_id, validate_product};

/// The main service for interacting with the product index.
///
/// This is the high-level API that application code should use. It provides input
/// validation and delegates to a `ProductIndexProvider` for actual backend operations.
/// All operations return `ProductSearchError` for consistent error handling.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use product_search_repository::ProductSearchService;
/// use product_search_repository::elasticsearch::{ElasticsearchProvider, IndexConfig};
/// use product_search_shared::{ProductDocument, ProductSearchQuery};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let provider = ElasticsearchProvider::new("http://localhost:9200", IndexConfig::default())?;
/// let service = ProductSearchService::new(Arc::new(provider));
///
/// service.create_index().await?;
/// service
///     .save_product(ProductDocument::new("1001", "Phone").with_price(2999.0))
///     .await?;
///
/// let products = service
///     .search_products(ProductSearchQuery::keyword("phone"))
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ProductSearchService {
    provider: Arc<dyn ProductIndexProvider>,
    config: ProductSearchServiceConfig,
}

impl ProductSearchService {
    /// Create a new ProductSearchService with default configuration.
    ///
    /// The default configuration includes a batch size limit of 1000 products.
    ///
    /// # Arguments
    ///
    /// * `provider` - A shared implementation of `ProductIndexProvider` (e.g., `ElasticsearchProvider`)
    pub fn new(provider: Arc<dyn ProductIndexProvider>) -> Self {
        Self {
            provider,
            config: ProductSearchServiceConfig::default(),
        }
    }

    /// Create a new ProductSearchService with custom configuration.
    ///
    /// Use this when you need to customize batch size limits or aggregation bucket counts.
    pub fn with_config(
        provider: Arc<dyn ProductIndexProvider>,
        config: ProductSearchServiceConfig,
    ) -> Self {
        Self { provider, config }
    }

    pub fn config(&self) -> &ProductSearchServiceConfig {
        &self.config
    }

    /// Check if batch size exceeds the configured limit.
    fn validate_batch_size(&self, size: usize) -> Result<(), ProductSearchError> {
        if let Some(max) = self.config.max_batch_size {
            if size > max {
                return Err(ProductSearchError::batch_size_exceeded(size, max));
            }
        }
        Ok(())
    }

    /// Create the product index if it does not exist yet.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - The index exists or was created
    /// * `Ok(false)` - Elasticsearch did not acknowledge the creation
    #[instrument(skip(self))]
    pub async fn create_index(&self) -> Result<bool, ProductSearchError> {
        self.provider.create_index().await
    }

    /// Delete the product index with all its documents.
    #[instrument(skip(self))]
    pub async fn delete_index(&self) -> Result<bool, ProductSearchError> {
        self.provider.delete_index().await
    }

    /// Save a product, replacing any document stored under the same id.
    ///
    /// # Returns
    ///
    /// * `Ok(WriteOutcome)` - `Created` for a new product, `Updated` for a replaced one
    /// * `Err(ProductSearchError::ValidationError)` - If id or productName is missing
    /// * `Err(ProductSearchError)` - If the operation fails
    #[instrument(skip_all, fields(product_id = ?product.id))]
    pub async fn save_product(
        &self,
        product: ProductDocument,
    ) -> Result<WriteOutcome, ProductSearchError> {
        validate_product(&product)?;
        self.provider.save_product(&product).await
    }

    /// Save multiple products in bulk and return a summary of successful and failed items.
    ///
    /// # Returns
    ///
    /// * `Ok(BatchOperationSummary)` - Contains total count, succeeded count, failed count,
    ///   and individual results for each product with success status and optional error
    /// * `Err(ProductSearchError::ValidationError)` - If the list is empty or any product is invalid
    /// * `Err(ProductSearchError::BatchSizeExceeded)` - If the batch size exceeds the configured maximum
    /// * `Err(ProductSearchError)` - If the bulk operation fails entirely
    ///
    /// # Note
    ///
    /// The batch size is limited by the configured `max_batch_size` (default: 1000). Individual
    /// item failures are reported in the summary rather than causing the entire operation to fail.
    #[instrument(skip_all, fields(count = products.len()))]
    pub async fn batch_save_products(
        &self,
        products: Vec<ProductDocument>,
    ) -> Result<BatchOperationSummary, ProductSearchError> {
        if products.is_empty() {
            return Err(ProductSearchError::validation(
                "Product list must not be empty",
            ));
        }

        self.validate_batch_size(products.len())?;

        for product in &products {
            validate_product(product)?;
        }

        self.provider.bulk_save_products(&products).await
    }

    /// Fetch a product by id.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(ProductDocument))` - If the product exists
    /// * `Ok(None)` - If no product is stored under the id
    #[instrument(skip(self))]
    pub async fn get_product(
        &self,
        product_id: &str,
    ) -> Result<Option<ProductDocument>, ProductSearchError> {
        let product_id = require_product_id(product_id)?;
        self.provider.get_product(product_id).await
    }

    /// Update the fields present on `product`, keeping the stored values of the rest.
    ///
    /// Fails with `DocumentNotFound` if no product is stored under the id.
    #[instrument(skip_all, fields(product_id = ?product.id))]
    pub async fn update_product(
        &self,
        product: ProductDocument,
    ) -> Result<WriteOutcome, ProductSearchError> {
        validate_product(&product)?;
        self.provider.update_product(&product).await
    }

    /// Delete a product by id.
    ///
    /// Deleting a missing product is not an error; the outcome is `NotFound`.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, product_id: &str) -> Result<WriteOutcome, ProductSearchError> {
        let product_id = require_product_id(product_id)?;
        self.provider.delete_product(product_id).await
    }

    /// Search products and return the matches on the requested page.
    #[instrument(skip_all, fields(keyword = ?query.keyword))]
    pub async fn search_products(
        &self,
        query: ProductSearchQuery,
    ) -> Result<Vec<ProductDocument>, ProductSearchError> {
        query.validate().map_err(ProductSearchError::validation)?;

        let hits = self.provider.search_products(&query).await?;
        Ok(hits.products)
    }

    /// Search products and return the requested page with paging metadata.
    ///
    /// When Elasticsearch only reports a lower bound for the hit count, `totalCount`
    /// and `totalPage` are zero.
    #[instrument(skip_all, fields(keyword = ?query.keyword, page = query.page))]
    pub async fn search_products_page(
        &self,
        query: ProductSearchQuery,
    ) -> Result<PageResult<ProductDocument>, ProductSearchError> {
        query.validate().map_err(ProductSearchError::validation)?;

        let hits = self.provider.search_products(&query).await?;
        let total_count = hits.total.unwrap_or(0);

        info!(
            total_count,
            returned = hits.products.len(),
            "Page search completed"
        );

        Ok(PageResult::new(
            hits.products,
            total_count,
            query.page,
            query.page_size,
        ))
    }

    /// Count products per category.
    #[instrument(skip(self))]
    pub async fn aggregate_by_category(&self) -> Result<CategoryCounts, ProductSearchError> {
        self.provider
            .aggregate_by_category(self.config.category_agg_size)
            .await
    }

    /// Count products per sub-category within each category.
    #[instrument(skip(self))]
    pub async fn aggregate_by_category_and_sub_category(
        &self,
    ) -> Result<SubCategoryCounts, ProductSearchError> {
        self.provider
            .aggregate_by_category_and_sub_category(
                self.config.category_agg_size,
                self.config.sub_category_agg_size,
            )
            .await
    }

    /// Returns true if Elasticsearch answers a ping.
    ///
    /// Connection failures are reported as `false` rather than an error.
    pub async fn health(&self) -> bool {
        match self.provider.ping().await {
            Ok(up) => up,
            Err(e) => {
                tracing::warn!(error = %e, "Elasticsearch ping failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BatchOperationResult, SearchHits};
    use async_trait::async_trait;
    use std::collections::BTreeMap;
    use tokio::sync::Mutex;

    /// Mock provider for testing
    struct MockProvider {
        saved: Arc<Mutex<Vec<ProductDocument>>>,
        queries: Arc<Mutex<Vec<ProductSearchQuery>>>,
        agg_sizes: Arc<Mutex<Vec<(usize, usize)>>>,
        total: Option<u64>,
        should_fail: bool,
    }

    impl MockProvider {
        fn new() -> Self {
            Self {
                saved: Arc::new(Mutex::new(Vec::new())),
                queries: Arc::new(Mutex::new(Vec::new())),
                agg_sizes: Arc::new(Mutex::new(Vec::new())),
                total: Some(45),
                should_fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                should_fail: true,
                ..Self::new()
            }
        }
    }

    #[async_trait]
    impl ProductIndexProvider for MockProvider {
        async fn ping(&self) -> Result<bool, ProductSearchError> {
            if self.should_fail {
                return Err(ProductSearchError::connection("Mock failure"));
            }
            Ok(true)
        }

        async fn index_exists(&self) -> Result<bool, ProductSearchError> {
            Ok(true)
        }

        async fn create_index(&self) -> Result<bool, ProductSearchError> {
            Ok(true)
        }

        async fn delete_index(&self) -> Result<bool, ProductSearchError> {
            Ok(true)
        }

        async fn save_product(
            &self,
            product: &ProductDocument,
        ) -> Result<WriteOutcome, ProductSearchError> {
            if self.should_fail {
                return Err(ProductSearchError::index("Mock failure"));
            }
            self.saved.lock().await.push(product.clone());
            Ok(WriteOutcome::Created)
        }

        async fn bulk_save_products(
            &self,
            products: &[ProductDocument],
        ) -> Result<BatchOperationSummary, ProductSearchError> {
            if self.should_fail {
                return Err(ProductSearchError::bulk_index("Mock failure"));
            }

            let mut results = Vec::new();
            for product in products {
                results.push(BatchOperationResult {
                    product_id: product.id.clone().unwrap_or_default(),
                    success: true,
                    error: None,
                });
                self.saved.lock().await.push(product.clone());
            }

            Ok(BatchOperationSummary::from_results(results))
        }

        async fn get_product(
            &self,
            product_id: &str,
        ) -> Result<Option<ProductDocument>, ProductSearchError> {
            let saved = self.saved.lock().await;
            Ok(saved
                .iter()
                .find(|p| p.id.as_deref() == Some(product_id))
                .cloned())
        }

        async fn update_product(
            &self,
            product: &ProductDocument,
        ) -> Result<WriteOutcome, ProductSearchError> {
            let saved = self.saved.lock().await;
            let id = product.id.as_deref().unwrap_or_default();
            if saved.iter().any(|p| p.id.as_deref() == Some(id)) {
                Ok(WriteOutcome::Updated)
            } else {
                Err(ProductSearchError::document_not_found(id))
            }
        }

        async fn delete_product(
            &self,
            product_id: &str,
        ) -> Result<WriteOutcome, ProductSearchError> {
            let mut saved = self.saved.lock().await;
            let before = saved.len();
            saved.retain(|p| p.id.as_deref() != Some(product_id));
            if saved.len() < before {
                Ok(WriteOutcome::Deleted)
            } else {
                Ok(WriteOutcome::NotFound)
            }
        }

        async fn search_products(
            &self,
            query: &ProductSearchQuery,
        ) -> Result<SearchHits, ProductSearchError> {
            if self.should_fail {
                return Err(ProductSearchError::search("Mock failure"));
            }
            self.queries.lock().await.push(query.clone());
            Ok(SearchHits {
                total: self.total,
                products: vec![ProductDocument::new("1001", "Phone")],
            })
        }

        async fn aggregate_by_category(
            &self,
            size: usize,
        ) -> Result<CategoryCounts, ProductSearchError> {
            self.agg_sizes.lock().await.push((size, 0));
            Ok(BTreeMap::from([("phone".to_string(), 12)]))
        }

        async fn aggregate_by_category_and_sub_category(
            &self,
            size: usize,
            sub_size: usize,
        ) -> Result<SubCategoryCounts, ProductSearchError> {
            self.agg_sizes.lock().await.push((size, sub_size));
            Ok(BTreeMap::from([(
                "phone".to_string(),
                BTreeMap::from([("smartphone".to_string(), 9)]),
            )]))
        }
    }

    fn products(count: usize) -> Vec<ProductDocument> {
        (0..count)
            .map(|i| ProductDocument::new(format!("{}", 1000 + i), format!("Product {}", i)))
            .collect()
    }

    #[tokio::test]
    async fn test_save_product() {
        let provider = Arc::new(MockProvider::new());
        let service = ProductSearchService::new(provider.clone());

        let outcome = service
            .save_product(ProductDocument::new("1001", "Phone"))
            .await
            .unwrap();

        assert_eq!(outcome, WriteOutcome::Created);
        assert_eq!(provider.saved.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn test_save_product_validation() {
        let provider = Arc::new(MockProvider::new());
        let service = ProductSearchService::new(provider.clone());

        // Missing name
        let mut product = ProductDocument::new("1001", "Phone");
        product.product_name = None;
        let result = service.save_product(product).await;
        assert!(matches!(result, Err(ProductSearchError::ValidationError(_))));

        // Blank id
        let result = service.save_product(ProductDocument::new("  ", "Phone")).await;
        assert!(matches!(result, Err(ProductSearchError::ValidationError(_))));

        assert!(provider.saved.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_save_product_propagates_provider_error() {
        let service = ProductSearchService::new(Arc::new(MockProvider::failing()));

        let result = service.save_product(ProductDocument::new("1001", "Phone")).await;
        assert!(matches!(result, Err(ProductSearchError::IndexError(_))));
    }

    #[tokio::test]
    async fn test_batch_save_empty() {
        let service = ProductSearchService::new(Arc::new(MockProvider::new()));

        let result = service.batch_save_products(vec![]).await;
        assert!(matches!(result, Err(ProductSearchError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_batch_save_multiple() {
        let service = ProductSearchService::new(Arc::new(MockProvider::new()));

        let result = service.batch_save_products(products(3)).await.unwrap();

        assert_eq!(result.total, 3);
        assert_eq!(result.succeeded, 3);
        assert_eq!(result.failed, 0);
        assert_eq!(result.results.len(), 3);
    }

    #[tokio::test]
    async fn test_batch_save_invalid_item_names_it() {
        let provider = Arc::new(MockProvider::new());
        let service = ProductSearchService::new(provider.clone());

        let mut batch = products(3);
        batch[1].product_name = Some(" ".to_string());

        let err = service.batch_save_products(batch).await.unwrap_err();
        assert!(matches!(err, ProductSearchError::ValidationError(_)));
        assert!(err.to_string().contains("1001"));
        assert!(provider.saved.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_batch_size_exceeded() {
        let config = ProductSearchServiceConfig::with_max_batch_size(2);
        let service = ProductSearchService::with_config(Arc::new(MockProvider::new()), config);

        let result = service.batch_save_products(products(3)).await;
        assert!(matches!(
            result,
            Err(ProductSearchError::BatchSizeExceeded {
                provided: 3,
                max: 2
            })
        ));
    }

    #[tokio::test]
    async fn test_batch_size_unlimited() {
        let config = ProductSearchServiceConfig::unlimited();
        let service = ProductSearchService::with_config(Arc::new(MockProvider::new()), config);

        let result = service.batch_save_products(products(5000)).await;
        if let Err(ProductSearchError::BatchSizeExceeded { .. }) = result {
            panic!("Batch size should not be limited with unlimited config");
        }
        assert_eq!(result.unwrap().succeeded, 5000);
    }

    #[tokio::test]
    async fn test_get_product() {
        let service = ProductSearchService::new(Arc::new(MockProvider::new()));
        service
            .save_product(ProductDocument::new("1001", "Phone"))
            .await
            .unwrap();

        let found = service.get_product("1001").await.unwrap();
        assert_eq!(found.unwrap().product_name.as_deref(), Some("Phone"));

        assert!(service.get_product("2002").await.unwrap().is_none());
        assert!(matches!(
            service.get_product("").await,
            Err(ProductSearchError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_ids_with_whitespace_round_trip() {
        let service = ProductSearchService::new(Arc::new(MockProvider::new()));
        service
            .save_product(ProductDocument::new("2001 ", "Phone"))
            .await
            .unwrap();

        assert!(service.get_product("2001 ").await.unwrap().is_some());
        assert!(service.get_product("2001").await.unwrap().is_none());
        assert_eq!(
            service.delete_product("2001 ").await.unwrap(),
            WriteOutcome::Deleted
        );
    }

    #[tokio::test]
    async fn test_update_missing_product() {
        let service = ProductSearchService::new(Arc::new(MockProvider::new()));

        let result = service
            .update_product(ProductDocument::new("404", "Ghost"))
            .await;
        assert!(matches!(result, Err(ProductSearchError::DocumentNotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_product() {
        let service = ProductSearchService::new(Arc::new(MockProvider::new()));
        service
            .save_product(ProductDocument::new("1001", "Phone"))
            .await
            .unwrap();

        assert_eq!(
            service.delete_product("1001").await.unwrap(),
            WriteOutcome::Deleted
        );
        assert_eq!(
            service.delete_product("1001").await.unwrap(),
            WriteOutcome::NotFound
        );
        assert!(service.delete_product(" ").await.is_err());
    }

    #[tokio::test]
    async fn test_search_products_rejects_invalid_query() {
        let provider = Arc::new(MockProvider::new());
        let service = ProductSearchService::new(provider.clone());

        let query = ProductSearchQuery::default().with_price_range(Some(500.0), Some(100.0));
        let err = service.search_products(query).await.unwrap_err();

        assert!(matches!(err, ProductSearchError::ValidationError(_)));
        assert!(err.to_string().contains("min_price cannot be greater than max_price"));
        assert!(provider.queries.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_search_products_page() {
        let provider = Arc::new(MockProvider::new());
        let service = ProductSearchService::new(provider.clone());

        let query = ProductSearchQuery::keyword("phone").with_page(2, 20);
        let page = service.search_products_page(query.clone()).await.unwrap();

        assert_eq!(page.current_page, 2);
        assert_eq!(page.page_size, 20);
        assert_eq!(page.total_count, 45);
        assert_eq!(page.total_page, 3);
        assert_eq!(page.len(), 1);
        assert_eq!(provider.queries.lock().await[0], query);
    }

    #[tokio::test]
    async fn test_search_products_page_without_exact_total() {
        let provider = MockProvider {
            total: None,
            ..MockProvider::new()
        };
        let service = ProductSearchService::new(Arc::new(provider));

        let page = service
            .search_products_page(ProductSearchQuery::default().with_page(1, 20))
            .await
            .unwrap();

        assert_eq!(page.total_count, 0);
        assert_eq!(page.total_page, 0);
        assert!(!page.is_empty());
    }

    #[tokio::test]
    async fn test_aggregations_use_configured_sizes() {
        let provider = Arc::new(MockProvider::new());
        let config = ProductSearchServiceConfig {
            category_agg_size: 5,
            sub_category_agg_size: 3,
            ..Default::default()
        };
        let service = ProductSearchService::with_config(provider.clone(), config);

        let counts = service.aggregate_by_category().await.unwrap();
        assert_eq!(counts.get("phone"), Some(&12));

        let nested = service.aggregate_by_category_and_sub_category().await.unwrap();
        assert_eq!(nested["phone"]["smartphone"], 9);

        assert_eq!(*provider.agg_sizes.lock().await, vec![(5, 0), (5, 3)]);
    }

    #[tokio::test]
    async fn test_health() {
        let service = ProductSearchService::new(Arc::new(MockProvider::new()));
        assert!(service.health().await);

        let service = ProductSearchService::new(Arc::new(MockProvider::failing()));
        assert!(!service.health().await);
    }
}

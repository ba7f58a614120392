//! Product index provider trait definition.
//!
//! This module defines the abstract interface for product index operations,
//! allowing for different backend implementations and mock providers in tests.

use async_trait::async_trait;

use product_search_shared::{CategoryCounts, ProductDocument, ProductSearchQuery, SubCategoryCounts};

use crate::errors::ProductSearchError;
use crate::types::{BatchOperationSummary, SearchHits, WriteOutcome};

/// Abstracts the underlying search engine holding the product index.
///
/// Implementations are injected into `ProductSearchService` to enable dependency
/// injection and easy testing with mock implementations. Providers translate each
/// call into a single request against the search engine and map the response back;
/// input validation happens in the service.
///
/// All methods return `Result<T, ProductSearchError>` for consistent error handling
/// across different backend implementations.
#[async_trait]
pub trait ProductIndexProvider: Send + Sync {
    /// Check that the search engine is reachable.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - The engine answered with a success status
    /// * `Ok(false)` - The engine answered with an error status
    /// * `Err(ProductSearchError)` - The request could not be sent
    async fn ping(&self) -> Result<bool, ProductSearchError>;

    /// Check whether the product index exists.
    async fn index_exists(&self) -> Result<bool, ProductSearchError>;

    /// Create the product index with its settings and mappings.
    ///
    /// An index that already exists is left untouched and reported as success.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - The index exists or creation was acknowledged
    /// * `Ok(false)` - The engine did not acknowledge the creation
    /// * `Err(ProductSearchError)` - If the request fails
    async fn create_index(&self) -> Result<bool, ProductSearchError>;

    /// Delete the product index.
    ///
    /// A missing index is reported as success.
    async fn delete_index(&self) -> Result<bool, ProductSearchError>;

    /// Index a product under its id, replacing any existing document.
    ///
    /// # Arguments
    ///
    /// * `product` - The product to index; its `id` becomes the document id
    ///
    /// # Returns
    ///
    /// * `Ok(WriteOutcome)` - `Created` or `Updated`
    /// * `Err(ProductSearchError)` - If the operation fails
    async fn save_product(&self, product: &ProductDocument)
        -> Result<WriteOutcome, ProductSearchError>;

    /// Index multiple products in one bulk request.
    ///
    /// Per-item failures are reported in the summary rather than as an error.
    ///
    /// # Returns
    ///
    /// * `Ok(BatchOperationSummary)` - Aggregate statistics and individual results
    /// * `Err(ProductSearchError)` - If the bulk request fails entirely
    async fn bulk_save_products(
        &self,
        products: &[ProductDocument],
    ) -> Result<BatchOperationSummary, ProductSearchError>;

    /// Fetch a product by id.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(ProductDocument))` - The stored product
    /// * `Ok(None)` - No product with that id
    /// * `Err(ProductSearchError)` - If the lookup fails
    async fn get_product(
        &self,
        product_id: &str,
    ) -> Result<Option<ProductDocument>, ProductSearchError>;

    /// Partially update a product: only fields present on `product` are changed.
    ///
    /// The product must already exist (this is not an upsert).
    async fn update_product(
        &self,
        product: &ProductDocument,
    ) -> Result<WriteOutcome, ProductSearchError>;

    /// Delete a product by id.
    ///
    /// A missing product is reported as `WriteOutcome::NotFound`, not as an error.
    async fn delete_product(&self, product_id: &str) -> Result<WriteOutcome, ProductSearchError>;

    /// Run a filtered, sorted product search.
    async fn search_products(
        &self,
        query: &ProductSearchQuery,
    ) -> Result<SearchHits, ProductSearchError>;

    /// Count products per category.
    ///
    /// # Arguments
    ///
    /// * `size` - Maximum number of categories to return
    async fn aggregate_by_category(
        &self,
        size: usize,
    ) -> Result<CategoryCounts, ProductSearchError>;

    /// Count products per sub-category within each category.
    ///
    /// # Arguments
    ///
    /// * `size` - Maximum number of categories to return
    /// * `sub_size` - Maximum number of sub-categories per category
    async fn aggregate_by_category_and_sub_category(
        &self,
        size: usize,
        sub_size: usize,
    ) -> Result<SubCategoryCounts, ProductSearchError>;
}

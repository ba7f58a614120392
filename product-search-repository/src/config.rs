//! Configuration types for the ProductSearchService.

/// Default number of category buckets returned by aggregations.
pub const DEFAULT_CATEGORY_AGG_SIZE: usize = 20;

/// Default number of sub-category buckets returned per category.
pub const DEFAULT_SUB_CATEGORY_AGG_SIZE: usize = 10;

/// Configuration for the ProductSearchService.
///
/// Controls batch limits for bulk saves and bucket counts for the category reports.
#[derive(Debug, Clone)]
pub struct ProductSearchServiceConfig {
    /// Maximum number of products allowed in a single bulk save.
    ///
    /// Set to `None` to disable the limit (not recommended for production).
    /// Defaults to 1000 if not specified.
    pub max_batch_size: Option<usize>,

    /// Number of categories returned by the category aggregations.
    pub category_agg_size: usize,

    /// Number of sub-categories returned per category.
    pub sub_category_agg_size: usize,
}

impl Default for ProductSearchServiceConfig {
    fn default() -> Self {
        Self {
            max_batch_size: Some(1000),
            category_agg_size: DEFAULT_CATEGORY_AGG_SIZE,
            sub_category_agg_size: DEFAULT_SUB_CATEGORY_AGG_SIZE,
        }
    }
}

impl ProductSearchServiceConfig {
    /// Create a config with no batch size limit.
    ///
    /// # Warning
    ///
    /// Removing batch size limits can lead to memory issues and timeouts when
    /// very large product lists are sent in one request.
    pub fn unlimited() -> Self {
        Self {
            max_batch_size: None,
            ..Default::default()
        }
    }

    /// Create a config with a custom batch size limit.
    pub fn with_max_batch_size(max_batch_size: usize) -> Self {
        Self {
            max_batch_size: Some(max_batch_size),
            ..Default::default()
        }
    }
}

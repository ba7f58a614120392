//! Elasticsearch index configuration and mappings.
//!
//! This module defines the index settings and mappings for the product index.

use serde_json::{json, Value};

/// The default name of the product index.
pub const INDEX_NAME: &str = "ecommerce_product";

/// Analyzer for `productName` (fine-grained IK segmentation).
pub const DEFAULT_NAME_ANALYZER: &str = "ik_max_word";

/// Analyzer for `description` (coarse IK segmentation).
pub const DEFAULT_DESCRIPTION_ANALYZER: &str = "ik_smart";

/// Date format of `createTime` in the index.
pub const CREATE_TIME_FORMAT: &str = "yyyy-MM-dd HH:mm:ss";

/// Configuration for the product index.
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// The index name used for all operations.
    pub name: String,
    pub number_of_shards: u32,
    pub number_of_replicas: u32,
    /// Analyzer used to index and query `productName`.
    pub name_analyzer: String,
    /// Analyzer used to index and query `description`.
    pub description_analyzer: String,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self::new(INDEX_NAME)
    }
}

impl IndexConfig {
    /// Create a new index configuration with the default IK analyzers.
    ///
    /// # Arguments
    ///
    /// * `name` - The index name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            number_of_shards: 1,
            number_of_replicas: 1,
            name_analyzer: DEFAULT_NAME_ANALYZER.to_string(),
            description_analyzer: DEFAULT_DESCRIPTION_ANALYZER.to_string(),
        }
    }

    /// Override the text analyzers, e.g. with `standard` on clusters without the IK plugin.
    pub fn with_analyzers(
        mut self,
        name_analyzer: impl Into<String>,
        description_analyzer: impl Into<String>,
    ) -> Self {
        self.name_analyzer = name_analyzer.into();
        self.description_analyzer = description_analyzer.into();
        self
    }

    /// Override shard and replica counts.
    pub fn with_shards(mut self, number_of_shards: u32, number_of_replicas: u32) -> Self {
        self.number_of_shards = number_of_shards;
        self.number_of_replicas = number_of_replicas;
        self
    }

    /// Get the index settings and mappings for the product index.
    ///
    /// The mapping follows how each field is used by the storefront:
    /// - **text** with the configured analyzers: `productName`, `description`
    /// - **keyword**: `category`, `subCategory`, `tags`, `merchantId` for filters and aggregations
    /// - **numeric**: `price`, `score` (double) and `stock`, `sales` (integer) for ranges and sorting
    /// - **date**: `createTime` in `yyyy-MM-dd HH:mm:ss`
    pub fn index_settings(&self) -> Value {
        json!({
            "settings": {
                "number_of_shards": self.number_of_shards,
                "number_of_replicas": self.number_of_replicas
            },
            "mappings": {
                "properties": {
                    "id": {
                        "type": "keyword"
                    },
                    "productName": {
                        "type": "text",
                        "analyzer": self.name_analyzer
                    },
                    "category": {
                        "type": "keyword"
                    },
                    "subCategory": {
                        "type": "keyword"
                    },
                    "price": {
                        "type": "double"
                    },
                    "stock": {
                        "type": "integer"
                    },
                    "sales": {
                        "type": "integer"
                    },
                    "tags": {
                        "type": "keyword"
                    },
                    "createTime": {
                        "type": "date",
                        "format": CREATE_TIME_FORMAT
                    },
                    "description": {
                        "type": "text",
                        "analyzer": self.description_analyzer
                    },
                    "merchantId": {
                        "type": "keyword"
                    },
                    "score": {
                        "type": "double"
                    }
                }
            }
        })
    }
}

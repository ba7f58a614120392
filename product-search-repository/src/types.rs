//! Request and response types for product index operations.

use std::fmt;
use std::str::FromStr;

use product_search_shared::ProductDocument;

use crate::errors::ProductSearchError;

/// Outcome of a single-document write, as reported in the `result` field of
/// an Elasticsearch write response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Created,
    Updated,
    Deleted,
    NotFound,
    /// The write changed nothing (e.g. a partial update with identical values).
    NoOp,
}

impl WriteOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            WriteOutcome::Created => "Created",
            WriteOutcome::Updated => "Updated",
            WriteOutcome::Deleted => "Deleted",
            WriteOutcome::NotFound => "NotFound",
            WriteOutcome::NoOp => "NoOp",
        }
    }
}

impl fmt::Display for WriteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WriteOutcome {
    type Err = ProductSearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created" => Ok(WriteOutcome::Created),
            "updated" => Ok(WriteOutcome::Updated),
            "deleted" => Ok(WriteOutcome::Deleted),
            "not_found" => Ok(WriteOutcome::NotFound),
            "noop" => Ok(WriteOutcome::NoOp),
            other => Err(ProductSearchError::parse(format!(
                "Unknown write result '{}'",
                other
            ))),
        }
    }
}

/// Result of a batch operation for a single product.
///
/// Indicates whether the item succeeded and includes error details if it failed.
#[derive(Debug, Clone)]
pub struct BatchOperationResult {
    /// The product's identifier.
    pub product_id: String,
    /// Whether the operation succeeded.
    pub success: bool,
    /// Error if the operation failed.
    pub error: Option<ProductSearchError>,
}

/// Summary of a batch operation containing aggregate statistics and individual results.
///
/// This allows callers to handle partial failures of a bulk save gracefully.
#[derive(Debug, Clone)]
pub struct BatchOperationSummary {
    /// Total number of items in the batch.
    pub total: usize,
    /// Number of successful operations.
    pub succeeded: usize,
    /// Number of failed operations.
    pub failed: usize,
    /// Individual results for each item.
    pub results: Vec<BatchOperationResult>,
}

impl BatchOperationSummary {
    /// Build a summary from per-item results.
    pub fn from_results(results: Vec<BatchOperationResult>) -> Self {
        let succeeded = results.iter().filter(|r| r.success).count();
        Self {
            total: results.len(),
            succeeded,
            failed: results.len() - succeeded,
            results,
        }
    }

    /// Returns true if at least one item failed.
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    /// Iterate over the failed items.
    pub fn failures(&self) -> impl Iterator<Item = &BatchOperationResult> {
        self.results.iter().filter(|r| !r.success)
    }
}

/// Products returned by a search, with the total hit count when it is exact.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchHits {
    /// Exact total number of matches, `None` when only a lower bound is known.
    pub total: Option<u64>,
    /// The documents on the requested page, in sort order.
    pub products: Vec<ProductDocument>,
}

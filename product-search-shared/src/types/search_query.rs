//! Search query types for the product search service.
//!
//! This module defines the query structure built from HTTP parameters and handed
//! to the search provider.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Sort field used when the caller does not pick one.
pub const DEFAULT_SORT_FIELD: &str = "sales";

/// Fields a search may be sorted by.
pub const ALLOWED_SORT_FIELDS: [&str; 4] = ["price", "sales", "score", "createTime"];

/// Largest page the service will request from the index.
pub const MAX_PAGE_SIZE: usize = 100;

/// Default page size for the paged search endpoint.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Deepest hit a page may reach (`from + size`), Elasticsearch's default
/// `index.max_result_window`.
pub const MAX_RESULT_WINDOW: usize = 10_000;

/// Sort direction.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    /// Default: best sellers first.
    #[default]
    Desc,
}

impl SortOrder {
    /// The query-DSL value for this order.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!(
                "Invalid sort order '{}', expected 'asc' or 'desc'",
                other
            )),
        }
    }
}

impl<'de> Deserialize<'de> for SortOrder {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Product search parameters.
///
/// Every criterion is optional. Criteria that are absent (or blank) contribute
/// nothing to the query, so an empty query matches every product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductSearchQuery {
    /// Full-text keyword matched against product name and description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,

    /// Inclusive lower price bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,

    /// Inclusive upper price bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,

    /// Exact category filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Products carrying any of these tags match.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Field to sort by. Defaults to `sales`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_field: Option<String>,

    #[serde(default)]
    pub sort_order: SortOrder,

    /// 1-based page number.
    #[serde(default = "default_page")]
    pub page: usize,

    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_page() -> usize {
    1
}

fn default_page_size() -> usize {
    MAX_PAGE_SIZE
}

impl Default for ProductSearchQuery {
    fn default() -> Self {
        Self {
            keyword: None,
            min_price: None,
            max_price: None,
            category: None,
            tags: Vec::new(),
            sort_field: None,
            sort_order: SortOrder::default(),
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

impl ProductSearchQuery {
    /// Create a keyword search with default paging and sorting.
    ///
    /// # Example
    ///
    /// ```
    /// use product_search_shared::{ProductSearchQuery, SortOrder};
    ///
    /// let query = ProductSearchQuery::keyword("phone")
    ///     .with_price_range(Some(1000.0), Some(5000.0))
    ///     .with_sort("price", SortOrder::Asc);
    /// assert!(query.validate().is_ok());
    /// ```
    pub fn keyword(keyword: impl Into<String>) -> Self {
        Self {
            keyword: Some(keyword.into()),
            ..Default::default()
        }
    }

    /// Set the price bounds.
    pub fn with_price_range(mut self, min_price: Option<f64>, max_price: Option<f64>) -> Self {
        self.min_price = min_price;
        self.max_price = max_price;
        self
    }

    /// Set the category filter.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set the tag filter.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Set the sort field and direction.
    pub fn with_sort(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort_field = Some(field.into());
        self.sort_order = order;
        self
    }

    /// Set the page number and page size.
    pub fn with_page(mut self, page: usize, page_size: usize) -> Self {
        self.page = page;
        self.page_size = page_size;
        self
    }

    /// The keyword, if present and not blank.
    pub fn effective_keyword(&self) -> Option<&str> {
        non_blank(self.keyword.as_deref())
    }

    /// The category, if present and not blank.
    pub fn effective_category(&self) -> Option<&str> {
        non_blank(self.category.as_deref())
    }

    /// Tags with blank entries dropped.
    pub fn effective_tags(&self) -> Vec<&str> {
        self.tags
            .iter()
            .map(|tag| tag.trim())
            .filter(|tag| !tag.is_empty())
            .collect()
    }

    /// The sort field, falling back to `sales`.
    pub fn effective_sort_field(&self) -> &str {
        non_blank(self.sort_field.as_deref()).unwrap_or(DEFAULT_SORT_FIELD)
    }

    /// Offset of the first hit on the requested page.
    pub fn from(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.page_size)
    }

    /// Validate the query parameters.
    ///
    /// Returns an error message if validation fails.
    pub fn validate(&self) -> Result<(), String> {
        if let (Some(min), Some(max)) = (self.min_price, self.max_price) {
            if min > max {
                return Err("min_price cannot be greater than max_price".to_string());
            }
        }

        if self.page < 1 {
            return Err("page must be at least 1".to_string());
        }

        if self.page_size < 1 || self.page_size > MAX_PAGE_SIZE {
            return Err(format!("page_size must be between 1 and {}", MAX_PAGE_SIZE));
        }

        let window = (self.page - 1)
            .checked_mul(self.page_size)
            .and_then(|from| from.checked_add(self.page_size));
        if !window.is_some_and(|end| end <= MAX_RESULT_WINDOW) {
            return Err(format!(
                "page {} with page_size {} is beyond the first {} results",
                self.page, self.page_size, MAX_RESULT_WINDOW
            ));
        }

        if let Some(field) = non_blank(self.sort_field.as_deref()) {
            if !ALLOWED_SORT_FIELDS.contains(&field) {
                return Err(format!(
                    "Cannot sort by '{}', allowed fields are: {}",
                    field,
                    ALLOWED_SORT_FIELDS.join(", ")
                ));
            }
        }

        Ok(())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

//! Product document types for the search index.
//!
//! This module defines the document structure that is indexed in the search engine
//! and exchanged with HTTP clients.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Text format used for `createTime`, both over HTTP and in the index mapping.
pub const CREATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Document representation for the product index.
///
/// Every field is optional on the wire so that a request missing its id or name
/// decodes successfully and is rejected by validation with a readable message,
/// rather than failing deserialization.
///
/// # Fields
///
/// - `id`: Product identifier, also used as the document `_id`
/// - `product_name`: Display name (full-text searched)
/// - `category` / `sub_category`: Exact-match filters and aggregation keys
/// - `price`: Used for range filters and sorting
/// - `stock` / `sales`: Inventory and sales counters
/// - `tags`: Free-form labels such as "new" or "free-shipping"
/// - `create_time`: Listing time, `yyyy-MM-dd HH:mm:ss`
/// - `description`: Long text (full-text searched)
/// - `merchant_id`: Owning merchant
/// - `score`: Customer rating
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sales: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(
        default,
        with = "create_time_format",
        skip_serializing_if = "Option::is_none"
    )]
    pub create_time: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl ProductDocument {
    /// Create a new document with only the required fields set.
    ///
    /// # Example
    ///
    /// ```
    /// use product_search_shared::ProductDocument;
    ///
    /// let doc = ProductDocument::new("1001", "Test phone")
    ///     .with_category("phone", "smartphone")
    ///     .with_price(2999.99);
    /// assert!(doc.has_required_fields());
    /// ```
    pub fn new(id: impl Into<String>, product_name: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            product_name: Some(product_name.into()),
            ..Default::default()
        }
    }

    /// Set the category and sub-category.
    pub fn with_category(
        mut self,
        category: impl Into<String>,
        sub_category: impl Into<String>,
    ) -> Self {
        self.category = Some(category.into());
        self.sub_category = Some(sub_category.into());
        self
    }

    /// Set the price.
    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    /// Set stock and sales counters.
    pub fn with_inventory(mut self, stock: i32, sales: i32) -> Self {
        self.stock = Some(stock);
        self.sales = Some(sales);
        self
    }

    /// Set the tags.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the listing time.
    pub fn with_create_time(mut self, create_time: NaiveDateTime) -> Self {
        self.create_time = Some(create_time);
        self
    }

    /// Set the owning merchant.
    pub fn with_merchant(mut self, merchant_id: impl Into<String>) -> Self {
        self.merchant_id = Some(merchant_id.into());
        self
    }

    /// Set the rating score.
    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    /// The document ID used in the index, if the product has a usable id.
    pub fn document_id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.trim().is_empty())
    }

    /// Returns true when both `id` and `product_name` are present and not blank.
    pub fn has_required_fields(&self) -> bool {
        self.document_id().is_some()
            && self
                .product_name
                .as_deref()
                .is_some_and(|name| !name.trim().is_empty())
    }
}

/// Serde adapter for `Option<NaiveDateTime>` in `yyyy-MM-dd HH:mm:ss` form.
mod create_time_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::CREATE_TIME_FORMAT;

    pub fn serialize<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(time) => serializer.serialize_str(&time.format(CREATE_TIME_FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw {
            Some(text) if !text.trim().is_empty() => {
                NaiveDateTime::parse_from_str(text.trim(), CREATE_TIME_FORMAT)
                    .map(Some)
                    .map_err(serde::de::Error::custom)
            }
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 1, 5)
            .unwrap()
            .and_hms_opt(15, 43, 0)
            .unwrap()
    }

    #[test]
    fn test_product_document_new() {
        let doc = ProductDocument::new("1001", "Test phone");

        assert_eq!(doc.id.as_deref(), Some("1001"));
        assert_eq!(doc.product_name.as_deref(), Some("Test phone"));
        assert!(doc.category.is_none());
        assert!(doc.price.is_none());
        assert!(doc.tags.is_none());
        assert!(doc.has_required_fields());
    }

    #[test]
    fn test_has_required_fields() {
        assert!(!ProductDocument::default().has_required_fields());

        let mut doc = ProductDocument::new("1001", "Phone");
        doc.product_name = None;
        assert!(!doc.has_required_fields());

        let doc = ProductDocument::new("   ", "Phone");
        assert!(!doc.has_required_fields());

        let doc = ProductDocument::new("1001", "");
        assert!(!doc.has_required_fields());
    }

    #[test]
    fn test_serializes_camel_case_and_skips_none() {
        let doc = ProductDocument::new("1001", "Test phone")
            .with_category("phone", "smartphone")
            .with_merchant("merchant_001")
            .with_create_time(sample_time());

        let json = serde_json::to_value(&doc).unwrap();

        assert_eq!(json["productName"], "Test phone");
        assert_eq!(json["subCategory"], "smartphone");
        assert_eq!(json["merchantId"], "merchant_001");
        assert_eq!(json["createTime"], "2026-01-05 15:43:00");
        assert!(json.get("price").is_none());
        assert!(json.get("description").is_none());
    }

    #[test]
    fn test_deserializes_request_body() {
        let body = r#"{
            "id": "1001",
            "productName": "Test phone",
            "category": "phone",
            "subCategory": "smartphone",
            "price": 2999.99,
            "stock": 100,
            "sales": 50,
            "tags": ["smart", "5G", "new"],
            "createTime": "2026-01-05 15:43:00",
            "description": "A capable test phone",
            "merchantId": "merchant_001",
            "score": 4.5,
            "unknownField": true
        }"#;

        let doc: ProductDocument = serde_json::from_str(body).unwrap();

        assert_eq!(doc.id.as_deref(), Some("1001"));
        assert_eq!(doc.price, Some(2999.99));
        assert_eq!(doc.stock, Some(100));
        assert_eq!(doc.sales, Some(50));
        assert_eq!(doc.tags.as_ref().map(Vec::len), Some(3));
        assert_eq!(doc.create_time, Some(sample_time()));
        assert_eq!(doc.score, Some(4.5));
    }

    #[test]
    fn test_rejects_malformed_create_time() {
        let body = r#"{"id": "1", "productName": "x", "createTime": "2026/01/05"}"#;
        assert!(serde_json::from_str::<ProductDocument>(body).is_err());
    }

    #[test]
    fn test_null_create_time_is_none() {
        let body = r#"{"id": "1", "productName": "x", "createTime": null}"#;
        let doc: ProductDocument = serde_json::from_str(body).unwrap();
        assert!(doc.create_time.is_none());
    }
}

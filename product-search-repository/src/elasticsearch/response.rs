//! Parsing of Elasticsearch response bodies.
//!
//! Responses are decoded from `serde_json::Value` into small hand-written
//! bindings covering only the fields this service reads.

use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::warn;

use product_search_shared::{CategoryCounts, ProductDocument, SubCategoryCounts};

use crate::errors::ProductSearchError;
use crate::types::{BatchOperationResult, BatchOperationSummary, SearchHits, WriteOutcome};

#[derive(Debug, Deserialize)]
struct SearchBody {
    hits: HitsBody,
    #[serde(default)]
    aggregations: Option<Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
struct HitsBody {
    #[serde(default)]
    total: Option<TotalHits>,
    #[serde(default)]
    hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct TotalHits {
    value: u64,
    relation: String,
}

#[derive(Debug, Deserialize)]
struct Hit {
    #[serde(rename = "_source", default)]
    source: Option<ProductDocument>,
}

#[derive(Debug, Deserialize)]
struct TermsAggregate {
    #[serde(default)]
    buckets: Vec<TermsBucket>,
}

#[derive(Debug, Deserialize)]
struct TermsBucket {
    key: Value,
    doc_count: u64,
    #[serde(flatten)]
    sub_aggregations: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct GetBody {
    #[serde(default)]
    found: bool,
    #[serde(rename = "_source", default)]
    source: Option<ProductDocument>,
}

#[derive(Debug, Deserialize)]
struct WriteBody {
    result: String,
}

#[derive(Debug, Deserialize)]
struct BulkBody {
    #[serde(default)]
    errors: bool,
    #[serde(default)]
    items: Vec<Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
struct BulkItem {
    #[serde(rename = "_id", default)]
    id: Option<String>,
    #[serde(default)]
    status: u16,
    #[serde(default)]
    error: Option<Value>,
}

/// Parse the hits of a search response.
///
/// The total is only reported when Elasticsearch marks it as exact (`eq`).
/// Hits without a `_source` are skipped.
pub fn parse_search_hits(body: Value) -> Result<SearchHits, ProductSearchError> {
    let parsed: SearchBody = serde_json::from_value(body)
        .map_err(|e| ProductSearchError::parse(format!("Invalid search response: {}", e)))?;

    let total = parsed
        .hits
        .total
        .filter(|total| total.relation == "eq")
        .map(|total| total.value);

    let products = parsed
        .hits
        .hits
        .into_iter()
        .filter_map(|hit| hit.source)
        .collect();

    Ok(SearchHits { total, products })
}

/// Parse a single-level terms aggregation into `key -> doc_count`.
///
/// A response without the named aggregation yields an empty map.
pub fn parse_terms_counts(body: Value, agg_name: &str) -> Result<CategoryCounts, ProductSearchError> {
    let Some(aggregate) = take_aggregation(body, agg_name)? else {
        return Ok(CategoryCounts::new());
    };

    Ok(aggregate
        .buckets
        .into_iter()
        .map(|bucket| (bucket_key(&bucket.key), bucket.doc_count))
        .collect())
}

/// Parse a two-level terms aggregation into `outer key -> (inner key -> doc_count)`.
///
/// Outer buckets missing the inner aggregation map to an empty inner map.
pub fn parse_nested_terms_counts(
    body: Value,
    agg_name: &str,
    sub_agg_name: &str,
) -> Result<SubCategoryCounts, ProductSearchError> {
    let Some(aggregate) = take_aggregation(body, agg_name)? else {
        return Ok(SubCategoryCounts::new());
    };

    let mut counts = SubCategoryCounts::new();
    for mut bucket in aggregate.buckets {
        let inner = match bucket.sub_aggregations.remove(sub_agg_name) {
            Some(value) => decode_terms(value, sub_agg_name)?
                .buckets
                .into_iter()
                .map(|sub| (bucket_key(&sub.key), sub.doc_count))
                .collect(),
            None => BTreeMap::new(),
        };
        counts.insert(bucket_key(&bucket.key), inner);
    }

    Ok(counts)
}

fn take_aggregation(
    body: Value,
    agg_name: &str,
) -> Result<Option<TermsAggregate>, ProductSearchError> {
    let parsed: SearchBody = serde_json::from_value(body)
        .map_err(|e| ProductSearchError::parse(format!("Invalid aggregation response: {}", e)))?;

    match parsed.aggregations.and_then(|mut aggs| aggs.remove(agg_name)) {
        Some(value) => decode_terms(value, agg_name).map(Some),
        None => {
            warn!(aggregation = %agg_name, "Aggregation missing from response");
            Ok(None)
        }
    }
}

fn decode_terms(value: Value, agg_name: &str) -> Result<TermsAggregate, ProductSearchError> {
    serde_json::from_value(value).map_err(|e| {
        ProductSearchError::parse(format!(
            "Invalid terms aggregation '{}': {}",
            agg_name, e
        ))
    })
}

/// Render a bucket key as a string; non-string keys use their JSON text.
fn bucket_key(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Parse a get-document response. `found: false` yields `None`.
pub fn parse_get_response(body: Value) -> Result<Option<ProductDocument>, ProductSearchError> {
    let parsed: GetBody = serde_json::from_value(body)
        .map_err(|e| ProductSearchError::parse(format!("Invalid get response: {}", e)))?;

    if !parsed.found {
        return Ok(None);
    }
    Ok(parsed.source)
}

/// Parse the `result` field of an index, update or delete response.
pub fn parse_write_outcome(body: Value) -> Result<WriteOutcome, ProductSearchError> {
    let parsed: WriteBody = serde_json::from_value(body)
        .map_err(|e| ProductSearchError::parse(format!("Invalid write response: {}", e)))?;
    parsed.result.parse()
}

/// Read the `acknowledged` flag of an index management response.
pub fn parse_acknowledged(body: &Value) -> bool {
    body.get("acknowledged")
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

/// Parse a bulk response into a per-product summary.
///
/// `product_ids` are the ids in request order; they are used when an item
/// carries no `_id` of its own.
pub fn parse_bulk_response(
    body: Value,
    product_ids: &[&str],
) -> Result<BatchOperationSummary, ProductSearchError> {
    let parsed: BulkBody = serde_json::from_value(body)
        .map_err(|e| ProductSearchError::parse(format!("Invalid bulk response: {}", e)))?;

    let mut results = Vec::with_capacity(parsed.items.len());
    for (position, mut item) in parsed.items.into_iter().enumerate() {
        // Each item is keyed by its action name ("index").
        let action = item
            .remove("index")
            .or_else(|| item.into_iter().next().map(|(_, v)| v))
            .ok_or_else(|| ProductSearchError::parse("Empty bulk response item"))?;
        let action: BulkItem = serde_json::from_value(action)
            .map_err(|e| ProductSearchError::parse(format!("Invalid bulk item: {}", e)))?;

        let product_id = action
            .id
            .or_else(|| product_ids.get(position).map(|id| id.to_string()))
            .unwrap_or_default();

        let error = match action.error {
            Some(error) => Some(ProductSearchError::bulk_index(error_reason(&error))),
            None if !(200..300).contains(&action.status) => Some(
                ProductSearchError::bulk_index(format!("Item failed with status {}", action.status)),
            ),
            None => None,
        };

        results.push(BatchOperationResult {
            product_id,
            success: error.is_none(),
            error,
        });
    }

    let summary = BatchOperationSummary::from_results(results);
    if parsed.errors && !summary.has_failures() {
        warn!("Bulk response flagged errors but no failed item was found");
    }
    Ok(summary)
}

/// Extract a readable reason from an Elasticsearch error object.
pub fn error_reason(error: &Value) -> String {
    match (
        error.get("type").and_then(Value::as_str),
        error.get("reason").and_then(Value::as_str),
    ) {
        (Some(kind), Some(reason)) => format!("{}: {}", kind, reason),
        (None, Some(reason)) => reason.to_string(),
        _ => error.to_string(),
    }
}

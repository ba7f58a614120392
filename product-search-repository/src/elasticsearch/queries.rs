//! Elasticsearch query builders.
//!
//! This module turns a `ProductSearchQuery` and the aggregation reports into
//! query-DSL request bodies. The builders are pure functions so the exact
//! request shape can be checked without a cluster.

use serde_json::{json, Map, Value};

use product_search_shared::ProductSearchQuery;

use crate::elasticsearch::index_config::IndexConfig;

/// Name of the category terms aggregation.
pub const CATEGORY_AGG: &str = "category_agg";

/// Name of the sub-category terms aggregation nested under `category_agg`.
pub const SUB_CATEGORY_AGG: &str = "sub_category_agg";

/// Build the search request body for a product query.
///
/// The body combines:
/// - `match` clauses on `productName` and `description` (at least one must match) when a keyword is set
/// - `range` filter on `price` with whichever bounds are present
/// - `term` filter on `category`
/// - `terms` filter on `tags` (any tag matches)
/// - a single sort clause on the requested field, `sales` descending by default
pub fn build_search_body(query: &ProductSearchQuery, index_config: &IndexConfig) -> Value {
    json!({
        "from": query.from(),
        "size": query.page_size,
        "track_total_hits": true,
        "sort": [build_sort(query)],
        "query": {
            "bool": build_bool_query(query, index_config)
        }
    })
}

/// Build the bool query for the search criteria.
///
/// An empty object is returned when no criterion is set, which Elasticsearch
/// treats as `match_all`.
fn build_bool_query(query: &ProductSearchQuery, index_config: &IndexConfig) -> Value {
    let mut bool_query = Map::new();

    if let Some(keyword) = query.effective_keyword() {
        bool_query.insert(
            "should".to_string(),
            json!([
                {
                    "match": {
                        "productName": {
                            "query": keyword,
                            "analyzer": index_config.name_analyzer
                        }
                    }
                },
                {
                    "match": {
                        "description": {
                            "query": keyword,
                            "analyzer": index_config.description_analyzer
                        }
                    }
                }
            ]),
        );
        bool_query.insert("minimum_should_match".to_string(), json!(1));
    }

    let filters = build_filters(query);
    if !filters.is_empty() {
        bool_query.insert("filter".to_string(), Value::Array(filters));
    }

    Value::Object(bool_query)
}

/// Build the non-scoring filter clauses.
fn build_filters(query: &ProductSearchQuery) -> Vec<Value> {
    let mut filters = Vec::new();

    if query.min_price.is_some() || query.max_price.is_some() {
        let mut range = Map::new();
        if let Some(min) = query.min_price {
            range.insert("gte".to_string(), json!(min));
        }
        if let Some(max) = query.max_price {
            range.insert("lte".to_string(), json!(max));
        }
        filters.push(json!({ "range": { "price": range } }));
    }

    if let Some(category) = query.effective_category() {
        filters.push(json!({ "term": { "category": category } }));
    }

    let tags = query.effective_tags();
    if !tags.is_empty() {
        filters.push(json!({ "terms": { "tags": tags } }));
    }

    filters
}

fn build_sort(query: &ProductSearchQuery) -> Value {
    let mut sort = Map::new();
    sort.insert(
        query.effective_sort_field().to_string(),
        json!({ "order": query.sort_order.as_str() }),
    );
    Value::Object(sort)
}

/// Build the category report request: document counts per category, no hits.
pub fn build_category_aggregation(size: usize) -> Value {
    json!({
        "size": 0,
        "aggs": {
            CATEGORY_AGG: {
                "terms": {
                    "field": "category",
                    "size": size
                }
            }
        }
    })
}

/// Build the two-level report request: sub-category counts nested in each category.
pub fn build_category_sub_category_aggregation(size: usize, sub_size: usize) -> Value {
    json!({
        "size": 0,
        "aggs": {
            CATEGORY_AGG: {
                "terms": {
                    "field": "category",
                    "size": size
                },
                "aggs": {
                    SUB_CATEGORY_AGG: {
                        "terms": {
                            "field": "subCategory",
                            "size": sub_size
                        }
                    }
                }
            }
        }
    })
}

// HTTP request handlers
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use axum_extra::extract::{Query, QueryRejection};
use serde_json::json;
use tracing::{info, warn};

use product_search_repository::WriteOutcome;
use product_search_shared::{
    CategoryCounts, PageResult, ProductDocument, SubCategoryCounts, DEFAULT_PAGE_SIZE,
    MAX_PAGE_SIZE,
};

use crate::errors::ApiError;
use crate::server::models::{BatchSaveResponse, IndexResponse, SearchParams, WriteResponse};
use crate::server::state::AppState;

type ApiResult<T> = Result<T, ApiError>;

/// Health check endpoint, reporting whether Elasticsearch answers a ping.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    if state.service.health().await {
        (
            StatusCode::OK,
            Json(json!({ "status": "ok", "elasticsearch": "up" })),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "error", "elasticsearch": "down" })),
        )
    }
}

pub async fn create_index(State(state): State<AppState>) -> ApiResult<Json<IndexResponse>> {
    let acknowledged = state.service.create_index().await?;
    let message = if acknowledged {
        "Product index is ready"
    } else {
        "Product index creation was not acknowledged"
    };

    Ok(Json(IndexResponse {
        acknowledged,
        message: message.to_string(),
    }))
}

pub async fn delete_index(State(state): State<AppState>) -> ApiResult<Json<IndexResponse>> {
    let acknowledged = state.service.delete_index().await?;
    let message = if acknowledged {
        "Product index deleted"
    } else {
        "Product index deletion was not acknowledged"
    };

    Ok(Json(IndexResponse {
        acknowledged,
        message: message.to_string(),
    }))
}

pub async fn save_product(
    State(state): State<AppState>,
    payload: Result<Json<ProductDocument>, JsonRejection>,
) -> ApiResult<Json<WriteResponse>> {
    let Json(product) = payload?;
    let outcome = state.service.save_product(product).await?;

    Ok(Json(WriteResponse::success("Product saved", outcome)))
}

/// Bulk save endpoint. Item failures are reported in the body with status 200.
pub async fn batch_save_products(
    State(state): State<AppState>,
    payload: Result<Json<Vec<ProductDocument>>, JsonRejection>,
) -> ApiResult<Json<BatchSaveResponse>> {
    let Json(products) = payload?;
    info!(count = products.len(), "Received bulk save request");

    let summary = state.service.batch_save_products(products).await?;
    Ok(Json(BatchSaveResponse::from(summary)))
}

pub async fn get_product(
    State(state): State<AppState>,
    product_id: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<ProductDocument>> {
    let Path(product_id) = product_id?;
    match state.service.get_product(&product_id).await? {
        Some(product) => Ok(Json(product)),
        None => Err(ApiError::not_found(format!(
            "Product {} not found",
            product_id
        ))),
    }
}

pub async fn update_product(
    State(state): State<AppState>,
    payload: Result<Json<ProductDocument>, JsonRejection>,
) -> ApiResult<Json<WriteResponse>> {
    let Json(product) = payload?;
    let outcome = state.service.update_product(product).await?;

    Ok(Json(WriteResponse::success("Product updated", outcome)))
}

pub async fn delete_product(
    State(state): State<AppState>,
    product_id: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<WriteResponse>> {
    let Path(product_id) = product_id?;
    let outcome = state.service.delete_product(&product_id).await?;

    let message = match outcome {
        WriteOutcome::NotFound => {
            warn!(product_id = %product_id, "Delete requested for missing product");
            "Product not found"
        }
        _ => "Product deleted",
    };
    Ok(Json(WriteResponse::success(message, outcome)))
}

/// Search endpoint returning the plain product list (up to 100 by default).
pub async fn search_products(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> ApiResult<Json<Vec<ProductDocument>>> {
    let Query(params) = params?;
    let products = state
        .service
        .search_products(params.into_query(MAX_PAGE_SIZE))
        .await?;

    Ok(Json(products))
}

/// Paged search endpoint (20 per page by default).
pub async fn search_products_page(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> ApiResult<Json<PageResult<ProductDocument>>> {
    let Query(params) = params?;
    let page = state
        .service
        .search_products_page(params.into_query(DEFAULT_PAGE_SIZE))
        .await?;

    Ok(Json(page))
}

pub async fn aggregate_by_category(
    State(state): State<AppState>,
) -> ApiResult<Json<CategoryCounts>> {
    Ok(Json(state.service.aggregate_by_category().await?))
}

pub async fn aggregate_by_category_and_sub_category(
    State(state): State<AppState>,
) -> ApiResult<Json<SubCategoryCounts>> {
    Ok(Json(
        state
            .service
            .aggregate_by_category_and_sub_category()
            .await?,
    ))
}

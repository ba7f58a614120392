// Server module - HTTP server setup and routing
pub mod handlers;
pub mod models;
pub mod state;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

use product_search_repository::ProductSearchService;

use crate::StartupError;
use self::state::AppState;

/// Create the Axum application router with all routes and middleware
pub fn create_app(service: ProductSearchService, cors: CorsLayer) -> Router {
    let state = AppState { service };

    Router::new()
        .route("/product/index/create", post(handlers::create_index))
        .route("/product/index/delete", delete(handlers::delete_index))
        .route("/product/save", post(handlers::save_product))
        .route("/product/batch/save", post(handlers::batch_save_products))
        .route("/product/update", put(handlers::update_product))
        .route("/product/search", get(handlers::search_products))
        .route("/product/search/page", get(handlers::search_products_page))
        .route("/product/agg/category", get(handlers::aggregate_by_category))
        .route(
            "/product/agg/category/sub",
            get(handlers::aggregate_by_category_and_sub_category),
        )
        .route(
            "/product/:product_id",
            get(handlers::get_product).delete(handlers::delete_product),
        )
        .route("/health", get(handlers::health_check))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Run the server on the specified address until Ctrl-C is received
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), StartupError> {
    info!("Server listening on {}", addr);
    info!("- Search endpoint: http://{}/product/search", addr);
    info!("- Health endpoint: http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    } else {
        info!("Shutdown signal received, shutting down server");
    }
}

//! Product Search Main Entry Point
//!
//! Starts the REST service for product catalog search over Elasticsearch.

use dotenv::dotenv;
use product_search_api::config::create_cors_layer;
use product_search_api::{create_app, run_server, Dependencies, Settings, StartupError};
use std::env;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("product_search_api=info,product_search_repository=info,tower_http=info")
    });

    let json_format = env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json_format {
        // JSON format for log collectors
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .init();

        info!(
            service_name = "product-search-api",
            service_version = env!("CARGO_PKG_VERSION"),
            "Tracing initialized with JSON format"
        );
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true).pretty())
            .init();

        info!(
            service_name = "product-search-api",
            service_version = env!("CARGO_PKG_VERSION"),
            "Tracing initialized with console output"
        );
    }
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    // Load environment variables from .env file
    dotenv().ok();

    init_tracing();

    info!("Starting product search service");

    let settings = Settings::from_env().inspect_err(|e| {
        error!(error = %e, "Invalid configuration");
    })?;

    let deps = match Dependencies::new(&settings).await {
        Ok(deps) => {
            info!("Dependencies initialized successfully");
            deps
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize dependencies");
            return Err(e);
        }
    };

    let app = create_app(
        deps.service,
        create_cors_layer(&settings.cors_allowed_origins),
    );

    match run_server(app, settings.server_addr).await {
        Ok(()) => {
            info!("Product search service stopped");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Product search service failed");
            Err(e)
        }
    }
}

//! Dependency initialization and wiring for the product search service.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

use product_search_repository::elasticsearch::{ConnectionOptions, IndexConfig};
use product_search_repository::{ElasticsearchProvider, ProductIndexProvider, ProductSearchService};

use crate::config::{ConnectionMode, Settings};
use crate::StartupError;

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The service backing every HTTP handler.
    pub service: ProductSearchService,
}

impl Dependencies {
    /// Initialize all dependencies from the given settings.
    ///
    /// Connects to Elasticsearch (retrying in `retry` mode) and, when
    /// `ensure_index_on_startup` is set, creates the product index if missing.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(StartupError)` - If initialization fails (connection errors only in fail-fast mode)
    pub async fn new(settings: &Settings) -> Result<Self, StartupError> {
        info!(
            elasticsearch_url = %settings.elasticsearch_url,
            index = %settings.index_name,
            connection_mode = ?settings.connection_mode,
            retry_interval_secs = settings.retry_interval.as_secs(),
            max_batch_size = ?settings.max_batch_size,
            "Initializing dependencies"
        );

        let options = ConnectionOptions {
            username: settings.elasticsearch_username.clone(),
            password: settings.elasticsearch_password.clone(),
            timeout: Some(settings.elasticsearch_timeout),
        };

        let provider = Self::connect_to_elasticsearch(
            &settings.elasticsearch_url,
            settings.index_config(),
            options,
            settings.connection_mode,
            settings.retry_interval,
        )
        .await?;

        info!("Elasticsearch connection established");

        if settings.ensure_index_on_startup {
            let acknowledged = provider.create_index().await.map_err(|e| {
                StartupError::config(format!("Failed to ensure product index exists: {}", e))
            })?;
            if !acknowledged {
                warn!(index = %settings.index_name, "Product index creation was not acknowledged");
            }
        }

        let service = ProductSearchService::with_config(Arc::new(provider), settings.service_config());

        Ok(Self { service })
    }

    /// Connect to Elasticsearch with retry logic based on connection mode.
    async fn connect_to_elasticsearch(
        url: &str,
        index_config: IndexConfig,
        options: ConnectionOptions,
        mode: ConnectionMode,
        retry_interval: Duration,
    ) -> Result<ElasticsearchProvider, StartupError> {
        loop {
            match Self::try_connect_elasticsearch(url, index_config.clone(), options.clone()).await
            {
                Ok(provider) => return Ok(provider),
                Err(e) => match mode {
                    ConnectionMode::FailFast => {
                        return Err(StartupError::config(format!(
                            "Failed to connect to Elasticsearch: {}",
                            e
                        )));
                    }
                    ConnectionMode::Retry => {
                        warn!(
                            elasticsearch_url = %url,
                            error = %e,
                            retry_interval_secs = retry_interval.as_secs(),
                            "Failed to connect to Elasticsearch, retrying..."
                        );
                        sleep(retry_interval).await;
                    }
                },
            }
        }
    }

    /// Attempt to connect to Elasticsearch and confirm it answers a ping.
    async fn try_connect_elasticsearch(
        url: &str,
        index_config: IndexConfig,
        options: ConnectionOptions,
    ) -> Result<ElasticsearchProvider, StartupError> {
        let provider = ElasticsearchProvider::with_options(url, index_config, options)
            .map_err(|e| {
                StartupError::config(format!("Failed to create Elasticsearch provider: {}", e))
            })?;

        match provider.ping().await {
            Ok(true) => Ok(provider),
            Ok(false) => Err(StartupError::config(
                "Elasticsearch answered the ping with an error status",
            )),
            Err(e) => Err(StartupError::config(format!("Ping failed: {}", e))),
        }
    }
}

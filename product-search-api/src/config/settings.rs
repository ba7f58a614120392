//! Service settings read from environment variables.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;
use tracing::warn;

use product_search_repository::elasticsearch::{
    IndexConfig, DEFAULT_DESCRIPTION_ANALYZER, DEFAULT_NAME_ANALYZER, INDEX_NAME,
};
use product_search_repository::ProductSearchServiceConfig;

use crate::StartupError;

/// Default Elasticsearch URL.
const DEFAULT_ELASTICSEARCH_URL: &str = "http://localhost:9200";

/// Default request timeout in milliseconds.
const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Default connection retry interval in seconds.
const DEFAULT_RETRY_INTERVAL_SECS: u64 = 15;

/// Default maximum number of products per bulk save.
const DEFAULT_MAX_BATCH_SIZE: usize = 1000;

const DEFAULT_SERVER_HOST: &str = "0.0.0.0";
const DEFAULT_SERVER_PORT: u16 = 8080;

/// Origins of the storefront dev servers.
const DEFAULT_CORS_ALLOWED_ORIGINS: &str = "http://localhost:3000,http://localhost:5173";

/// Connection mode for Elasticsearch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionMode {
    /// Fail immediately if connection fails.
    FailFast,
    /// Retry connection at the configured interval until successful.
    Retry,
}

impl ConnectionMode {
    /// Parse a connection mode.
    ///
    /// Valid values: "fail-fast" or "retry" (case-insensitive).
    /// Defaults to "retry" if not set or invalid.
    fn parse(value: Option<&str>) -> Self {
        match value.unwrap_or("retry").to_lowercase().as_str() {
            "fail-fast" | "failfast" | "fail_fast" => Self::FailFast,
            "retry" => Self::Retry,
            _ => {
                warn!("Invalid ELASTICSEARCH_CONNECTION_MODE, defaulting to 'retry'");
                Self::Retry
            }
        }
    }
}

/// Runtime settings of the product search service.
#[derive(Debug, Clone)]
pub struct Settings {
    pub elasticsearch_url: String,
    /// Basic-auth credentials, used when the username is set.
    pub elasticsearch_username: Option<String>,
    pub elasticsearch_password: Option<String>,
    pub elasticsearch_timeout: Duration,
    pub connection_mode: ConnectionMode,
    pub retry_interval: Duration,
    pub index_name: String,
    pub name_analyzer: String,
    pub description_analyzer: String,
    /// Create the product index during startup when it does not exist.
    pub ensure_index_on_startup: bool,
    /// `None` disables the bulk save limit.
    pub max_batch_size: Option<usize>,
    pub server_addr: SocketAddr,
    pub cors_allowed_origins: Vec<String>,
}

impl Settings {
    /// Read settings from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `ELASTICSEARCH_URL`: Elasticsearch server URL (default: http://localhost:9200)
    /// - `ELASTICSEARCH_USERNAME` / `ELASTICSEARCH_PASSWORD`: Basic-auth credentials (default: none)
    /// - `ELASTICSEARCH_TIMEOUT_MS`: Request timeout in milliseconds (default: 30000)
    /// - `ELASTICSEARCH_CONNECTION_MODE`: Connection mode - "fail-fast" or "retry" (default: retry)
    /// - `ELASTICSEARCH_RETRY_INTERVAL_SECS`: Retry interval in seconds (default: 15)
    /// - `PRODUCT_INDEX`: Product index name (default: ecommerce_product)
    /// - `PRODUCT_NAME_ANALYZER`: Analyzer for productName (default: ik_max_word)
    /// - `PRODUCT_DESCRIPTION_ANALYZER`: Analyzer for description (default: ik_smart)
    /// - `ENSURE_INDEX_ON_STARTUP`: Create the index at startup (default: false)
    /// - `MAX_BATCH_SIZE`: Bulk save limit, 0 disables it (default: 1000)
    /// - `SERVER_HOST` / `SERVER_PORT`: Listen address (default: 0.0.0.0:8080)
    /// - `CORS_ALLOWED_ORIGINS`: Comma-separated allowed origins
    ///
    /// Unparseable numbers fall back to their defaults; an invalid listen
    /// address is an error.
    pub fn from_env() -> Result<Self, StartupError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, StartupError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let number = |key: &str, default: u64| {
            var(key)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .unwrap_or(default)
        };

        let max_batch_size = match number("MAX_BATCH_SIZE", DEFAULT_MAX_BATCH_SIZE as u64) {
            0 => None,
            size => Some(size as usize),
        };

        let host = var("SERVER_HOST").unwrap_or_else(|| DEFAULT_SERVER_HOST.to_string());
        let port = number("SERVER_PORT", DEFAULT_SERVER_PORT as u64);
        let server_addr: SocketAddr = format!("{}:{}", host.trim(), port)
            .parse()
            .map_err(|e| {
                StartupError::config(format!(
                    "Invalid server address {}:{}: {}",
                    host, port, e
                ))
            })?;

        let cors_allowed_origins = var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|| DEFAULT_CORS_ALLOWED_ORIGINS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect();

        Ok(Self {
            elasticsearch_url: var("ELASTICSEARCH_URL")
                .unwrap_or_else(|| DEFAULT_ELASTICSEARCH_URL.to_string()),
            elasticsearch_username: var("ELASTICSEARCH_USERNAME"),
            elasticsearch_password: lookup("ELASTICSEARCH_PASSWORD"),
            elasticsearch_timeout: Duration::from_millis(number(
                "ELASTICSEARCH_TIMEOUT_MS",
                DEFAULT_TIMEOUT_MS,
            )),
            connection_mode: ConnectionMode::parse(var("ELASTICSEARCH_CONNECTION_MODE").as_deref()),
            retry_interval: Duration::from_secs(number(
                "ELASTICSEARCH_RETRY_INTERVAL_SECS",
                DEFAULT_RETRY_INTERVAL_SECS,
            )),
            index_name: var("PRODUCT_INDEX").unwrap_or_else(|| INDEX_NAME.to_string()),
            name_analyzer: var("PRODUCT_NAME_ANALYZER")
                .unwrap_or_else(|| DEFAULT_NAME_ANALYZER.to_string()),
            description_analyzer: var("PRODUCT_DESCRIPTION_ANALYZER")
                .unwrap_or_else(|| DEFAULT_DESCRIPTION_ANALYZER.to_string()),
            ensure_index_on_startup: var("ENSURE_INDEX_ON_STARTUP")
                .map(|v| matches!(v.trim().to_lowercase().as_str(), "true" | "1" | "yes"))
                .unwrap_or(false),
            max_batch_size,
            server_addr,
            cors_allowed_origins,
        })
    }

    /// The product index configuration these settings describe.
    pub fn index_config(&self) -> IndexConfig {
        IndexConfig::new(self.index_name.clone())
            .with_analyzers(self.name_analyzer.clone(), self.description_analyzer.clone())
    }

    /// The service configuration these settings describe.
    pub fn service_config(&self) -> ProductSearchServiceConfig {
        ProductSearchServiceConfig {
            max_batch_size: self.max_batch_size,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings, StartupError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let settings = settings(&[]).unwrap();

        assert_eq!(settings.elasticsearch_url, "http://localhost:9200");
        assert!(settings.elasticsearch_username.is_none());
        assert_eq!(settings.elasticsearch_timeout, Duration::from_secs(30));
        assert_eq!(settings.connection_mode, ConnectionMode::Retry);
        assert_eq!(settings.retry_interval, Duration::from_secs(15));
        assert_eq!(settings.index_name, "ecommerce_product");
        assert_eq!(settings.name_analyzer, "ik_max_word");
        assert_eq!(settings.description_analyzer, "ik_smart");
        assert!(!settings.ensure_index_on_startup);
        assert_eq!(settings.max_batch_size, Some(1000));
        assert_eq!(settings.server_addr.to_string(), "0.0.0.0:8080");
        assert_eq!(
            settings.cors_allowed_origins,
            vec!["http://localhost:3000", "http://localhost:5173"]
        );
    }

    #[test]
    fn test_overrides() {
        let settings = settings(&[
            ("ELASTICSEARCH_URL", "https://es.internal:9243"),
            ("ELASTICSEARCH_USERNAME", "elastic"),
            ("ELASTICSEARCH_PASSWORD", "changeme"),
            ("ELASTICSEARCH_TIMEOUT_MS", "5000"),
            ("ELASTICSEARCH_CONNECTION_MODE", "FAIL-FAST"),
            ("PRODUCT_INDEX", "products_v2"),
            ("PRODUCT_NAME_ANALYZER", "standard"),
            ("ENSURE_INDEX_ON_STARTUP", "true"),
            ("MAX_BATCH_SIZE", "0"),
            ("SERVER_HOST", "127.0.0.1"),
            ("SERVER_PORT", "9090"),
            ("CORS_ALLOWED_ORIGINS", "https://shop.example.com, ,"),
        ])
        .unwrap();

        assert_eq!(settings.elasticsearch_username.as_deref(), Some("elastic"));
        assert_eq!(settings.elasticsearch_password.as_deref(), Some("changeme"));
        assert_eq!(settings.elasticsearch_timeout, Duration::from_millis(5000));
        assert_eq!(settings.connection_mode, ConnectionMode::FailFast);
        assert!(settings.ensure_index_on_startup);
        assert_eq!(settings.max_batch_size, None);
        assert_eq!(settings.server_addr.to_string(), "127.0.0.1:9090");
        assert_eq!(settings.cors_allowed_origins, vec!["https://shop.example.com"]);

        let index_config = settings.index_config();
        assert_eq!(index_config.name, "products_v2");
        assert_eq!(index_config.name_analyzer, "standard");
        assert_eq!(index_config.description_analyzer, "ik_smart");
        assert_eq!(settings.service_config().max_batch_size, None);
    }

    #[test]
    fn test_invalid_numbers_fall_back_to_defaults() {
        let settings = settings(&[
            ("ELASTICSEARCH_RETRY_INTERVAL_SECS", "soon"),
            ("MAX_BATCH_SIZE", "-5"),
            ("ELASTICSEARCH_CONNECTION_MODE", "sometimes"),
        ])
        .unwrap();

        assert_eq!(settings.retry_interval, Duration::from_secs(15));
        assert_eq!(settings.max_batch_size, Some(1000));
        assert_eq!(settings.connection_mode, ConnectionMode::Retry);
    }

    #[test]
    fn test_invalid_server_host() {
        let result = settings(&[("SERVER_HOST", "not a host")]);
        assert!(matches!(result, Err(StartupError::ConfigError(_))));
    }
}

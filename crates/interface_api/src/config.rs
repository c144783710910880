//! API configuration

use std::time::Duration;

use serde::Deserialize;

use core_kernel::{CircuitBreakerConfig, MAX_PAGE_SIZE};
use domain_customer::adapters::ViaCepConfig;
use infra_db::DatabaseConfig;

/// API configuration
///
/// Every field can be set through an `API_`-prefixed environment variable,
/// e.g. `API_PORT=9090` or `API_VIACEP_BASE_URL=http://localhost:8081`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Database URL
    pub database_url: String,
    /// Upper bound of the database pool
    pub db_max_connections: u32,
    /// Seconds a request waits for a pooled connection
    pub db_connect_timeout_secs: u64,
    /// Log level
    pub log_level: String,
    /// Base URL of the ViaCEP service
    pub viacep_base_url: String,
    /// Per-request timeout for postal code lookups
    pub lookup_timeout_secs: u64,
    /// Retries after a transient lookup failure
    pub lookup_retry_attempts: u32,
    /// Largest page size a client may request
    pub max_page_size: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            database_url: "postgres://localhost/customers".to_string(),
            db_max_connections: 10,
            db_connect_timeout_secs: 30,
            log_level: "info".to_string(),
            viacep_base_url: "https://viacep.com.br".to_string(),
            lookup_timeout_secs: 5,
            lookup_retry_attempts: 2,
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}

impl ApiConfig {
    /// Loads configuration from environment
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("API").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Pool settings for the customer database
    pub fn database(&self) -> DatabaseConfig {
        DatabaseConfig::new(self.database_url.clone())
            .max_connections(self.db_max_connections)
            .connect_timeout(Duration::from_secs(self.db_connect_timeout_secs))
    }

    /// Settings for the ViaCEP lookup adapter
    pub fn viacep(&self) -> ViaCepConfig {
        ViaCepConfig {
            base_url: self.viacep_base_url.clone(),
            timeout: Duration::from_secs(self.lookup_timeout_secs),
            retry_attempts: self.lookup_retry_attempts,
            circuit_breaker: Some(CircuitBreakerConfig {
                failure_threshold: 5,
                success_threshold: 1,
                reset_timeout_secs: 30,
            }),
            ..ViaCepConfig::default()
        }
    }

    /// Page size limit, never above the kernel's hard maximum
    pub fn page_size_limit(&self) -> u32 {
        self.max_page_size.clamp(1, MAX_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.server_addr(), "0.0.0.0:8080");
        assert_eq!(config.page_size_limit(), MAX_PAGE_SIZE);
    }

    #[test]
    fn test_viacep_settings_follow_config() {
        let config = ApiConfig {
            viacep_base_url: "http://localhost:9000".to_string(),
            lookup_timeout_secs: 2,
            lookup_retry_attempts: 0,
            ..ApiConfig::default()
        };
        let viacep = config.viacep();
        assert_eq!(viacep.base_url, "http://localhost:9000");
        assert_eq!(viacep.timeout, Duration::from_secs(2));
        assert_eq!(viacep.retry_attempts, 0);
    }

    #[test]
    fn test_database_pool_follows_config() {
        let config = ApiConfig {
            database_url: "postgres://db/customers".to_string(),
            db_max_connections: 4,
            db_connect_timeout_secs: 3,
            ..ApiConfig::default()
        };
        let database = config.database();
        assert_eq!(database.url, "postgres://db/customers");
        assert_eq!(database.max_connections, 4);
        assert_eq!(database.connect_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_page_size_limit_is_clamped() {
        let config = ApiConfig {
            max_page_size: 10_000,
            ..ApiConfig::default()
        };
        assert_eq!(config.page_size_limit(), MAX_PAGE_SIZE);
    }
}

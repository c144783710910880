//! ViaCEP Adapter
//!
//! This module provides the `AddressLookupProvider` backed by the public ViaCEP
//! REST service (`GET {base_url}/ws/{cep}/json/`).
//!
//! # Architecture
//!
//! The adapter owns transport details only: URL building, timeouts, retries and
//! HTTP error mapping, and JSON decoding into an `Address`. It includes:
//!
//! - Connection pooling via reqwest
//! - Automatic retry with exponential backoff for transient failures
//! - Circuit breaker pattern for fault tolerance
//!
//! # Error Handling
//!
//! Upstream failures are mapped to `PortError` variants:
//! - code that is not 8 digits, or 400 -> `PortError::Validation`
//! - 404, or a body with `"erro": true` -> `PortError::NotFound`
//! - 429 -> `PortError::RateLimited`
//! - 5xx, or an open circuit -> `PortError::ServiceUnavailable`
//! - Timeouts -> `PortError::Timeout`
//! - Connection failures -> `PortError::Connection`
//! - Undecodable bodies -> `PortError::Transformation`

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use core_kernel::{
    AdapterHealth, CircuitBreakerConfig, DomainPort, HealthCheckResult, HealthCheckable,
    PortError, PostalCode,
};

use crate::address::Address;
use crate::ports::AddressLookupProvider;

const ADAPTER_ID: &str = "viacep-adapter";
const SERVICE_NAME: &str = "ViaCEP";

/// Configuration for the ViaCEP adapter
#[derive(Debug, Clone)]
pub struct ViaCepConfig {
    /// Base URL of the service, without the `/ws` path
    pub base_url: String,

    /// Per-request timeout
    pub timeout: Duration,

    /// Number of retries after the first attempt for transient failures
    pub retry_attempts: u32,

    /// Delay before the first retry; doubled on each later retry
    pub retry_base_delay: Duration,

    /// Circuit breaker configuration
    pub circuit_breaker: Option<CircuitBreakerConfig>,
}

impl Default for ViaCepConfig {
    fn default() -> Self {
        Self {
            base_url: "https://viacep.com.br".to_string(),
            timeout: Duration::from_secs(5),
            retry_attempts: 2,
            retry_base_delay: Duration::from_millis(200),
            circuit_breaker: Some(CircuitBreakerConfig {
                failure_threshold: 5,
                success_threshold: 1,
                reset_timeout_secs: 30,
            }),
        }
    }
}

/// Circuit breaker state for fault tolerance
#[derive(Debug)]
struct CircuitBreaker {
    config: CircuitBreakerConfig,
    failure_count: AtomicU64,
    success_count: AtomicU64,
    is_open: AtomicBool,
    opened_at: RwLock<Option<Instant>>,
}

impl CircuitBreaker {
    fn new(config: CircuitBreakerConfig) -> Self {
        Self {
            config,
            failure_count: AtomicU64::new(0),
            success_count: AtomicU64::new(0),
            is_open: AtomicBool::new(false),
            opened_at: RwLock::new(None),
        }
    }

    async fn is_available(&self) -> bool {
        if !self.is_open.load(Ordering::Relaxed) {
            return true;
        }

        // Half-open once the reset timeout has elapsed
        let opened_at = self.opened_at.read().await;
        match *opened_at {
            Some(time) => time.elapsed() >= Duration::from_secs(self.config.reset_timeout_secs),
            None => true,
        }
    }

    fn record_success(&self) {
        self.failure_count.store(0, Ordering::Relaxed);
        if !self.is_open.load(Ordering::Relaxed) {
            return;
        }
        let successes = self.success_count.fetch_add(1, Ordering::Relaxed) + 1;
        if successes >= u64::from(self.config.success_threshold) {
            self.is_open.store(false, Ordering::Relaxed);
            self.success_count.store(0, Ordering::Relaxed);
        }
    }

    async fn record_failure(&self) {
        self.success_count.store(0, Ordering::Relaxed);
        let failures = self.failure_count.fetch_add(1, Ordering::Relaxed) + 1;
        if failures >= u64::from(self.config.failure_threshold) {
            self.is_open.store(true, Ordering::Relaxed);
            *self.opened_at.write().await = Some(Instant::now());
        }
    }
}

/// Address lookup against ViaCEP
///
/// # Example
///
/// ```rust,ignore
/// use domain_customer::adapters::{ViaCepAdapter, ViaCepConfig};
///
/// let adapter = ViaCepAdapter::new(ViaCepConfig::default())?;
/// let address = adapter.lookup(&PostalCode::parse("01001-000")?).await?;
/// ```
#[derive(Debug)]
pub struct ViaCepAdapter {
    client: Client,
    config: ViaCepConfig,
    circuit_breaker: Option<CircuitBreaker>,
}

impl ViaCepAdapter {
    /// Builds the adapter and its HTTP client
    ///
    /// # Errors
    ///
    /// `PortError::Internal` when the reqwest client cannot be constructed.
    pub fn new(config: ViaCepConfig) -> Result<Self, PortError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PortError::Internal {
                message: "failed to build HTTP client".to_string(),
                source: Some(Box::new(e)),
            })?;
        let circuit_breaker = config.circuit_breaker.clone().map(CircuitBreaker::new);

        Ok(Self {
            client,
            config,
            circuit_breaker,
        })
    }

    /// Checks if the circuit breaker is open (blocking requests)
    pub async fn is_circuit_open(&self) -> bool {
        match &self.circuit_breaker {
            Some(cb) => !cb.is_available().await,
            None => false,
        }
    }

    fn url_for(&self, postal_code: &PostalCode) -> String {
        format!(
            "{}/ws/{}/json/",
            self.config.base_url.trim_end_matches('/'),
            postal_code
        )
    }

    async fn fetch_once(&self, postal_code: &PostalCode) -> Result<Address, PortError> {
        let response = self
            .client
            .get(self.url_for(postal_code))
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| self.map_transport_error(postal_code, e))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| self.map_transport_error(postal_code, e))?;
        if !status.is_success() {
            return Err(map_status_error(status, postal_code));
        }

        parse_address(body.as_ref(), postal_code)
    }

    fn map_transport_error(&self, postal_code: &PostalCode, error: reqwest::Error) -> PortError {
        if error.is_timeout() {
            PortError::Timeout {
                operation: format!("ViaCEP lookup {}", postal_code),
                duration_ms: millis(self.config.timeout),
            }
        } else if error.is_decode() {
            PortError::Transformation {
                message: format!("invalid ViaCEP response body: {error}"),
            }
        } else {
            PortError::Connection {
                message: format!("ViaCEP request failed: {error}"),
                source: Some(Box::new(error)),
            }
        }
    }

    fn backoff(&self, attempt: u32) -> Duration {
        self.config
            .retry_base_delay
            .saturating_mul(2u32.saturating_pow(attempt))
    }
}

fn map_status_error(status: StatusCode, postal_code: &PostalCode) -> PortError {
    match status {
        StatusCode::BAD_REQUEST => PortError::validation_field(
            format!("ViaCEP rejected postal code '{}'", postal_code),
            "postal_code",
        ),
        StatusCode::NOT_FOUND => PortError::not_found("Address", postal_code),
        StatusCode::TOO_MANY_REQUESTS => PortError::RateLimited {
            retry_after_secs: 1,
        },
        s if s.is_server_error() => PortError::unavailable(SERVICE_NAME),
        s => PortError::internal(format!("unexpected ViaCEP status {s}")),
    }
}

fn parse_address(body: &[u8], postal_code: &PostalCode) -> Result<Address, PortError> {
    let decoded: ViaCepResponse = serde_json::from_slice(body).map_err(|error| {
        PortError::Transformation {
            message: format!("invalid ViaCEP JSON payload: {error}"),
        }
    })?;
    if decoded.is_error() {
        return Err(PortError::not_found("Address", postal_code));
    }
    Ok(decoded.into_address(postal_code))
}

impl DomainPort for ViaCepAdapter {}

#[async_trait]
impl HealthCheckable for ViaCepAdapter {
    /// Reports the circuit state; no request is made to the service
    async fn health_check(&self) -> HealthCheckResult {
        if self.is_circuit_open().await {
            return HealthCheckResult::now(
                ADAPTER_ID,
                AdapterHealth::Degraded,
                0,
                Some("Circuit breaker is open".to_string()),
            );
        }
        HealthCheckResult::now(ADAPTER_ID, AdapterHealth::Healthy, 0, None)
    }
}

#[async_trait]
impl AddressLookupProvider for ViaCepAdapter {
    #[instrument(skip(self), fields(postal_code = %postal_code))]
    async fn lookup(&self, postal_code: &PostalCode) -> Result<Address, PortError> {
        if !postal_code.is_cep() {
            return Err(PortError::validation_field(
                format!("'{}' is not an 8-digit CEP", postal_code),
                "postal_code",
            ));
        }

        if let Some(cb) = &self.circuit_breaker {
            if !cb.is_available().await {
                return Err(PortError::ServiceUnavailable {
                    service: "ViaCEP circuit breaker is open".to_string(),
                });
            }
        }

        let mut attempt = 0;
        loop {
            let started = Instant::now();
            let result = self.fetch_once(postal_code).await;
            debug!(
                attempt,
                elapsed_ms = millis(started.elapsed()),
                ok = result.is_ok(),
                "ViaCEP request finished"
            );

            match result {
                Err(e) if e.is_transient() && attempt < self.config.retry_attempts => {
                    let delay = self.backoff(attempt);
                    warn!(error = %e, attempt, ?delay, "Retrying ViaCEP lookup");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    if let Some(cb) = &self.circuit_breaker {
                        if e.is_transient() {
                            cb.record_failure().await;
                        } else {
                            cb.record_success();
                        }
                    }
                    return Err(e);
                }
                Ok(address) => {
                    if let Some(cb) = &self.circuit_breaker {
                        cb.record_success();
                    }
                    return Ok(address);
                }
            }
        }
    }
}

// =============================================================================
// ViaCEP Data Transfer Objects
// =============================================================================

/// Body returned by `GET /ws/{cep}/json/`
///
/// Unknown codes answer 200 with `{"erro": true}`; older deployments send the
/// string `"true"` instead.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ViaCepResponse {
    cep: String,
    logradouro: String,
    complemento: String,
    bairro: String,
    localidade: String,
    uf: String,
    ibge: String,
    gia: String,
    ddd: String,
    siafi: String,
    erro: Option<serde_json::Value>,
}

impl ViaCepResponse {
    fn is_error(&self) -> bool {
        match &self.erro {
            Some(serde_json::Value::Bool(flag)) => *flag,
            Some(serde_json::Value::String(flag)) => flag.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }

    fn into_address(self, requested: &PostalCode) -> Address {
        let postal_code = PostalCode::parse(&self.cep).unwrap_or_else(|_| requested.clone());
        Address {
            postal_code,
            street: self.logradouro,
            complement: self.complemento,
            neighborhood: self.bairro,
            city: self.localidade,
            state: self.uf,
            ibge: self.ibge,
            gia: self.gia,
            ddd: self.ddd,
            siafi: self.siafi,
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

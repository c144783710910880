//! Customer Registry - API Server Binary
//!
//! This binary starts the HTTP API server for the customer registry.
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration
//! cargo run --bin customer-api
//!
//! # Run with environment variables
//! API_HOST=0.0.0.0 API_PORT=8080 DATABASE_URL=postgres://... cargo run --bin customer-api
//! ```
//!
//! # Environment Variables
//!
//! * `API_HOST` - Server host (default: 0.0.0.0)
//! * `API_PORT` - Server port (default: 8080)
//! * `API_DATABASE_URL` / `DATABASE_URL` - PostgreSQL connection string
//! * `API_DB_MAX_CONNECTIONS` - Database pool size (default: 10)
//! * `API_DB_CONNECT_TIMEOUT_SECS` - Wait for a pooled connection (default: 30)
//! * `API_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)
//! * `API_VIACEP_BASE_URL` - ViaCEP base URL (default: https://viacep.com.br)
//! * `API_LOOKUP_TIMEOUT_SECS` - Postal code lookup timeout (default: 5)
//! * `API_LOOKUP_RETRY_ATTEMPTS` - Retries after a transient lookup failure (default: 2)
//! * `API_MAX_PAGE_SIZE` - Largest page a client may request (default: 100)

use std::net::SocketAddr;
use std::sync::Arc;

use core_kernel::HealthCheckable;
use domain_customer::adapters::ViaCepAdapter;
use domain_customer::{AddressResolver, CustomerService};
use infra_db::{create_pool, run_migrations, PostgresAddressStore, PostgresCustomerStore};
use interface_api::{config::ApiConfig, create_router, AppState};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Main entry point for the API server.
///
/// Initializes logging, loads configuration, connects to the database, wires
/// the stores and the ViaCEP adapter into the customer service, and starts the
/// HTTP server.
///
/// # Errors
///
/// Returns an error if:
/// - The database cannot be reached or migrated
/// - The ViaCEP client cannot be built
/// - Server fails to bind to the configured address
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = load_config();

    init_tracing(&config.log_level);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        viacep = %config.viacep_base_url,
        "Starting Customer Registry API Server"
    );

    tracing::info!("Connecting to database...");
    let pool = create_pool(config.database()).await?;
    run_migrations(&pool).await?;
    tracing::info!("Database ready");

    let address_store = Arc::new(PostgresAddressStore::new(pool.clone()));
    let customer_store = Arc::new(PostgresCustomerStore::new(pool));
    let viacep = Arc::new(ViaCepAdapter::new(config.viacep())?);

    let resolver = AddressResolver::new(address_store.clone(), viacep.clone());
    let service = CustomerService::new(customer_store.clone(), resolver);
    let health: Vec<Arc<dyn HealthCheckable>> = vec![
        address_store as Arc<dyn HealthCheckable>,
        customer_store as Arc<dyn HealthCheckable>,
        viacep as Arc<dyn HealthCheckable>,
    ];

    let addr: SocketAddr = config.server_addr().parse()?;
    let app = create_router(AppState::new(service, health, config));

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Loads API configuration from environment variables.
///
/// Falls back to individual variables and defaults when the `API_` prefixed
/// set cannot be deserialized. `DATABASE_URL` wins over the configured URL.
fn load_config() -> ApiConfig {
    let mut config = ApiConfig::from_env().unwrap_or_else(|_| {
        let defaults = ApiConfig::default();
        ApiConfig {
            host: std::env::var("API_HOST").unwrap_or(defaults.host),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            database_url: std::env::var("API_DATABASE_URL").unwrap_or(defaults.database_url),
            log_level: std::env::var("API_LOG_LEVEL")
                .or_else(|_| std::env::var("RUST_LOG"))
                .unwrap_or(defaults.log_level),
            viacep_base_url: std::env::var("API_VIACEP_BASE_URL")
                .unwrap_or(defaults.viacep_base_url),
            ..defaults
        }
    });

    if let Ok(url) = std::env::var("DATABASE_URL") {
        config.database_url = url;
    }
    config
}

/// Initializes the tracing subscriber for structured logging.
///
/// # Arguments
///
/// * `log_level` - The minimum log level to output (trace, debug, info, warn, error)
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// In-flight requests complete before the process exits.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

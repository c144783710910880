//! Domain Adapters
//!
//! This module provides adapter implementations for domain ports,
//! connecting domain interfaces to the PostgreSQL database layer.
//!
//! # Architecture
//!
//! Each adapter:
//! - Implements a `domain_customer` port trait
//! - Translates between domain models and database row types
//! - Uses the repository layer for database operations
//!
//! # Usage
//!
//! ```rust,ignore
//! use infra_db::adapters::PostgresCustomerStore;
//! use domain_customer::CustomerStore;
//!
//! let store = PostgresCustomerStore::new(pool);
//! let customer = store.get(customer_id).await?;
//! ```

pub mod address;
pub mod customer;

pub use address::PostgresAddressStore;
pub use customer::PostgresCustomerStore;

use std::time::Instant;

use sqlx::PgPool;

use core_kernel::{AdapterHealth, HealthCheckResult};

/// Checks database connectivity with a `SELECT 1`
async fn ping(pool: &PgPool, adapter_id: &str) -> HealthCheckResult {
    let start = Instant::now();

    let result = sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(pool)
        .await;

    let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

    match result {
        Ok(_) => HealthCheckResult::now(adapter_id, AdapterHealth::Healthy, latency_ms, None),
        Err(e) => HealthCheckResult::now(
            adapter_id,
            AdapterHealth::Unhealthy,
            latency_ms,
            Some(format!("Database error: {}", e)),
        ),
    }
}

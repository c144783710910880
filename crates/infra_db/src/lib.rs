//! Infrastructure Database Layer
//!
//! This crate provides the PostgreSQL storage for the customer registry using
//! SQLx.
//!
//! # Architecture
//!
//! The crate follows the repository pattern. Repositories own the SQL and
//! return row types; adapters implement the `AddressStore` and `CustomerStore`
//! ports from `domain_customer` on top of them.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, run_migrations, DatabaseConfig};
//! use infra_db::adapters::{PostgresAddressStore, PostgresCustomerStore};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/customers")).await?;
//! run_migrations(&pool).await?;
//! let customers = PostgresCustomerStore::new(pool.clone());
//! let addresses = PostgresAddressStore::new(pool);
//! ```

pub mod pool;
pub mod error;
pub mod repositories;
pub mod adapters;

pub use pool::{create_pool, run_migrations, DatabaseConfig, DatabasePool};
pub use error::DatabaseError;
pub use adapters::{PostgresAddressStore, PostgresCustomerStore};

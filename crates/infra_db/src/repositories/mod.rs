//! Repository implementations for domain entities
//!
//! This module provides concrete repository implementations that handle
//! database access for each table. Repositories encapsulate SQL queries and
//! hand back plain row types; adapters map those rows to domain types.
//!
//! # Architecture
//!
//! Each repository follows these principles:
//! - Runtime-checked queries with bound parameters only
//! - Transaction support for multi-row writes
//! - Whitelisted ordering columns, never caller-provided SQL

pub mod address;
pub mod customer;

pub use address::{AddressRepository, AddressRow};
pub use customer::{CustomerRepository, CustomerRow, NewCustomerRow, OrderColumn, PageWindow};

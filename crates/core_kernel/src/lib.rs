//! Core Kernel - Foundational types shared by every layer of the customer registry
//!
//! This crate provides the building blocks used across the domain, infrastructure
//! and API crates:
//! - Strongly-typed identifiers and the normalized postal code key
//! - Page requests, sort specifications and page envelopes
//! - Port error type and adapter health abstractions

pub mod identifiers;
pub mod postal_code;
pub mod pagination;
pub mod ports;
pub mod error;

pub use identifiers::CustomerId;
pub use postal_code::PostalCode;
pub use pagination::{Page, PageRequest, Sort, SortDirection, SortField, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use ports::{
    PortError, DomainPort, HealthCheckable, HealthCheckResult, AdapterHealth,
    HealthReport, CircuitBreakerConfig,
};
pub use error::CoreError;

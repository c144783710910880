//! External Adapters for the Customer Domain
//!
//! This module provides adapter implementations for the external systems the
//! customer domain talks to directly. Persistence adapters live in `infra_db`.
//!
//! # Available Adapters
//!
//! - **ViaCepAdapter**: Brazilian postal code lookup via the ViaCEP REST API
//! - **MockLookupProvider**: scripted provider for testing (re-exported from the
//!   ports module under the `mock` feature)
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_customer::adapters::{ViaCepAdapter, ViaCepConfig};
//! use domain_customer::AddressLookupProvider;
//! use std::sync::Arc;
//!
//! let adapter = ViaCepAdapter::new(ViaCepConfig::default())?;
//! let provider: Arc<dyn AddressLookupProvider> = Arc::new(adapter);
//! ```

pub mod viacep;

pub use viacep::{ViaCepAdapter, ViaCepConfig};

#[cfg(any(test, feature = "mock"))]
pub use crate::ports::mock::MockLookupProvider;

//! Customer domain errors
//!
//! This module defines the error taxonomy surfaced by the address resolver and
//! the customer service: missing records, failed address lookups, invalid
//! payloads, and store failures.

use std::fmt;

use thiserror::Error;

use core_kernel::{CoreError, PortError, PostalCode};

/// Why an address lookup failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupFailureKind {
    /// The provider rejected the code as malformed
    MalformedPostalCode,
    /// The provider has no address for the code
    UnknownPostalCode,
    /// The provider could not be reached, timed out, or failed
    ProviderUnavailable,
}

impl LookupFailureKind {
    /// Classifies a provider error
    pub fn from_port_error(error: &PortError) -> Self {
        match error {
            PortError::Validation { .. } => LookupFailureKind::MalformedPostalCode,
            PortError::NotFound { .. } => LookupFailureKind::UnknownPostalCode,
            _ => LookupFailureKind::ProviderUnavailable,
        }
    }
}

impl fmt::Display for LookupFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            LookupFailureKind::MalformedPostalCode => "malformed postal code",
            LookupFailureKind::UnknownPostalCode => "unknown postal code",
            LookupFailureKind::ProviderUnavailable => "lookup provider unavailable",
        };
        f.write_str(text)
    }
}

/// Errors that can occur in the customer domain
#[derive(Debug, Error)]
pub enum CustomerError {
    /// A customer or stored address required by the operation does not exist
    #[error("{entity} not found: {key}")]
    NotFound {
        entity: &'static str,
        key: String,
    },

    /// The external provider could not produce an address
    #[error("Address lookup failed for postal code {postal_code}: {kind}")]
    LookupFailed {
        postal_code: PostalCode,
        kind: LookupFailureKind,
        #[source]
        source: PortError,
    },

    /// The payload is malformed
    #[error("Validation error: {0}")]
    Validation(String),

    /// A store operation failed
    #[error("Store error: {0}")]
    Store(#[from] PortError),
}

impl CustomerError {
    /// Creates a NotFound error for a customer
    pub fn customer_not_found(id: impl fmt::Display) -> Self {
        CustomerError::NotFound {
            entity: "Customer",
            key: id.to_string(),
        }
    }

    /// Creates a NotFound error for a stored address
    pub fn address_not_found(postal_code: &PostalCode) -> Self {
        CustomerError::NotFound {
            entity: "Address",
            key: postal_code.to_string(),
        }
    }

    /// Wraps a provider failure for `postal_code`
    pub fn lookup_failed(postal_code: &PostalCode, source: PortError) -> Self {
        CustomerError::LookupFailed {
            postal_code: postal_code.clone(),
            kind: LookupFailureKind::from_port_error(&source),
            source,
        }
    }

    /// Creates a Validation error with a message
    pub fn validation(message: impl Into<String>) -> Self {
        CustomerError::Validation(message.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CustomerError::NotFound { .. })
    }

    /// Returns the lookup failure kind, if this is a lookup failure
    pub fn lookup_failure_kind(&self) -> Option<LookupFailureKind> {
        match self {
            CustomerError::LookupFailed { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

impl From<CoreError> for CustomerError {
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::Validation(message) | CoreError::InvalidIdentifier(message) => {
                CustomerError::Validation(message)
            }
        }
    }
}

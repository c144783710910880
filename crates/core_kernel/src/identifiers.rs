//! Strongly-typed identifiers for domain entities
//!
//! Customers are keyed by a store-assigned numeric identifier. Wrapping it in a
//! newtype keeps raw integers (page numbers, counts) from being passed where a
//! customer id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Identifier of a stored customer, assigned by the customer store on first save
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(i64);

impl CustomerId {
    const PREFIX: &'static str = "CUS";

    /// Wraps a raw store identifier
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the raw store identifier
    pub fn value(&self) -> i64 {
        self.0
    }

    /// Returns the identifier prefix used in display form
    pub fn prefix() -> &'static str {
        Self::PREFIX
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", Self::PREFIX, self.0)
    }
}

impl FromStr for CustomerId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s
            .strip_prefix(Self::PREFIX)
            .and_then(|rest| rest.strip_prefix('-'))
            .unwrap_or(s);
        raw.parse::<i64>()
            .map(Self)
            .map_err(|_| CoreError::invalid_identifier(format!("'{}' is not a customer id", s)))
    }
}

impl From<i64> for CustomerId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<CustomerId> for i64 {
    fn from(id: CustomerId) -> i64 {
        id.0
    }
}

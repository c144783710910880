//! Request handlers

pub mod addresses;
pub mod customers;
pub mod health;

use core_kernel::{CustomerId, PostalCode};

use crate::error::ApiError;

/// Parses a customer id path segment, accepting `7` and `CUS-7`
pub(crate) fn parse_customer_id(raw: &str) -> Result<CustomerId, ApiError> {
    Ok(raw.parse::<CustomerId>()?)
}

pub(crate) fn parse_postal_code(raw: &str) -> Result<PostalCode, ApiError> {
    Ok(PostalCode::parse(raw)?)
}

//! Customer entity and the write models used to create or change it
//!
//! A stored `Customer` always holds an address that has already been persisted
//! in the address store. Write models (`NewCustomer`, `CustomerPatch`) only carry
//! a postal code; the service resolves it to a canonical `Address` before
//! anything reaches the customer store.

use serde::{Deserialize, Serialize};

use core_kernel::{CustomerId, PostalCode};

use crate::address::Address;
use crate::error::CustomerError;

/// A stored customer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub address: Address,
}

/// A customer ready to be written to the store
///
/// `id` is `None` for a new record (the store assigns one) and `Some` when an
/// existing record is being replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerDraft {
    pub id: Option<CustomerId>,
    pub name: String,
    pub address: Address,
}

impl CustomerDraft {
    /// Draft for a record the store has not seen yet
    pub fn new(name: impl Into<String>, address: Address) -> Self {
        Self {
            id: None,
            name: name.into(),
            address,
        }
    }

    /// Draft replacing the record stored under `id`
    pub fn replacing(id: CustomerId, name: impl Into<String>, address: Address) -> Self {
        Self {
            id: Some(id),
            name: name.into(),
            address,
        }
    }

    /// Materializes the draft once the store has settled on an id
    pub fn into_customer(self, id: CustomerId) -> Customer {
        Customer {
            id,
            name: self.name,
            address: self.address,
        }
    }
}

impl From<Customer> for CustomerDraft {
    fn from(customer: Customer) -> Self {
        Self::replacing(customer.id, customer.name, customer.address)
    }
}

/// Payload for creating a customer or fully replacing one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCustomer {
    pub name: String,
    pub postal_code: PostalCode,
}

impl NewCustomer {
    pub fn new(name: impl Into<String>, postal_code: PostalCode) -> Self {
        Self {
            name: name.into(),
            postal_code,
        }
    }

    /// Checks the payload before any address is resolved
    pub fn validate(&self) -> Result<(), CustomerError> {
        validate_name(&self.name)
    }
}

/// Address portion of a partial update
///
/// The postal code is kept raw so that an address object without a code can be
/// told apart from an absent address object and rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressPatch {
    pub postal_code: Option<String>,
}

/// Field-level changes to an existing customer; absent fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerPatch {
    pub name: Option<String>,
    pub address: Option<AddressPatch>,
}

impl CustomerPatch {
    /// Patch that only renames
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            address: None,
        }
    }

    /// Patch that only moves the customer to another postal code
    pub fn postal_code(postal_code: impl Into<String>) -> Self {
        Self {
            name: None,
            address: Some(AddressPatch {
                postal_code: Some(postal_code.into()),
            }),
        }
    }

    /// Returns true if applying the patch changes nothing
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.address.is_none()
    }

    /// Validates the patch and extracts the requested postal code, if any
    ///
    /// # Errors
    ///
    /// `CustomerError::Validation` for a blank name, or for an address object
    /// whose postal code is missing or blank.
    pub fn requested_postal_code(&self) -> Result<Option<PostalCode>, CustomerError> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }

        match &self.address {
            None => Ok(None),
            Some(AddressPatch { postal_code: None }) => Err(CustomerError::validation(
                "address patch must contain a postal code",
            )),
            Some(AddressPatch {
                postal_code: Some(raw),
            }) => Ok(Some(PostalCode::parse(raw)?)),
        }
    }
}

/// Result of a full-replace update
///
/// Updating an id that does not exist creates nothing and is not an error; the
/// caller decides what an absent target means for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated(Customer),
    NotFound,
}

impl UpdateOutcome {
    pub fn is_updated(&self) -> bool {
        matches!(self, UpdateOutcome::Updated(_))
    }

    pub fn into_customer(self) -> Option<Customer> {
        match self {
            UpdateOutcome::Updated(customer) => Some(customer),
            UpdateOutcome::NotFound => None,
        }
    }
}

fn validate_name(name: &str) -> Result<(), CustomerError> {
    if name.trim().is_empty() {
        return Err(CustomerError::validation("customer name must not be blank"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_patch_requests_nothing() {
        let patch = CustomerPatch::default();
        assert!(patch.is_empty());
        assert_eq!(patch.requested_postal_code().unwrap(), None);
    }

    #[test]
    fn test_patch_normalizes_postal_code() {
        let patch = CustomerPatch::postal_code("01001-000");
        let code = patch.requested_postal_code().unwrap().unwrap();
        assert_eq!(code.as_str(), "01001000");
    }

    #[test]
    fn test_address_patch_without_code_is_invalid() {
        let patch = CustomerPatch {
            name: None,
            address: Some(AddressPatch::default()),
        };
        assert!(matches!(
            patch.requested_postal_code(),
            Err(CustomerError::Validation(_))
        ));
    }

    #[test]
    fn test_blank_name_is_invalid() {
        assert!(CustomerPatch::name("  ").requested_postal_code().is_err());
        let customer = NewCustomer::new("", PostalCode::parse("00000").unwrap());
        assert!(customer.validate().is_err());
    }

    #[test]
    fn test_update_outcome() {
        assert!(!UpdateOutcome::NotFound.is_updated());
        assert_eq!(UpdateOutcome::NotFound.into_customer(), None);
    }
}

//! Customer DTOs
//!
//! Clients only ever send a postal code for the address; the rest of the
//! address is filled in by resolution.

use serde::{Deserialize, Serialize};

use core_kernel::PostalCode;
use domain_customer::{AddressPatch, Customer, CustomerPatch, NewCustomer};

use crate::dto::address::AddressResponse;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct AddressRequest {
    #[serde(alias = "cep")]
    pub postal_code: Option<String>,
}

/// Body of a create, full update, or batch entry
#[derive(Debug, Deserialize)]
pub struct CustomerRequest {
    pub name: String,
    pub address: AddressRequest,
}

impl CustomerRequest {
    /// Validates the body and turns it into a domain write model
    pub fn into_domain(self) -> Result<NewCustomer, ApiError> {
        let raw = self
            .address
            .postal_code
            .ok_or_else(|| ApiError::Validation("address.postal_code is required".to_string()))?;
        let postal_code = PostalCode::parse(&raw)?;
        Ok(NewCustomer::new(self.name, postal_code))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PatchAddressRequest {
    #[serde(default, alias = "cep")]
    pub postal_code: Option<String>,
}

/// Body of a partial update; absent and `null` fields are left untouched
#[derive(Debug, Default, Deserialize)]
pub struct PatchCustomerRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<PatchAddressRequest>,
}

impl From<PatchCustomerRequest> for CustomerPatch {
    fn from(request: PatchCustomerRequest) -> Self {
        CustomerPatch {
            name: request.name,
            address: request.address.map(|address| AddressPatch {
                postal_code: address.postal_code,
            }),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CustomerResponse {
    pub id: i64,
    pub name: String,
    pub address: AddressResponse,
}

impl From<Customer> for CustomerResponse {
    fn from(customer: Customer) -> Self {
        Self {
            id: customer.id.value(),
            name: customer.name,
            address: customer.address.into(),
        }
    }
}

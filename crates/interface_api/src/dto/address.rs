//! Address DTOs

use serde::Serialize;

use domain_customer::Address;

#[derive(Debug, Serialize)]
pub struct AddressResponse {
    pub postal_code: String,
    pub street: String,
    pub complement: String,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
    pub ibge: String,
    pub gia: String,
    pub ddd: String,
    pub siafi: String,
}

impl From<Address> for AddressResponse {
    fn from(address: Address) -> Self {
        Self {
            postal_code: address.postal_code.to_string(),
            street: address.street,
            complement: address.complement,
            neighborhood: address.neighborhood,
            city: address.city,
            state: address.state,
            ibge: address.ibge,
            gia: address.gia,
            ddd: address.ddd,
            siafi: address.siafi,
        }
    }
}

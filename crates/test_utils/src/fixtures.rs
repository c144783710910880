//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for postal codes, addresses, and customer
//! payloads. These fixtures are consistent and predictable for unit tests.

use core_kernel::PostalCode;
use domain_customer::{Address, NewCustomer};

/// Fixture for postal codes
pub struct PostalCodeFixtures;

impl PostalCodeFixtures {
    /// Praça da Sé, São Paulo
    pub fn se() -> PostalCode {
        Self::parse("01001000")
    }

    /// Avenida Paulista, São Paulo
    pub fn paulista() -> PostalCode {
        Self::parse("01310100")
    }

    /// Short code served by the mock provider only
    pub fn springfield() -> PostalCode {
        Self::parse("00000")
    }

    /// Well-formed code the provider does not know
    pub fn unknown() -> PostalCode {
        Self::parse("99999999")
    }

    /// Code the mock provider is scripted to reject as malformed
    pub fn malformed() -> PostalCode {
        Self::parse("Z")
    }

    fn parse(raw: &str) -> PostalCode {
        PostalCode::parse(raw).expect("fixture postal code must parse")
    }
}

/// Fixture for addresses as the provider publishes them
pub struct AddressFixtures;

impl AddressFixtures {
    pub fn se() -> Address {
        Address {
            postal_code: PostalCodeFixtures::se(),
            street: "Praça da Sé".to_string(),
            complement: "lado ímpar".to_string(),
            neighborhood: "Sé".to_string(),
            city: "São Paulo".to_string(),
            state: "SP".to_string(),
            ibge: "3550308".to_string(),
            gia: "1004".to_string(),
            ddd: "11".to_string(),
            siafi: "7107".to_string(),
        }
    }

    pub fn paulista() -> Address {
        Address {
            postal_code: PostalCodeFixtures::paulista(),
            street: "Avenida Paulista".to_string(),
            complement: "de 612 a 1510 - lado par".to_string(),
            neighborhood: "Bela Vista".to_string(),
            city: "São Paulo".to_string(),
            state: "SP".to_string(),
            ibge: "3550308".to_string(),
            gia: "1004".to_string(),
            ddd: "11".to_string(),
            siafi: "7107".to_string(),
        }
    }

    pub fn springfield() -> Address {
        Address::new(PostalCodeFixtures::springfield())
            .with_street("Main St")
            .with_city("Springfield")
    }

    /// Every address the default mock provider knows
    pub fn all() -> Vec<Address> {
        vec![Self::se(), Self::paulista(), Self::springfield()]
    }
}

/// Fixture for customer payloads
pub struct CustomerFixtures;

impl CustomerFixtures {
    pub fn alice() -> NewCustomer {
        NewCustomer::new("Alice", PostalCodeFixtures::springfield())
    }

    pub fn bob() -> NewCustomer {
        NewCustomer::new("Bob", PostalCodeFixtures::se())
    }

    pub fn carol() -> NewCustomer {
        NewCustomer::new("Carol", PostalCodeFixtures::paulista())
    }

    /// JSON body accepted by the create and replace endpoints
    pub fn json_payload(name: &str, postal_code: &str) -> serde_json::Value {
        serde_json::json!({
            "name": name,
            "address": { "postal_code": postal_code }
        })
    }
}

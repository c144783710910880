//! Address types
//!
//! An address is keyed by its postal code and shared by every customer living
//! under that code. Addresses carry no back-reference to customers.

use serde::{Deserialize, Serialize};

use core_kernel::PostalCode;

/// A postal address as published by the lookup provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub postal_code: PostalCode,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub complement: String,
    #[serde(default)]
    pub neighborhood: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    /// IBGE municipality code
    #[serde(default)]
    pub ibge: String,
    /// GIA code (Sao Paulo state tax registry)
    #[serde(default)]
    pub gia: String,
    /// Telephone area code
    #[serde(default)]
    pub ddd: String,
    /// SIAFI municipality code
    #[serde(default)]
    pub siafi: String,
}

impl Address {
    /// Creates an address with only its key set
    pub fn new(postal_code: PostalCode) -> Self {
        Self {
            postal_code,
            street: String::new(),
            complement: String::new(),
            neighborhood: String::new(),
            city: String::new(),
            state: String::new(),
            ibge: String::new(),
            gia: String::new(),
            ddd: String::new(),
            siafi: String::new(),
        }
    }

    pub fn with_street(mut self, street: impl Into<String>) -> Self {
        self.street = street.into();
        self
    }

    pub fn with_neighborhood(mut self, neighborhood: impl Into<String>) -> Self {
        self.neighborhood = neighborhood.into();
        self
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = city.into();
        self
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = state.into();
        self
    }
}

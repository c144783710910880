//! Customer Management Domain
//!
//! This crate manages customers and the postal addresses they live at.
//!
//! # Address Resolution
//!
//! Customers never carry free-form addresses. Every write names a postal code,
//! and the [`AddressResolver`] turns it into a canonical [`Address`]:
//!
//! - A code already in the [`AddressStore`] is served from there
//! - A missing code is fetched from the [`AddressLookupProvider`] and stored
//! - A forced sync always refetches and overwrites the stored address
//!
//! Customers sharing a postal code share one stored address.
//!
//! # Examples
//!
//! ```rust,ignore
//! use domain_customer::{AddressResolver, CustomerService, NewCustomer};
//! use core_kernel::PostalCode;
//!
//! let service = CustomerService::new(customer_store, AddressResolver::new(address_store, viacep));
//! let customer = service
//!     .insert(NewCustomer::new("Alice", PostalCode::parse("01001-000")?))
//!     .await?;
//! assert_eq!(customer.address.city, "São Paulo");
//! ```

pub mod adapters;
pub mod address;
pub mod customer;
pub mod error;
pub mod ports;
pub mod resolver;
pub mod service;

pub use address::Address;
pub use customer::{
    AddressPatch, Customer, CustomerDraft, CustomerPatch, NewCustomer, UpdateOutcome,
};
pub use error::{CustomerError, LookupFailureKind};
pub use ports::{AddressLookupProvider, AddressStore, CustomerStore};
pub use resolver::AddressResolver;
pub use service::CustomerService;

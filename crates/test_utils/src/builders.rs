//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible defaults,
//! and for wiring a `CustomerService` over the in-memory ports. Tests specify
//! only the relevant pieces and use defaults for everything else.

use std::sync::Arc;

use fake::faker::name::en::Name;
use fake::Fake;

use core_kernel::PostalCode;
use domain_customer::ports::mock::{
    InMemoryAddressStore, InMemoryCustomerStore, MockLookupProvider, ScriptedFailure,
};
use domain_customer::{Address, AddressResolver, CustomerService, NewCustomer};

use crate::fixtures::{AddressFixtures, PostalCodeFixtures};

/// Builder for customer payloads
pub struct NewCustomerBuilder {
    name: String,
    postal_code: PostalCode,
}

impl Default for NewCustomerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl NewCustomerBuilder {
    /// Creates a builder with a random name living at the Springfield fixture
    pub fn new() -> Self {
        Self {
            name: Name().fake(),
            postal_code: PostalCodeFixtures::springfield(),
        }
    }

    /// Sets the name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the postal code
    pub fn with_postal_code(mut self, postal_code: PostalCode) -> Self {
        self.postal_code = postal_code;
        self
    }

    pub fn build(self) -> NewCustomer {
        NewCustomer::new(self.name, self.postal_code)
    }

    /// Builds `count` payloads with distinct random names at the same code
    pub fn build_many(self, count: usize) -> Vec<NewCustomer> {
        (0..count)
            .map(|i| {
                let name: String = Name().fake();
                NewCustomer::new(format!("{name} {i}"), self.postal_code.clone())
            })
            .collect()
    }
}

/// A `CustomerService` over in-memory ports, with handles to each port
pub struct MockedCustomerService {
    pub service: CustomerService,
    pub customers: Arc<InMemoryCustomerStore>,
    pub addresses: Arc<InMemoryAddressStore>,
    pub provider: Arc<MockLookupProvider>,
}

impl MockedCustomerService {
    /// Service whose provider knows every address fixture and rejects the
    /// malformed fixture code
    pub async fn new() -> Self {
        MockedCustomerServiceBuilder::new().build().await
    }
}

/// Builder for [`MockedCustomerService`]
pub struct MockedCustomerServiceBuilder {
    upstream: Vec<Address>,
    stored: Vec<Address>,
    failures: Vec<(PostalCode, ScriptedFailure)>,
}

impl Default for MockedCustomerServiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MockedCustomerServiceBuilder {
    pub fn new() -> Self {
        Self {
            upstream: AddressFixtures::all(),
            stored: Vec::new(),
            failures: vec![(PostalCodeFixtures::malformed(), ScriptedFailure::Malformed)],
        }
    }

    /// Replaces the addresses the provider knows
    pub fn with_upstream(mut self, addresses: Vec<Address>) -> Self {
        self.upstream = addresses;
        self
    }

    /// Pre-populates the address store
    pub fn with_stored(mut self, addresses: Vec<Address>) -> Self {
        self.stored = addresses;
        self
    }

    /// Makes the provider fail for `postal_code`
    pub fn with_failure(mut self, postal_code: PostalCode, failure: ScriptedFailure) -> Self {
        self.failures.push((postal_code, failure));
        self
    }

    pub async fn build(self) -> MockedCustomerService {
        let provider = Arc::new(MockLookupProvider::with_addresses(self.upstream).await);
        for (postal_code, failure) in self.failures {
            provider.fail_with(postal_code, failure).await;
        }
        let addresses = Arc::new(InMemoryAddressStore::with_addresses(self.stored).await);
        let customers = Arc::new(InMemoryCustomerStore::new());

        let resolver = AddressResolver::new(addresses.clone(), provider.clone());
        let service = CustomerService::new(customers.clone(), resolver);

        MockedCustomerService {
            service,
            customers,
            addresses,
            provider,
        }
    }
}

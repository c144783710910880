//! Customer Domain Ports
//!
//! This module defines the port interfaces the customer domain needs from the
//! outside world:
//!
//! - **AddressStore**: persisted addresses keyed by postal code
//! - **AddressLookupProvider**: the external postal code service
//! - **CustomerStore**: persisted customers
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_customer::{AddressResolver, CustomerService};
//! use std::sync::Arc;
//!
//! let resolver = AddressResolver::new(address_store, lookup_provider);
//! let service = CustomerService::new(customer_store, resolver);
//! ```
//!
//! # Configuration
//!
//! Adapters are chosen at application startup. Production wires the PostgreSQL
//! stores from `infra_db` and the ViaCEP adapter; tests use the in-memory ports
//! from the [`mock`] module.

use async_trait::async_trait;

use core_kernel::{CustomerId, DomainPort, HealthCheckable, Page, PageRequest, PortError, PostalCode};

use crate::address::Address;
use crate::customer::{Customer, CustomerDraft};

/// Persistence port for addresses
///
/// The store must provide atomic per-key reads and writes; callers do not lock.
#[async_trait]
pub trait AddressStore: DomainPort + HealthCheckable {
    /// Returns the stored address for `postal_code`, if any
    async fn get(&self, postal_code: &PostalCode) -> Result<Option<Address>, PortError>;

    /// Inserts or replaces the address stored under its postal code
    async fn save(&self, address: Address) -> Result<Address, PortError>;

    /// Removes the stored address; removing an absent key is not an error
    async fn delete(&self, postal_code: &PostalCode) -> Result<(), PortError>;

    /// Returns every stored address ordered by postal code
    async fn find_all(&self) -> Result<Vec<Address>, PortError>;
}

/// External postal code lookup
///
/// Implementations bound their own latency; a timeout is reported as
/// `PortError::Timeout`. Malformed codes are reported as `PortError::Validation`
/// and unknown codes as `PortError::NotFound`.
#[async_trait]
pub trait AddressLookupProvider: DomainPort + HealthCheckable {
    async fn lookup(&self, postal_code: &PostalCode) -> Result<Address, PortError>;
}

/// Persistence port for customers
#[async_trait]
pub trait CustomerStore: DomainPort + HealthCheckable {
    /// Returns the customer stored under `id`, if any
    async fn get(&self, id: CustomerId) -> Result<Option<Customer>, PortError>;

    /// Inserts a new customer or replaces the one under `draft.id`
    async fn save(&self, draft: CustomerDraft) -> Result<Customer, PortError>;

    /// Saves every draft or none of them, returning customers in input order
    async fn save_all(&self, drafts: Vec<CustomerDraft>) -> Result<Vec<Customer>, PortError>;

    /// Removes the customer; removing an absent id is not an error
    async fn delete(&self, id: CustomerId) -> Result<(), PortError>;

    /// Returns every customer ordered by id
    async fn find_all(&self) -> Result<Vec<Customer>, PortError>;

    /// Returns one page of customers
    async fn find_page(&self, request: &PageRequest) -> Result<Page<Customer>, PortError>;

    /// Returns one page of customers whose name contains `fragment`, ignoring case
    async fn find_by_name_containing(
        &self,
        fragment: &str,
        request: &PageRequest,
    ) -> Result<Page<Customer>, PortError>;

    /// Checks if a customer exists
    async fn exists(&self, id: CustomerId) -> Result<bool, PortError> {
        Ok(self.get(id).await?.is_some())
    }
}

/// In-memory implementations of the customer domain ports for testing
///
/// These adapters keep everything in process memory and count the calls that
/// matter to resolution tests (provider lookups, address writes).
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::{BTreeMap, HashMap};
    use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::RwLock;

    use core_kernel::{AdapterHealth, HealthCheckResult, SortDirection, SortField};

    /// In-memory address store
    #[derive(Debug, Default)]
    pub struct InMemoryAddressStore {
        addresses: Arc<RwLock<BTreeMap<PostalCode, Address>>>,
        saves: AtomicUsize,
    }

    impl InMemoryAddressStore {
        /// Creates an empty store
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates the store without counting the writes
        pub async fn with_addresses(addresses: Vec<Address>) -> Self {
            let store = Self::new();
            {
                let mut stored = store.addresses.write().await;
                for address in addresses {
                    stored.insert(address.postal_code.clone(), address);
                }
            }
            store
        }

        /// Number of `save` calls received
        pub fn save_count(&self) -> usize {
            self.saves.load(Ordering::SeqCst)
        }

        /// Number of stored addresses
        pub async fn len(&self) -> usize {
            self.addresses.read().await.len()
        }

        pub async fn is_empty(&self) -> bool {
            self.addresses.read().await.is_empty()
        }
    }

    impl DomainPort for InMemoryAddressStore {}

    #[async_trait]
    impl HealthCheckable for InMemoryAddressStore {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult::now(
                "in-memory-address-store",
                AdapterHealth::Healthy,
                0,
                Some("In-memory store always healthy".to_string()),
            )
        }
    }

    #[async_trait]
    impl AddressStore for InMemoryAddressStore {
        async fn get(&self, postal_code: &PostalCode) -> Result<Option<Address>, PortError> {
            Ok(self.addresses.read().await.get(postal_code).cloned())
        }

        async fn save(&self, address: Address) -> Result<Address, PortError> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            self.addresses
                .write()
                .await
                .insert(address.postal_code.clone(), address.clone());
            Ok(address)
        }

        async fn delete(&self, postal_code: &PostalCode) -> Result<(), PortError> {
            self.addresses.write().await.remove(postal_code);
            Ok(())
        }

        async fn find_all(&self) -> Result<Vec<Address>, PortError> {
            Ok(self.addresses.read().await.values().cloned().collect())
        }
    }

    /// In-memory customer store with store-assigned sequential ids
    #[derive(Debug)]
    pub struct InMemoryCustomerStore {
        customers: Arc<RwLock<BTreeMap<CustomerId, Customer>>>,
        next_id: AtomicI64,
        unavailable: AtomicBool,
    }

    impl Default for InMemoryCustomerStore {
        fn default() -> Self {
            Self {
                customers: Arc::new(RwLock::new(BTreeMap::new())),
                next_id: AtomicI64::new(1),
                unavailable: AtomicBool::new(false),
            }
        }
    }

    impl InMemoryCustomerStore {
        /// Creates an empty store
        pub fn new() -> Self {
            Self::default()
        }

        /// Makes every subsequent call fail with `ServiceUnavailable` (or recover)
        pub fn set_unavailable(&self, unavailable: bool) {
            self.unavailable.store(unavailable, Ordering::SeqCst);
        }

        /// Number of stored customers
        pub async fn len(&self) -> usize {
            self.customers.read().await.len()
        }

        pub async fn is_empty(&self) -> bool {
            self.customers.read().await.is_empty()
        }

        fn check_available(&self) -> Result<(), PortError> {
            if self.unavailable.load(Ordering::SeqCst) {
                return Err(PortError::unavailable("in-memory customer store"));
            }
            Ok(())
        }

        fn settle_id(&self, draft: &CustomerDraft) -> CustomerId {
            draft
                .id
                .unwrap_or_else(|| CustomerId::new(self.next_id.fetch_add(1, Ordering::SeqCst)))
        }

        fn ordered(mut customers: Vec<Customer>, request: &PageRequest) -> Vec<Customer> {
            let sort = request.sort();
            customers.sort_by(|a, b| {
                let ordering = match sort.field {
                    SortField::Id => a.id.cmp(&b.id),
                    SortField::Name => a
                        .name
                        .to_lowercase()
                        .cmp(&b.name.to_lowercase())
                        .then(a.id.cmp(&b.id)),
                };
                match sort.direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            });
            customers
        }
    }

    impl DomainPort for InMemoryCustomerStore {}

    #[async_trait]
    impl HealthCheckable for InMemoryCustomerStore {
        async fn health_check(&self) -> HealthCheckResult {
            let status = if self.unavailable.load(Ordering::SeqCst) {
                AdapterHealth::Unhealthy
            } else {
                AdapterHealth::Healthy
            };
            HealthCheckResult::now("in-memory-customer-store", status, 0, None)
        }
    }

    #[async_trait]
    impl CustomerStore for InMemoryCustomerStore {
        async fn get(&self, id: CustomerId) -> Result<Option<Customer>, PortError> {
            self.check_available()?;
            Ok(self.customers.read().await.get(&id).cloned())
        }

        async fn save(&self, draft: CustomerDraft) -> Result<Customer, PortError> {
            self.check_available()?;
            let id = self.settle_id(&draft);
            let customer = draft.into_customer(id);
            self.customers.write().await.insert(id, customer.clone());
            Ok(customer)
        }

        async fn save_all(&self, drafts: Vec<CustomerDraft>) -> Result<Vec<Customer>, PortError> {
            self.check_available()?;
            let mut customers = self.customers.write().await;
            let saved: Vec<Customer> = drafts
                .into_iter()
                .map(|draft| {
                    let id = self.settle_id(&draft);
                    draft.into_customer(id)
                })
                .collect();
            for customer in &saved {
                customers.insert(customer.id, customer.clone());
            }
            Ok(saved)
        }

        async fn delete(&self, id: CustomerId) -> Result<(), PortError> {
            self.check_available()?;
            self.customers.write().await.remove(&id);
            Ok(())
        }

        async fn find_all(&self) -> Result<Vec<Customer>, PortError> {
            self.check_available()?;
            Ok(self.customers.read().await.values().cloned().collect())
        }

        async fn find_page(&self, request: &PageRequest) -> Result<Page<Customer>, PortError> {
            let all = self.find_all().await?;
            Ok(Page::from_ordered(Self::ordered(all, request), request))
        }

        async fn find_by_name_containing(
            &self,
            fragment: &str,
            request: &PageRequest,
        ) -> Result<Page<Customer>, PortError> {
            let needle = fragment.to_lowercase();
            let matching = self
                .find_all()
                .await?
                .into_iter()
                .filter(|c| c.name.to_lowercase().contains(&needle))
                .collect();
            Ok(Page::from_ordered(Self::ordered(matching, request), request))
        }
    }

    /// Failure a [`MockLookupProvider`] can be scripted to return
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum ScriptedFailure {
        Malformed,
        NotFound,
        Unavailable,
        Timeout,
    }

    impl ScriptedFailure {
        fn to_port_error(self, postal_code: &PostalCode) -> PortError {
            match self {
                ScriptedFailure::Malformed => PortError::validation_field(
                    format!("'{}' is not a valid postal code", postal_code),
                    "postal_code",
                ),
                ScriptedFailure::NotFound => PortError::not_found("Address", postal_code),
                ScriptedFailure::Unavailable => PortError::unavailable("mock lookup provider"),
                ScriptedFailure::Timeout => PortError::Timeout {
                    operation: format!("lookup {}", postal_code),
                    duration_ms: 5000,
                },
            }
        }
    }

    /// Scripted lookup provider that records every call
    ///
    /// Codes without a scripted address or failure are reported as not found.
    #[derive(Debug, Default)]
    pub struct MockLookupProvider {
        addresses: RwLock<HashMap<PostalCode, Address>>,
        failures: RwLock<HashMap<PostalCode, ScriptedFailure>>,
        calls: RwLock<Vec<PostalCode>>,
    }

    impl MockLookupProvider {
        /// Creates a provider that knows no codes
        pub fn new() -> Self {
            Self::default()
        }

        /// Creates a provider that answers with the given addresses
        pub async fn with_addresses(addresses: Vec<Address>) -> Self {
            let provider = Self::new();
            for address in addresses {
                provider.set_address(address).await;
            }
            provider
        }

        /// Sets (or replaces) the upstream address for its postal code
        pub async fn set_address(&self, address: Address) {
            self.failures.write().await.remove(&address.postal_code);
            self.addresses
                .write()
                .await
                .insert(address.postal_code.clone(), address);
        }

        /// Makes lookups of `postal_code` fail
        pub async fn fail_with(&self, postal_code: PostalCode, failure: ScriptedFailure) {
            self.failures.write().await.insert(postal_code, failure);
        }

        /// Total number of lookups received
        pub async fn call_count(&self) -> usize {
            self.calls.read().await.len()
        }

        /// Number of lookups received for one code
        pub async fn calls_for(&self, postal_code: &PostalCode) -> usize {
            self.calls
                .read()
                .await
                .iter()
                .filter(|c| *c == postal_code)
                .count()
        }
    }

    impl DomainPort for MockLookupProvider {}

    #[async_trait]
    impl HealthCheckable for MockLookupProvider {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult::now("mock-lookup-provider", AdapterHealth::Healthy, 0, None)
        }
    }

    #[async_trait]
    impl AddressLookupProvider for MockLookupProvider {
        async fn lookup(&self, postal_code: &PostalCode) -> Result<Address, PortError> {
            self.calls.write().await.push(postal_code.clone());

            if let Some(failure) = self.failures.read().await.get(postal_code) {
                return Err(failure.to_port_error(postal_code));
            }

            self.addresses
                .read()
                .await
                .get(postal_code)
                .cloned()
                .ok_or_else(|| PortError::not_found("Address", postal_code))
        }
    }
}

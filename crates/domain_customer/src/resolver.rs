//! Address resolution
//!
//! The resolver turns a postal code into a canonical, persisted `Address`. The
//! address store acts as a read-through cache in front of the external lookup
//! provider: a stored address is returned as-is, a missing one is fetched and
//! stored before being returned.
//!
//! Two concurrent misses for the same code may both reach the provider. Both
//! writes store equivalent data, so the duplicate call is tolerated.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use core_kernel::PostalCode;

use crate::address::Address;
use crate::error::CustomerError;
use crate::ports::{AddressLookupProvider, AddressStore};

/// Resolves postal codes through the address store and the lookup provider
#[derive(Clone)]
pub struct AddressResolver {
    store: Arc<dyn AddressStore>,
    provider: Arc<dyn AddressLookupProvider>,
}

impl AddressResolver {
    pub fn new(store: Arc<dyn AddressStore>, provider: Arc<dyn AddressLookupProvider>) -> Self {
        Self { store, provider }
    }

    /// Returns the stored address for `postal_code`, fetching and storing it first
    /// if absent
    ///
    /// A stored address never triggers a provider call.
    ///
    /// # Errors
    ///
    /// `CustomerError::LookupFailed` if the code is absent and the provider
    /// fails; nothing is stored in that case.
    #[instrument(skip(self), fields(postal_code = %postal_code))]
    pub async fn resolve(&self, postal_code: &PostalCode) -> Result<Address, CustomerError> {
        if let Some(address) = self.store.get(postal_code).await? {
            debug!("Address served from store");
            return Ok(address);
        }

        let address = self.fetch(postal_code).await?;
        let stored = self.store.save(address).await?;
        info!("Address fetched and stored");
        Ok(stored)
    }

    /// Fetches `postal_code` from the provider unconditionally and overwrites the
    /// stored address
    ///
    /// # Errors
    ///
    /// `CustomerError::LookupFailed` if the provider fails; the stored address,
    /// if any, is left unchanged.
    #[instrument(skip(self), fields(postal_code = %postal_code))]
    pub async fn resolve_and_force_sync(
        &self,
        postal_code: &PostalCode,
    ) -> Result<Address, CustomerError> {
        let address = self.fetch(postal_code).await?;
        let stored = self.store.save(address).await?;
        info!("Address re-synchronized from provider");
        Ok(stored)
    }

    /// Fetches `postal_code` from the provider without touching the store
    #[instrument(skip(self), fields(postal_code = %postal_code))]
    pub async fn lookup_only(&self, postal_code: &PostalCode) -> Result<Address, CustomerError> {
        self.fetch(postal_code).await
    }

    /// Returns the stored address without consulting the provider
    ///
    /// # Errors
    ///
    /// `CustomerError::NotFound` if no address is stored under `postal_code`.
    pub async fn fetch_stored(&self, postal_code: &PostalCode) -> Result<Address, CustomerError> {
        self.store
            .get(postal_code)
            .await?
            .ok_or_else(|| CustomerError::address_not_found(postal_code))
    }

    /// Resolves several codes, each distinct code at most once
    ///
    /// Stops at the first failure. Addresses resolved before the failure stay
    /// stored; they are valid cache entries on their own.
    #[instrument(skip(self, postal_codes), fields(count = postal_codes.len()))]
    pub async fn resolve_many(
        &self,
        postal_codes: &[PostalCode],
    ) -> Result<HashMap<PostalCode, Address>, CustomerError> {
        let mut resolved = HashMap::with_capacity(postal_codes.len());
        for postal_code in postal_codes {
            if resolved.contains_key(postal_code) {
                continue;
            }
            let address = self.resolve(postal_code).await?;
            resolved.insert(postal_code.clone(), address);
        }
        debug!(distinct = resolved.len(), "Resolved postal codes");
        Ok(resolved)
    }

    async fn fetch(&self, postal_code: &PostalCode) -> Result<Address, CustomerError> {
        match self.provider.lookup(postal_code).await {
            Ok(mut address) => {
                // Key by the requested code even if the provider formats it differently
                address.postal_code = postal_code.clone();
                Ok(address)
            }
            Err(e) => {
                warn!(error = %e, "Address lookup failed");
                Err(CustomerError::lookup_failed(postal_code, e))
            }
        }
    }
}

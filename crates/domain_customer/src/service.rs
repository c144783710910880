//! Customer service
//!
//! Orchestrates customer writes around address resolution. Every write that
//! carries a postal code resolves it first; the customer store only ever sees
//! addresses that are already persisted.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use core_kernel::{CustomerId, Page, PageRequest, PostalCode};

use crate::address::Address;
use crate::customer::{Customer, CustomerDraft, CustomerPatch, NewCustomer, UpdateOutcome};
use crate::error::CustomerError;
use crate::ports::CustomerStore;
use crate::resolver::AddressResolver;

/// Application service for customer CRUD with address resolution
#[derive(Clone)]
pub struct CustomerService {
    customers: Arc<dyn CustomerStore>,
    resolver: AddressResolver,
}

impl CustomerService {
    pub fn new(customers: Arc<dyn CustomerStore>, resolver: AddressResolver) -> Self {
        Self {
            customers,
            resolver,
        }
    }

    /// The resolver this service resolves addresses through
    pub fn resolver(&self) -> &AddressResolver {
        &self.resolver
    }

    /// Creates a customer living at `new.postal_code`
    ///
    /// # Errors
    ///
    /// `Validation` for a blank name, `LookupFailed` if the code cannot be
    /// resolved. No customer is created on error.
    #[instrument(skip(self, new), fields(postal_code = %new.postal_code))]
    pub async fn insert(&self, new: NewCustomer) -> Result<Customer, CustomerError> {
        new.validate()?;
        let address = self.resolver.resolve(&new.postal_code).await?;
        let customer = self
            .customers
            .save(CustomerDraft::new(new.name, address))
            .await?;
        info!(customer_id = %customer.id, "Customer created");
        Ok(customer)
    }

    /// Replaces name and address of the customer stored under `id`
    ///
    /// Returns `UpdateOutcome::NotFound` without writing anything, and without
    /// validating the payload or resolving its postal code, when no such
    /// customer exists.
    #[instrument(skip(self, new), fields(customer_id = %id))]
    pub async fn update(
        &self,
        id: CustomerId,
        new: NewCustomer,
    ) -> Result<UpdateOutcome, CustomerError> {
        if !self.exists(id).await? {
            debug!("Update target does not exist");
            return Ok(UpdateOutcome::NotFound);
        }
        new.validate()?;

        let address = self.resolver.resolve(&new.postal_code).await?;
        let customer = self
            .customers
            .save(CustomerDraft::replacing(id, new.name, address))
            .await?;
        info!("Customer updated");
        Ok(UpdateOutcome::Updated(customer))
    }

    /// Applies the fields present in `patch` to the customer stored under `id`
    ///
    /// A new postal code is resolved before anything changes, so a failed
    /// resolution leaves the customer untouched.
    ///
    /// # Errors
    ///
    /// `NotFound` if the customer does not exist, `Validation` for a blank name
    /// or an address without a postal code, `LookupFailed` if the new code
    /// cannot be resolved.
    #[instrument(skip(self, patch), fields(customer_id = %id))]
    pub async fn partial_update(
        &self,
        id: CustomerId,
        patch: CustomerPatch,
    ) -> Result<Customer, CustomerError> {
        let postal_code = patch.requested_postal_code()?;
        let current = self
            .customers
            .get(id)
            .await?
            .ok_or_else(|| CustomerError::customer_not_found(id))?;

        if patch.is_empty() {
            return Ok(current);
        }

        let address = match postal_code {
            Some(code) => self.resolver.resolve(&code).await?,
            None => current.address,
        };
        let name = patch.name.unwrap_or(current.name);

        let customer = self
            .customers
            .save(CustomerDraft::replacing(id, name, address))
            .await?;
        info!("Customer partially updated");
        Ok(customer)
    }

    /// Creates every customer in `batch` or none of them
    ///
    /// All postal codes are resolved, each distinct code once, before any
    /// customer is written. Addresses resolved before a failure stay in the
    /// address store.
    #[instrument(skip(self, batch), fields(count = batch.len()))]
    pub async fn batch_insert(
        &self,
        batch: Vec<NewCustomer>,
    ) -> Result<Vec<Customer>, CustomerError> {
        if batch.is_empty() {
            return Ok(Vec::new());
        }
        for new in &batch {
            new.validate()?;
        }

        let codes: Vec<PostalCode> = batch.iter().map(|n| n.postal_code.clone()).collect();
        let addresses = self.resolver.resolve_many(&codes).await?;

        let drafts = batch
            .into_iter()
            .map(|new| {
                let address = addresses
                    .get(&new.postal_code)
                    .cloned()
                    .ok_or_else(|| CustomerError::address_not_found(&new.postal_code))?;
                Ok(CustomerDraft::new(new.name, address))
            })
            .collect::<Result<Vec<_>, CustomerError>>()?;

        let customers = self.customers.save_all(drafts).await?;
        info!(created = customers.len(), "Customer batch created");
        Ok(customers)
    }

    /// Removes the customer stored under `id`, if there is one
    ///
    /// Deleting an unknown id succeeds and changes nothing. The shared address
    /// is never removed.
    #[instrument(skip(self), fields(customer_id = %id))]
    pub async fn delete(&self, id: CustomerId) -> Result<(), CustomerError> {
        self.customers.delete(id).await?;
        info!("Customer deleted");
        Ok(())
    }

    /// Returns true if a customer is stored under `id`
    pub async fn exists(&self, id: CustomerId) -> Result<bool, CustomerError> {
        Ok(self.customers.exists(id).await?)
    }

    pub async fn find_all(&self) -> Result<Vec<Customer>, CustomerError> {
        Ok(self.customers.find_all().await?)
    }

    /// Returns the customer stored under `id`
    pub async fn find_by_id(&self, id: CustomerId) -> Result<Customer, CustomerError> {
        self.customers
            .get(id)
            .await?
            .ok_or_else(|| CustomerError::customer_not_found(id))
    }

    pub async fn find_paginated(
        &self,
        request: &PageRequest,
    ) -> Result<Page<Customer>, CustomerError> {
        Ok(self.customers.find_page(request).await?)
    }

    /// Returns customers whose name contains `fragment`, ignoring case
    ///
    /// A blank fragment matches every customer.
    pub async fn find_by_name_contains(
        &self,
        fragment: &str,
        request: &PageRequest,
    ) -> Result<Page<Customer>, CustomerError> {
        Ok(self
            .customers
            .find_by_name_containing(fragment.trim(), request)
            .await?)
    }

    /// Looks a postal code up at the provider without storing anything
    pub async fn lookup_address(&self, postal_code: &PostalCode) -> Result<Address, CustomerError> {
        self.resolver.lookup_only(postal_code).await
    }

    /// Returns the stored address for a postal code
    pub async fn stored_address(&self, postal_code: &PostalCode) -> Result<Address, CustomerError> {
        self.resolver.fetch_stored(postal_code).await
    }

    /// Refreshes the stored address for a postal code from the provider
    pub async fn sync_address(&self, postal_code: &PostalCode) -> Result<Address, CustomerError> {
        self.resolver.resolve_and_force_sync(postal_code).await
    }
}

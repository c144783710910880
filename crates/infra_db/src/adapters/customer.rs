//! PostgreSQL Customer Store
//!
//! Implements the `CustomerStore` port on the `customers` table. The address a
//! customer points at must already be stored; the foreign key rejects anything
//! else as a conflict.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use core_kernel::{
    CustomerId, DomainPort, HealthCheckResult, HealthCheckable, Page, PageRequest, PortError,
    SortDirection, SortField,
};
use domain_customer::{Customer, CustomerDraft, CustomerStore};

use crate::adapters::address::row_to_address;
use crate::repositories::address::AddressRow;
use crate::repositories::customer::{
    CustomerRepository, CustomerRow, NewCustomerRow, OrderColumn, PageWindow,
};

/// PostgreSQL-backed implementation of the CustomerStore trait
///
/// # Error Handling
///
/// Database errors are translated to `PortError` variants:
/// - missing rows on update -> `PortError::NotFound`
/// - constraint violations -> `PortError::Conflict`
/// - connection problems -> `PortError::Connection`
/// - other errors -> `PortError::Internal`
#[derive(Debug, Clone)]
pub struct PostgresCustomerStore {
    repository: CustomerRepository,
    pool: PgPool,
}

impl PostgresCustomerStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: CustomerRepository::new(pool.clone()),
            pool,
        }
    }

    /// Returns a reference to the underlying repository
    pub fn repository(&self) -> &CustomerRepository {
        &self.repository
    }

    async fn page(
        &self,
        name_fragment: Option<&str>,
        request: &PageRequest,
    ) -> Result<Page<Customer>, PortError> {
        let (rows, total) = self
            .repository
            .page(name_fragment, page_window(request))
            .await?;
        let customers = rows
            .into_iter()
            .map(row_to_customer)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(customers, request, total.max(0) as u64))
    }
}

impl DomainPort for PostgresCustomerStore {}

#[async_trait]
impl HealthCheckable for PostgresCustomerStore {
    async fn health_check(&self) -> HealthCheckResult {
        super::ping(&self.pool, "postgres-customer-store").await
    }
}

#[async_trait]
impl CustomerStore for PostgresCustomerStore {
    #[instrument(skip(self), fields(customer_id = %id))]
    async fn get(&self, id: CustomerId) -> Result<Option<Customer>, PortError> {
        debug!("Fetching customer by ID");
        self.repository
            .find(id.value())
            .await?
            .map(row_to_customer)
            .transpose()
    }

    #[instrument(skip(self, draft))]
    async fn save(&self, draft: CustomerDraft) -> Result<Customer, PortError> {
        let row = draft_to_row(&draft);
        let id = match draft.id {
            Some(id) => {
                debug!(customer_id = %id, "Updating customer");
                self.repository.update(id.value(), &row).await?;
                id
            }
            None => {
                debug!("Inserting customer");
                CustomerId::new(self.repository.insert(&row).await?)
            }
        };
        Ok(draft.into_customer(id))
    }

    #[instrument(skip(self, drafts), fields(count = drafts.len()))]
    async fn save_all(&self, drafts: Vec<CustomerDraft>) -> Result<Vec<Customer>, PortError> {
        let rows: Vec<(Option<i64>, NewCustomerRow)> = drafts
            .iter()
            .map(|draft| (draft.id.map(|id| id.value()), draft_to_row(draft)))
            .collect();

        let ids = self.repository.save_all(&rows).await?;

        Ok(drafts
            .into_iter()
            .zip(ids)
            .map(|(draft, id)| draft.into_customer(CustomerId::new(id)))
            .collect())
    }

    #[instrument(skip(self), fields(customer_id = %id))]
    async fn delete(&self, id: CustomerId) -> Result<(), PortError> {
        if !self.repository.delete(id.value()).await? {
            debug!("No customer row to delete");
        }
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<Customer>, PortError> {
        self.repository
            .list()
            .await?
            .into_iter()
            .map(row_to_customer)
            .collect()
    }

    #[instrument(skip(self))]
    async fn find_page(&self, request: &PageRequest) -> Result<Page<Customer>, PortError> {
        self.page(None, request).await
    }

    #[instrument(skip(self))]
    async fn find_by_name_containing(
        &self,
        fragment: &str,
        request: &PageRequest,
    ) -> Result<Page<Customer>, PortError> {
        self.page(Some(fragment), request).await
    }

    async fn exists(&self, id: CustomerId) -> Result<bool, PortError> {
        Ok(self.repository.exists(id.value()).await?)
    }
}

// =============================================================================
// Conversion Functions
// =============================================================================

fn page_window(request: &PageRequest) -> PageWindow {
    let sort = request.sort();
    PageWindow {
        order_by: match sort.field {
            SortField::Id => OrderColumn::Id,
            SortField::Name => OrderColumn::Name,
        },
        descending: sort.direction == SortDirection::Desc,
        limit: i64::from(request.size()),
        offset: i64::try_from(request.offset()).unwrap_or(i64::MAX),
    }
}

fn draft_to_row(draft: &CustomerDraft) -> NewCustomerRow {
    NewCustomerRow {
        name: draft.name.clone(),
        postal_code: draft.address.postal_code.as_str().to_string(),
    }
}

fn row_to_customer(row: CustomerRow) -> Result<Customer, PortError> {
    let address = row_to_address(AddressRow {
        postal_code: row.postal_code,
        street: row.street,
        complement: row.complement,
        neighborhood: row.neighborhood,
        city: row.city,
        state: row.state,
        ibge: row.ibge,
        gia: row.gia,
        ddd: row.ddd,
        siafi: row.siafi,
    })?;

    Ok(Customer {
        id: CustomerId::new(row.id),
        name: row.name,
        address,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::Sort;

    #[test]
    fn test_page_window_from_request() {
        let request = PageRequest::new(3, 10, Sort::desc(SortField::Name)).unwrap();
        let window = page_window(&request);

        assert_eq!(window.order_by, OrderColumn::Name);
        assert!(window.descending);
        assert_eq!(window.limit, 10);
        assert_eq!(window.offset, 30);
    }
}

//! PostgreSQL Address Store
//!
//! Implements the `AddressStore` port on the `addresses` table.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use core_kernel::{DomainPort, HealthCheckResult, HealthCheckable, PortError, PostalCode};
use domain_customer::{Address, AddressStore};

use crate::error::DatabaseError;
use crate::repositories::address::{AddressRepository, AddressRow};

/// PostgreSQL-backed implementation of the AddressStore trait
#[derive(Debug, Clone)]
pub struct PostgresAddressStore {
    repository: AddressRepository,
    pool: PgPool,
}

impl PostgresAddressStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: AddressRepository::new(pool.clone()),
            pool,
        }
    }
}

impl DomainPort for PostgresAddressStore {}

#[async_trait]
impl HealthCheckable for PostgresAddressStore {
    async fn health_check(&self) -> HealthCheckResult {
        super::ping(&self.pool, "postgres-address-store").await
    }
}

#[async_trait]
impl AddressStore for PostgresAddressStore {
    #[instrument(skip(self), fields(postal_code = %postal_code))]
    async fn get(&self, postal_code: &PostalCode) -> Result<Option<Address>, PortError> {
        debug!("Fetching stored address");
        self.repository
            .find(postal_code.as_str())
            .await?
            .map(row_to_address)
            .transpose()
    }

    #[instrument(skip(self, address), fields(postal_code = %address.postal_code))]
    async fn save(&self, address: Address) -> Result<Address, PortError> {
        debug!("Upserting address");
        let stored = self.repository.upsert(&address_to_row(address)).await?;
        row_to_address(stored)
    }

    #[instrument(skip(self), fields(postal_code = %postal_code))]
    async fn delete(&self, postal_code: &PostalCode) -> Result<(), PortError> {
        self.repository.delete(postal_code.as_str()).await?;
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<Address>, PortError> {
        self.repository
            .list()
            .await?
            .into_iter()
            .map(row_to_address)
            .collect()
    }
}

// =============================================================================
// Conversion Functions
// =============================================================================

pub(crate) fn row_to_address(row: AddressRow) -> Result<Address, PortError> {
    let postal_code = PostalCode::parse(&row.postal_code)
        .map_err(|e| DatabaseError::CorruptRow(format!("address {}: {}", row.postal_code, e)))?;

    Ok(Address {
        postal_code,
        street: row.street,
        complement: row.complement,
        neighborhood: row.neighborhood,
        city: row.city,
        state: row.state,
        ibge: row.ibge,
        gia: row.gia,
        ddd: row.ddd,
        siafi: row.siafi,
    })
}

fn address_to_row(address: Address) -> AddressRow {
    AddressRow {
        postal_code: address.postal_code.as_str().to_string(),
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

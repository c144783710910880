//! Address repository implementation
//!
//! Addresses are keyed by postal code. Writes are upserts so that a forced
//! re-synchronization simply overwrites the row.

use sqlx::PgPool;

use crate::error::DatabaseError;

/// Repository for the `addresses` table
#[derive(Debug, Clone)]
pub struct AddressRepository {
    pool: PgPool,
}

/// A row of the `addresses` table
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct AddressRow {
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

const SELECT_ADDRESS: &str = r#"
    SELECT postal_code, street, complement, neighborhood, city, state, ibge, gia, ddd, siafi
    FROM addresses
"#;

impl AddressRepository {
    /// Creates a new AddressRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Retrieves the address stored under `postal_code`
    pub async fn find(&self, postal_code: &str) -> Result<Option<AddressRow>, DatabaseError> {
        let row = sqlx::query_as::<_, AddressRow>(&format!(
            "{SELECT_ADDRESS} WHERE postal_code = $1"
        ))
        .bind(postal_code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Inserts the address, or overwrites every field if the code is already stored
    pub async fn upsert(&self, row: &AddressRow) -> Result<AddressRow, DatabaseError> {
        let stored = sqlx::query_as::<_, AddressRow>(
            r#"
            INSERT INTO addresses
                (postal_code, street, complement, neighborhood, city, state, ibge, gia, ddd, siafi)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (postal_code) DO UPDATE SET
                street = EXCLUDED.street,
                complement = EXCLUDED.complement,
                neighborhood = EXCLUDED.neighborhood,
                city = EXCLUDED.city,
                state = EXCLUDED.state,
                ibge = EXCLUDED.ibge,
                gia = EXCLUDED.gia,
                ddd = EXCLUDED.ddd,
                siafi = EXCLUDED.siafi,
                updated_at = NOW()
            RETURNING postal_code, street, complement, neighborhood, city, state, ibge, gia, ddd, siafi
            "#,
        )
        .bind(&row.postal_code)
        .bind(&row.street)
        .bind(&row.complement)
        .bind(&row.neighborhood)
        .bind(&row.city)
        .bind(&row.state)
        .bind(&row.ibge)
        .bind(&row.gia)
        .bind(&row.ddd)
        .bind(&row.siafi)
        .fetch_one(&self.pool)
        .await?;

        Ok(stored)
    }

    /// Deletes the address stored under `postal_code`
    ///
    /// # Returns
    ///
    /// `true` if a row was removed
    pub async fn delete(&self, postal_code: &str) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM addresses WHERE postal_code = $1")
            .bind(postal_code)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists every stored address ordered by postal code
    pub async fn list(&self) -> Result<Vec<AddressRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, AddressRow>(&format!(
            "{SELECT_ADDRESS} ORDER BY postal_code"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

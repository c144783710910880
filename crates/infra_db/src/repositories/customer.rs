//! Customer repository implementation
//!
//! Customers reference their address by postal code. Reads join the
//! `addresses` table so a row always carries the full address it points at.
//!
//! # Ordering
//!
//! Page queries order by a whitelisted column and always break ties by id, so
//! that consecutive pages never overlap.

use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::error::DatabaseError;

/// Repository for the `customers` table
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: PgPool,
}

/// A customer joined with the address it references
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct CustomerRow {
    pub id: i64,
    pub name: String,
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

/// Values written for a customer
#[derive(Debug, Clone)]
pub struct NewCustomerRow {
    pub name: String,
    pub postal_code: String,
}

/// Column a page query orders by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderColumn {
    Id,
    Name,
}

/// Ordering and window of a page query
#[derive(Debug, Clone, Copy)]
pub struct PageWindow {
    pub order_by: OrderColumn,
    pub descending: bool,
    pub limit: i64,
    pub offset: i64,
}

impl PageWindow {
    fn order_clause(&self) -> &'static str {
        match (self.order_by, self.descending) {
            (OrderColumn::Id, false) => " ORDER BY c.id ASC",
            (OrderColumn::Id, true) => " ORDER BY c.id DESC",
            (OrderColumn::Name, false) => " ORDER BY lower(c.name) ASC, c.id ASC",
            (OrderColumn::Name, true) => " ORDER BY lower(c.name) DESC, c.id DESC",
        }
    }
}

const SELECT_CUSTOMER: &str = r#"
    SELECT c.id, c.name, a.postal_code, a.street, a.complement, a.neighborhood,
           a.city, a.state, a.ibge, a.gia, a.ddd, a.siafi
    FROM customers c
    JOIN addresses a ON a.postal_code = c.postal_code
"#;

impl CustomerRepository {
    /// Creates a new CustomerRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Retrieves a customer by id
    pub async fn find(&self, id: i64) -> Result<Option<CustomerRow>, DatabaseError> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!("{SELECT_CUSTOMER} WHERE c.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    /// Checks whether a customer row exists without joining its address
    pub async fn exists(&self, id: i64) -> Result<bool, DatabaseError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM customers WHERE id = $1)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Inserts a customer and returns the id the database assigned
    pub async fn insert(&self, customer: &NewCustomerRow) -> Result<i64, DatabaseError> {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO customers (name, postal_code) VALUES ($1, $2) RETURNING id",
        )
        .bind(&customer.name)
        .bind(&customer.postal_code)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    /// Overwrites name and postal code of an existing customer
    ///
    /// # Errors
    ///
    /// `DatabaseError::NotFound` if no customer has this id
    pub async fn update(&self, id: i64, customer: &NewCustomerRow) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            "UPDATE customers SET name = $2, postal_code = $3, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(&customer.name)
        .bind(&customer.postal_code)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Customer", id));
        }
        Ok(())
    }

    /// Writes every customer inside one transaction
    ///
    /// Entries with an id update that row, entries without one are inserted.
    /// Any failure rolls the whole set back.
    ///
    /// # Returns
    ///
    /// The id of each entry, in input order
    pub async fn save_all(
        &self,
        customers: &[(Option<i64>, NewCustomerRow)],
    ) -> Result<Vec<i64>, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        let mut ids = Vec::with_capacity(customers.len());

        for (id, customer) in customers {
            let saved = match id {
                Some(id) => {
                    let result = sqlx::query(
                        "UPDATE customers SET name = $2, postal_code = $3, updated_at = NOW() WHERE id = $1",
                    )
                    .bind(id)
                    .bind(&customer.name)
                    .bind(&customer.postal_code)
                    .execute(&mut *tx)
                    .await?;
                    if result.rows_affected() == 0 {
                        return Err(DatabaseError::not_found("Customer", id));
                    }
                    *id
                }
                None => {
                    sqlx::query_scalar::<_, i64>(
                        "INSERT INTO customers (name, postal_code) VALUES ($1, $2) RETURNING id",
                    )
                    .bind(&customer.name)
                    .bind(&customer.postal_code)
                    .fetch_one(&mut *tx)
                    .await?
                }
            };
            ids.push(saved);
        }

        tx.commit()
            .await
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;
        Ok(ids)
    }

    /// Deletes a customer
    ///
    /// # Returns
    ///
    /// `true` if a row was removed
    pub async fn delete(&self, id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists every customer ordered by id
    pub async fn list(&self) -> Result<Vec<CustomerRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, CustomerRow>(&format!("{SELECT_CUSTOMER} ORDER BY c.id"))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    /// Returns one window of customers, optionally restricted to names
    /// containing `name_fragment` (case-insensitive), and the total match count
    pub async fn page(
        &self,
        name_fragment: Option<&str>,
        window: PageWindow,
    ) -> Result<(Vec<CustomerRow>, i64), DatabaseError> {
        let pattern = name_fragment.map(like_pattern);

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM customers c");
        push_name_filter(&mut count, pattern.as_deref());
        let total = count
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        let mut select = QueryBuilder::<Postgres>::new(SELECT_CUSTOMER);
        push_name_filter(&mut select, pattern.as_deref());
        select.push(window.order_clause());
        select.push(" LIMIT ");
        select.push_bind(window.limit);
        select.push(" OFFSET ");
        select.push_bind(window.offset);
        let rows = select
            .build_query_as::<CustomerRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok((rows, total))
    }
}

fn push_name_filter(query: &mut QueryBuilder<'_, Postgres>, pattern: Option<&str>) {
    if let Some(pattern) = pattern {
        query.push(" WHERE c.name ILIKE ");
        query.push_bind(pattern.to_string());
    }
}

/// Builds an ILIKE pattern matching `fragment` anywhere, with wildcards escaped
fn like_pattern(fragment: &str) -> String {
    let mut pattern = String::with_capacity(fragment.len() + 2);
    pattern.push('%');
    for c in fragment.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

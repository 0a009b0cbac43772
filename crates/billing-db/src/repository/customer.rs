//! # Customer Repository
//!
//! Database operations for customers.
//!
//! ## Deletion Rule
//! A customer that owns invoices cannot be deleted. The invoice row keeps
//! a frozen copy of the customer details for display, but the foreign key
//! must stay resolvable for per-customer queries.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use billing_core::Customer;

/// Repository for customer database operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

const CUSTOMER_COLUMNS: &str = "id, name, mobile, address, created_at, updated_at";

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Gets all customers, ordered by name.
    pub async fn get_all(&self) -> DbResult<Vec<Customer>> {
        let customers: Vec<Customer> = sqlx::query_as(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers ORDER BY name COLLATE NOCASE ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(customers)
    }

    /// Gets a customer by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Customer>> {
        let customer: Option<Customer> = sqlx::query_as(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Inserts a new customer.
    ///
    /// ## Errors
    /// `DbError::UniqueViolation` when the mobile number is already taken.
    pub async fn insert(&self, name: &str, mobile: &str, address: &str) -> DbResult<Customer> {
        let now = Utc::now();
        let customer = Customer {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            mobile: mobile.trim().to_string(),
            address: address.trim().to_string(),
            created_at: now,
            updated_at: now,
        };

        debug!(id = %customer.id, mobile = %customer.mobile, "Inserting customer");

        sqlx::query(
            r#"
            INSERT INTO customers (id, name, mobile, address, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&customer.id)
        .bind(&customer.name)
        .bind(&customer.mobile)
        .bind(&customer.address)
        .bind(customer.created_at)
        .bind(customer.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Updates a customer's details. Fields passed as `None` keep their
    /// current value.
    ///
    /// Existing invoices are unaffected: they display the details that
    /// were frozen onto them at creation time.
    pub async fn update(
        &self,
        id: &str,
        name: Option<&str>,
        mobile: Option<&str>,
        address: Option<&str>,
    ) -> DbResult<Customer> {
        let mut customer = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Customer", id))?;

        if let Some(name) = name {
            customer.name = name.trim().to_string();
        }
        if let Some(mobile) = mobile {
            customer.mobile = mobile.trim().to_string();
        }
        if let Some(address) = address {
            customer.address = address.trim().to_string();
        }
        customer.updated_at = Utc::now();

        sqlx::query(
            r#"
            UPDATE customers SET name = ?2, mobile = ?3, address = ?4, updated_at = ?5
            WHERE id = ?1
            "#,
        )
        .bind(&customer.id)
        .bind(&customer.name)
        .bind(&customer.mobile)
        .bind(&customer.address)
        .bind(customer.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Deletes a customer.
    ///
    /// ## Returns
    /// `true` when a row was deleted, `false` when the id did not exist.
    ///
    /// ## Errors
    /// `DbError::InUse` when any invoice references the customer.
    pub async fn delete(&self, id: &str) -> DbResult<bool> {
        let references: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM invoices WHERE customer_id = ?1")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        if references > 0 {
            return Err(DbError::in_use("Customer", id));
        }

        let result = sqlx::query("DELETE FROM customers WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        debug!(id = %id, deleted = result.rows_affected() > 0, "Deleted customer");

        Ok(result.rows_affected() > 0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = test_db().await;
        let repo = db.customers();

        let created = repo
            .insert("Ali Traders", "9876543210", "12 Workshop Road")
            .await
            .unwrap();
        let fetched = repo.get_by_id(&created.id).await.unwrap().unwrap();

        assert_eq!(fetched.name, "Ali Traders");
        assert_eq!(fetched.mobile, "9876543210");
    }

    #[tokio::test]
    async fn test_duplicate_mobile_rejected() {
        let db = test_db().await;
        let repo = db.customers();

        repo.insert("Ali Traders", "9876543210", "12 Workshop Road")
            .await
            .unwrap();
        let err = repo
            .insert("Other Shop", "9876543210", "99 Market Lane")
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_partial_update() {
        let db = test_db().await;
        let repo = db.customers();

        let created = repo
            .insert("Ali Traders", "9876543210", "12 Workshop Road")
            .await
            .unwrap();
        let updated = repo
            .update(&created.id, None, None, Some("45 New Market"))
            .await
            .unwrap();

        assert_eq!(updated.name, "Ali Traders");
        assert_eq!(updated.address, "45 New Market");
    }

    #[tokio::test]
    async fn test_delete_unreferenced() {
        let db = test_db().await;
        let repo = db.customers();

        let created = repo
            .insert("Ali Traders", "9876543210", "12 Workshop Road")
            .await
            .unwrap();
        assert!(repo.delete(&created.id).await.unwrap());
        assert!(!repo.delete(&created.id).await.unwrap());
    }
}

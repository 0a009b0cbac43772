//! # Product Repository
//!
//! Database operations for the product catalogue.
//!
//! ## Deletion Rule
//! A product referenced by any invoice item cannot be deleted. Historical
//! invoice items keep their own rate snapshot, but the item row still
//! points at the product for name display, so the reference must stay
//! resolvable.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use billing_core::Product;

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

const PRODUCT_COLUMNS: &str = "id, name, rate_cents, created_at, updated_at";

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Gets all products, ordered by name.
    pub async fn get_all(&self) -> DbResult<Vec<Product>> {
        let products: Vec<Product> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY name COLLATE NOCASE ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Gets a product by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product: Option<Product> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Gets all products whose id is in the given set.
    ///
    /// Returns only the products that exist; the caller compares the
    /// result against the requested ids to detect dangling references.
    pub async fn get_by_ids(&self, ids: &[String]) -> DbResult<Vec<Product>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = (1..=ids.len())
            .map(|n| format!("?{n}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql =
            format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id IN ({placeholders})");

        let mut query = sqlx::query_as::<sqlx::Sqlite, Product>(&sql);
        for id in ids {
            query = query.bind(id);
        }

        let products = query.fetch_all(&self.pool).await?;
        Ok(products)
    }

    /// Inserts a new product.
    ///
    /// ## Errors
    /// `DbError::UniqueViolation` when the name is already taken.
    pub async fn insert(&self, name: &str, rate_cents: i64) -> DbResult<Product> {
        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            rate_cents,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %product.id, name = %product.name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (id, name, rate_cents, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(product.rate_cents)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(product)
    }

    /// Updates a product's name and/or rate. Fields passed as `None` keep
    /// their current value.
    pub async fn update(
        &self,
        id: &str,
        name: Option<&str>,
        rate_cents: Option<i64>,
    ) -> DbResult<Product> {
        let mut product = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))?;

        if let Some(name) = name {
            product.name = name.trim().to_string();
        }
        if let Some(rate_cents) = rate_cents {
            product.rate_cents = rate_cents;
        }
        product.updated_at = Utc::now();

        sqlx::query(
            r#"
            UPDATE products SET name = ?2, rate_cents = ?3, updated_at = ?4
            WHERE id = ?1
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(product.rate_cents)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(product)
    }

    /// Deletes a product.
    ///
    /// ## Returns
    /// `true` when a row was deleted, `false` when the id did not exist.
    ///
    /// ## Errors
    /// `DbError::InUse` when any invoice item references the product.
    pub async fn delete(&self, id: &str) -> DbResult<bool> {
        let references: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM invoice_items WHERE product_id = ?1")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        if references > 0 {
            return Err(DbError::in_use("Product", id));
        }

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        debug!(id = %id, deleted = result.rows_affected() > 0, "Deleted product");

        Ok(result.rows_affected() > 0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::pool::{Database, DbConfig};
    use crate::error::DbError;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = test_db().await;
        let repo = db.products();

        let created = repo.insert("Engine Oil 1L", 45000).await.unwrap();
        let fetched = repo.get_by_id(&created.id).await.unwrap().unwrap();

        assert_eq!(fetched.name, "Engine Oil 1L");
        assert_eq!(fetched.rate_cents, 45000);
    }

    #[tokio::test]
    async fn test_get_all_ordered_by_name() {
        let db = test_db().await;
        let repo = db.products();

        repo.insert("Gear Oil", 30000).await.unwrap();
        repo.insert("air filter", 15000).await.unwrap();
        repo.insert("Brake Fluid", 20000).await.unwrap();

        let names: Vec<String> = repo
            .get_all()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["air filter", "Brake Fluid", "Gear Oil"]);
    }

    #[tokio::test]
    async fn test_duplicate_name_rejected() {
        let db = test_db().await;
        let repo = db.products();

        repo.insert("Engine Oil 1L", 45000).await.unwrap();
        let err = repo.insert("Engine Oil 1L", 50000).await.unwrap_err();

        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_partial_update() {
        let db = test_db().await;
        let repo = db.products();

        let created = repo.insert("Engine Oil 1L", 45000).await.unwrap();
        let updated = repo.update(&created.id, None, Some(47500)).await.unwrap();

        assert_eq!(updated.name, "Engine Oil 1L");
        assert_eq!(updated.rate_cents, 47500);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn test_update_missing_product() {
        let db = test_db().await;
        let err = db
            .products()
            .update("no-such-id", Some("X"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete() {
        let db = test_db().await;
        let repo = db.products();

        let created = repo.insert("Engine Oil 1L", 45000).await.unwrap();
        assert!(repo.delete(&created.id).await.unwrap());
        assert!(!repo.delete(&created.id).await.unwrap());
        assert!(repo.get_by_id(&created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_by_ids_returns_only_existing() {
        let db = test_db().await;
        let repo = db.products();

        let a = repo.insert("Engine Oil 1L", 45000).await.unwrap();
        let found = repo
            .get_by_ids(&[a.id.clone(), "missing".to_string()])
            .await
            .unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, a.id);
    }
}

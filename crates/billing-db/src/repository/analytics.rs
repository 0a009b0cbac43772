//! # Analytics Repository
//!
//! Read-only grouped sums over invoice history. Nothing here writes;
//! revenue is derived entirely from committed invoices.
//!
//! The month-window arithmetic (start of month, previous month, trailing
//! twelve months) lives with the callers in the bridge layer; this module
//! only runs the SQL.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::error::DbResult;

/// Revenue for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct MonthlyRevenue {
    /// Month key in `YYYY-MM` form.
    pub month: String,
    pub revenue_cents: i64,
}

/// Sales aggregate for one product over a window.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ProductSales {
    pub product_id: String,
    pub name: String,
    pub total_sold: i64,
    pub total_revenue_cents: i64,
}

/// Repository for analytics queries.
#[derive(Debug, Clone)]
pub struct AnalyticsRepository {
    pool: SqlitePool,
}

impl AnalyticsRepository {
    /// Creates a new AnalyticsRepository.
    pub fn new(pool: SqlitePool) -> Self {
        AnalyticsRepository { pool }
    }

    /// Total invoice revenue in `[from, to)`, or `[from, ∞)` when `to`
    /// is `None`. Empty windows sum to zero.
    pub async fn revenue_between(
        &self,
        from: DateTime<Utc>,
        to: Option<DateTime<Utc>>,
    ) -> DbResult<i64> {
        let total: Option<i64> = match to {
            Some(to) => {
                sqlx::query_scalar(
                    "SELECT SUM(total_cents) FROM invoices WHERE date >= ?1 AND date < ?2",
                )
                .bind(from)
                .bind(to)
                .fetch_one(&self.pool)
                .await?
            }
            None => {
                sqlx::query_scalar("SELECT SUM(total_cents) FROM invoices WHERE date >= ?1")
                    .bind(from)
                    .fetch_one(&self.pool)
                    .await?
            }
        };

        Ok(total.unwrap_or(0))
    }

    /// Revenue grouped by calendar month for invoices dated on or after
    /// `since`, oldest month first.
    pub async fn monthly_revenue(&self, since: DateTime<Utc>) -> DbResult<Vec<MonthlyRevenue>> {
        let rows: Vec<MonthlyRevenue> = sqlx::query_as(
            r#"
            SELECT strftime('%Y-%m', date) AS month,
                   SUM(total_cents) AS revenue_cents
            FROM invoices
            WHERE date >= ?1
            GROUP BY strftime('%Y-%m', date)
            ORDER BY month ASC
            "#,
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Best-selling products (by quantity) for items created on or after
    /// `since`.
    pub async fn top_selling_products(
        &self,
        since: DateTime<Utc>,
        limit: i64,
    ) -> DbResult<Vec<ProductSales>> {
        let rows: Vec<ProductSales> = sqlx::query_as(
            r#"
            SELECT ii.product_id,
                   p.name,
                   SUM(ii.quantity) AS total_sold,
                   SUM(ii.total_cents) AS total_revenue_cents
            FROM invoice_items ii
            JOIN products p ON p.id = ii.product_id
            WHERE ii.created_at >= ?1
            GROUP BY ii.product_id, p.name
            ORDER BY SUM(ii.quantity) DESC
            LIMIT ?2
            "#,
        )
        .bind(since)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Total number of customers.
    pub async fn customer_count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Number of customers created on or after `since`.
    pub async fn customers_added_since(&self, since: DateTime<Utc>) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM customers WHERE created_at >= ?1")
                .bind(since)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    /// Total number of products.
    pub async fn product_count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

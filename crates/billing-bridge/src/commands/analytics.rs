//! # Analytics Command
//!
//! Assembles the revenue dashboard payload from the read-only grouped
//! sums in `billing_db::AnalyticsRepository`. The month-window arithmetic
//! lives here; the repository only runs SQL.

use chrono::{DateTime, Datelike, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiError;
use billing_db::repository::analytics::ProductSales;
use billing_db::Database;

// =============================================================================
// DTOs
// =============================================================================

/// Revenue for one calendar month (`month` is `YYYY-MM`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyRevenueDto {
    pub month: String,
    pub revenue: i64,
}

/// A best-selling product over the current year.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopProductDto {
    pub product_id: String,
    pub name: String,
    pub total_sold: i64,
    pub total_revenue: i64,
}

/// Per-product quantities for the current month's sales chart.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuantityDto {
    pub name: String,
    pub quantity: i64,
}

/// The full analytics payload (`analytics:get`, `GET /api/analytics`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsDto {
    pub current_month_revenue: i64,
    pub last_month_revenue: i64,
    pub current_year_revenue: i64,
    pub last_year_revenue: i64,
    pub total_customers: i64,
    pub new_customers_this_month: i64,
    pub total_products: i64,
    pub monthly_revenue: Vec<MonthlyRevenueDto>,
    pub top_selling_products: Vec<TopProductDto>,
    pub product_sales_data: Vec<ProductQuantityDto>,
}

// =============================================================================
// Command
// =============================================================================

/// Builds the analytics payload as of now.
pub async fn get_analytics(db: &Database) -> Result<AnalyticsDto, ApiError> {
    get_analytics_at(db, Utc::now()).await
}

/// Builds the analytics payload relative to an explicit "now".
pub async fn get_analytics_at(db: &Database, now: DateTime<Utc>) -> Result<AnalyticsDto, ApiError> {
    debug!("analytics:get");

    let analytics = db.analytics();

    let month_start = start_of_month(now);
    let next_month_start = start_of_next_month(now);
    let prev_month_start = start_of_previous_month(now);
    let year_start = start_of_year(now);
    let prev_year_start = start_of_previous_year(now);
    let series_start = same_month_previous_year(now);

    let current_month_revenue = analytics
        .revenue_between(month_start, Some(next_month_start))
        .await?;
    let last_month_revenue = analytics
        .revenue_between(prev_month_start, Some(month_start))
        .await?;
    let current_year_revenue = analytics.revenue_between(year_start, None).await?;
    let last_year_revenue = analytics
        .revenue_between(prev_year_start, Some(year_start))
        .await?;

    let monthly_revenue = analytics
        .monthly_revenue(series_start)
        .await?
        .into_iter()
        .map(|row| MonthlyRevenueDto {
            month: row.month,
            revenue: row.revenue_cents,
        })
        .collect();

    let top_selling_products = analytics
        .top_selling_products(year_start, 5)
        .await?
        .into_iter()
        .map(TopProductDto::from)
        .collect();

    let product_sales_data = analytics
        .top_selling_products(month_start, 10)
        .await?
        .into_iter()
        .map(|row| ProductQuantityDto {
            name: row.name,
            quantity: row.total_sold,
        })
        .collect();

    Ok(AnalyticsDto {
        current_month_revenue,
        last_month_revenue,
        current_year_revenue,
        last_year_revenue,
        total_customers: analytics.customer_count().await?,
        new_customers_this_month: analytics.customers_added_since(month_start).await?,
        total_products: analytics.product_count().await?,
        monthly_revenue,
        top_selling_products,
        product_sales_data,
    })
}

impl From<ProductSales> for TopProductDto {
    fn from(row: ProductSales) -> Self {
        TopProductDto {
            product_id: row.product_id,
            name: row.name,
            total_sold: row.total_sold,
            total_revenue: row.total_revenue_cents,
        }
    }
}

// =============================================================================
// Month Windows
// =============================================================================

fn start_of_month(now: DateTime<Utc>) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0).unwrap()
}

fn start_of_next_month(now: DateTime<Utc>) -> DateTime<Utc> {
    let (year, month) = if now.month() == 12 {
        (now.year() + 1, 1)
    } else {
        (now.year(), now.month() + 1)
    };
    Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0).unwrap()
}

fn start_of_previous_month(now: DateTime<Utc>) -> DateTime<Utc> {
    let (year, month) = if now.month() == 1 {
        (now.year() - 1, 12)
    } else {
        (now.year(), now.month() - 1)
    };
    Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0).unwrap()
}

fn start_of_year(now: DateTime<Utc>) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(now.year(), 1, 1, 0, 0, 0).unwrap()
}

fn start_of_previous_year(now: DateTime<Utc>) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(now.year() - 1, 1, 1, 0, 0, 0).unwrap()
}

/// First day of this month one year ago: the start of the trailing
/// monthly revenue series.
fn same_month_previous_year(now: DateTime<Utc>) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(now.year() - 1, now.month(), 1, 0, 0, 0).unwrap()
}

// =============================================================================
// Unit Tests
// =============================================================================

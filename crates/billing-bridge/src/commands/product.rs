//! # Product Commands

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ApiError;
use billing_core::validation::{validate_name, validate_rate_cents};
use billing_core::Product;
use billing_db::Database;

/// Product DTO (Data Transfer Object) for clients.
///
/// ## Why DTO?
/// - Decouples the internal domain model from the API contract
/// - Handles serde rename to camelCase for JS consumption
/// - `rate` is in paise, like every amount on the wire
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: String,
    pub name: String,
    pub rate: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for ProductDto {
    fn from(p: Product) -> Self {
        ProductDto {
            id: p.id,
            name: p.name,
            rate: p.rate_cents,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// Input for adding a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProductInput {
    pub name: String,
    pub rate: i64,
}

/// Input for updating a product. Absent fields keep their current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductInput {
    pub name: Option<String>,
    pub rate: Option<i64>,
}

/// Result of a delete operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
}

/// Lists all products, ordered by name.
pub async fn get_all_products(db: &Database) -> Result<Vec<ProductDto>, ApiError> {
    debug!("product:getAll");
    let products = db.products().get_all().await?;
    Ok(products.into_iter().map(ProductDto::from).collect())
}

/// Adds a product to the catalogue.
pub async fn add_product(db: &Database, input: NewProductInput) -> Result<ProductDto, ApiError> {
    debug!(name = %input.name, "product:add");

    validate_name(&input.name)?;
    validate_rate_cents(input.rate)?;

    let product = db.products().insert(&input.name, input.rate).await?;

    info!(id = %product.id, name = %product.name, "Product added");
    Ok(ProductDto::from(product))
}

/// Updates a product's name and/or rate.
pub async fn update_product(
    db: &Database,
    id: &str,
    input: UpdateProductInput,
) -> Result<ProductDto, ApiError> {
    debug!(id = %id, "product:update");

    if let Some(name) = &input.name {
        validate_name(name)?;
    }
    if let Some(rate) = input.rate {
        validate_rate_cents(rate)?;
    }

    let product = db
        .products()
        .update(id, input.name.as_deref(), input.rate)
        .await?;

    info!(id = %product.id, "Product updated");
    Ok(ProductDto::from(product))
}

/// Deletes a product. Refused while invoice items reference it.
pub async fn delete_product(db: &Database, id: &str) -> Result<DeleteResponse, ApiError> {
    debug!(id = %id, "product:delete");

    let success = db.products().delete(id).await?;

    info!(id = %id, success, "Product delete");
    Ok(DeleteResponse { success })
}

// =============================================================================
// Unit Tests
// =============================================================================

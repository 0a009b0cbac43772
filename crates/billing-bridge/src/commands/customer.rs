//! # Customer Commands

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::commands::product::DeleteResponse;
use crate::error::ApiError;
use billing_core::validation::{validate_address, validate_mobile, validate_name};
use billing_core::Customer;
use billing_db::Database;

/// Customer DTO for clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDto {
    pub id: String,
    pub name: String,
    pub mobile: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Customer> for CustomerDto {
    fn from(c: Customer) -> Self {
        CustomerDto {
            id: c.id,
            name: c.name,
            mobile: c.mobile,
            address: c.address,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

/// Input for adding a customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomerInput {
    pub name: String,
    pub mobile: String,
    pub address: String,
}

/// Input for updating a customer. Absent fields keep their current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCustomerInput {
    pub name: Option<String>,
    pub mobile: Option<String>,
    pub address: Option<String>,
}

/// Lists all customers, ordered by name.
pub async fn get_all_customers(db: &Database) -> Result<Vec<CustomerDto>, ApiError> {
    debug!("customer:getAll");
    let customers = db.customers().get_all().await?;
    Ok(customers.into_iter().map(CustomerDto::from).collect())
}

/// Adds a customer.
pub async fn add_customer(db: &Database, input: NewCustomerInput) -> Result<CustomerDto, ApiError> {
    debug!(mobile = %input.mobile, "customer:add");

    validate_name(&input.name)?;
    validate_mobile(&input.mobile)?;
    validate_address(&input.address)?;

    let customer = db
        .customers()
        .insert(&input.name, &input.mobile, &input.address)
        .await?;

    info!(id = %customer.id, "Customer added");
    Ok(CustomerDto::from(customer))
}

/// Updates a customer's details.
///
/// Historical invoices are unaffected; they display the details frozen
/// onto them at creation time.
pub async fn update_customer(
    db: &Database,
    id: &str,
    input: UpdateCustomerInput,
) -> Result<CustomerDto, ApiError> {
    debug!(id = %id, "customer:update");

    if let Some(name) = &input.name {
        validate_name(name)?;
    }
    if let Some(mobile) = &input.mobile {
        validate_mobile(mobile)?;
    }
    if let Some(address) = &input.address {
        validate_address(address)?;
    }

    let customer = db
        .customers()
        .update(
            id,
            input.name.as_deref(),
            input.mobile.as_deref(),
            input.address.as_deref(),
        )
        .await?;

    info!(id = %customer.id, "Customer updated");
    Ok(CustomerDto::from(customer))
}

/// Deletes a customer. Refused while invoices reference them.
pub async fn delete_customer(db: &Database, id: &str) -> Result<DeleteResponse, ApiError> {
    debug!(id = %id, "customer:delete");

    let success = db.customers().delete(id).await?;

    info!(id = %id, success, "Customer delete");
    Ok(DeleteResponse { success })
}

// =============================================================================
// Unit Tests
// =============================================================================

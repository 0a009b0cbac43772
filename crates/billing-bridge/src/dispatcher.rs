//! # Operation Dispatcher
//!
//! Routes string operation names to commands over JSON payloads. This is
//! the seam a desktop shell binds its invoke/IPC mechanism to: one
//! handler, forwarding `(operation, payload)` pairs here.
//!
//! ## Operation Table
//! ```text
//! ┌──────────────────┬──────────────────────────────┬─────────────────────┐
//! │ operation        │ payload                      │ result              │
//! ├──────────────────┼──────────────────────────────┼─────────────────────┤
//! │ product:getAll   │ (none)                       │ [ProductDto]        │
//! │ product:add      │ {name, rate}                 │ ProductDto          │
//! │ product:update   │ {id, data:{name?, rate?}}    │ ProductDto          │
//! │ product:delete   │ "<id>"                       │ {success}           │
//! │ customer:getAll  │ (none)                       │ [CustomerDto]       │
//! │ customer:add     │ {name, mobile, address}      │ CustomerDto         │
//! │ customer:update  │ {id, data:{...}}             │ CustomerDto         │
//! │ customer:delete  │ "<id>"                       │ {success}           │
//! │ invoice:getAll   │ (none)                       │ [InvoiceSummaryDto] │
//! │ invoice:create   │ {customerId, total, items}   │ {invoice, items}    │
//! │ invoice:receipt  │ {id}                         │ {invoiceId,document}│
//! │ analytics:get    │ (none)                       │ AnalyticsDto        │
//! └──────────────────┴──────────────────────────────┴─────────────────────┘
//! ```
//!
//! Update payloads use the `{id, data}` envelope the shells have always
//! sent; delete payloads are the bare id string.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::commands::{analytics, customer, invoice, product};
use crate::error::ApiError;
use billing_db::Database;

/// The `{id, data}` envelope used by update operations.
#[derive(Debug, Deserialize)]
struct UpdateEnvelope<T> {
    id: String,
    data: T,
}

/// Payload of `invoice:receipt`.
#[derive(Debug, Deserialize)]
struct ReceiptRequest {
    id: String,
}

/// Dispatches one bridge operation.
///
/// Unknown operation names are a `NOT_FOUND` error; malformed payloads
/// are a `VALIDATION_ERROR`.
pub async fn dispatch(db: &Database, operation: &str, payload: Value) -> Result<Value, ApiError> {
    debug!(operation = %operation, "Bridge dispatch");

    match operation {
        // Product operations
        "product:getAll" => to_json(product::get_all_products(db).await?),
        "product:add" => {
            let input: product::NewProductInput = parse(payload)?;
            to_json(product::add_product(db, input).await?)
        }
        "product:update" => {
            let envelope: UpdateEnvelope<product::UpdateProductInput> = parse(payload)?;
            to_json(product::update_product(db, &envelope.id, envelope.data).await?)
        }
        "product:delete" => {
            let id: String = parse(payload)?;
            to_json(product::delete_product(db, &id).await?)
        }

        // Customer operations
        "customer:getAll" => to_json(customer::get_all_customers(db).await?),
        "customer:add" => {
            let input: customer::NewCustomerInput = parse(payload)?;
            to_json(customer::add_customer(db, input).await?)
        }
        "customer:update" => {
            let envelope: UpdateEnvelope<customer::UpdateCustomerInput> = parse(payload)?;
            to_json(customer::update_customer(db, &envelope.id, envelope.data).await?)
        }
        "customer:delete" => {
            let id: String = parse(payload)?;
            to_json(customer::delete_customer(db, &id).await?)
        }

        // Invoice operations
        "invoice:getAll" => to_json(invoice::list_invoices(db).await?),
        "invoice:create" => {
            let input: invoice::CreateInvoiceInput = parse(payload)?;
            to_json(invoice::create_invoice(db, input).await?)
        }
        "invoice:receipt" => {
            let request: ReceiptRequest = parse(payload)?;
            to_json(invoice::get_receipt(db, &request.id).await?)
        }

        // Analytics
        "analytics:get" => to_json(analytics::get_analytics(db).await?),

        unknown => Err(ApiError::not_found("Operation", unknown)),
    }
}

fn parse<T: DeserializeOwned>(payload: Value) -> Result<T, ApiError> {
    serde_json::from_value(payload)
        .map_err(|e| ApiError::validation(format!("Invalid payload: {e}")))
}

fn to_json<T: Serialize>(value: T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::internal(e.to_string()))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use billing_db::DbConfig;
    use serde_json::json;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_unknown_operation() {
        let db = test_db().await;
        let err = dispatch(&db, "invoice:void", Value::Null).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_malformed_payload() {
        let db = test_db().await;
        let err = dispatch(&db, "product:add", json!({"rate": "not-a-number"}))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_full_billing_flow_over_json() {
        let db = test_db().await;

        // Seed a product and a customer the way a shell would.
        let product = dispatch(
            &db,
            "product:add",
            json!({"name": "Engine Oil 1L", "rate": 5000}),
        )
        .await
        .unwrap();
        let customer = dispatch(
            &db,
            "customer:add",
            json!({
                "name": "Ali Traders",
                "mobile": "9876543210",
                "address": "12 Workshop Road"
            }),
        )
        .await
        .unwrap();

        // Create an invoice through the wire shape.
        let created = dispatch(
            &db,
            "invoice:create",
            json!({
                "customerId": customer["id"],
                "total": 10000,
                "items": [{
                    "id": product["id"],
                    "quantity": 2,
                    "rate": 5000,
                    "total": 10000
                }]
            }),
        )
        .await
        .unwrap();

        let number = created["invoice"]["invoiceNumber"].as_str().unwrap();
        assert!(number.starts_with("001/"));
        assert_eq!(created["invoice"]["total"], 10000);
        assert_eq!(created["items"][0]["quantity"], 2);

        // Listing shows the snapshot details and the joined product name.
        let listed = dispatch(&db, "invoice:getAll", Value::Null).await.unwrap();
        assert_eq!(listed[0]["customerDetails"]["name"], "Ali Traders");
        assert_eq!(listed[0]["items"][0]["name"], "Engine Oil 1L");

        // Receipt renders from the created invoice.
        let receipt = dispatch(
            &db,
            "invoice:receipt",
            json!({"id": created["invoice"]["id"]}),
        )
        .await
        .unwrap();
        assert!(receipt["document"].as_str().unwrap().contains(number));

        // Analytics sees the revenue.
        let analytics = dispatch(&db, "analytics:get", Value::Null).await.unwrap();
        assert_eq!(analytics["currentMonthRevenue"], 10000);
        assert_eq!(analytics["totalCustomers"], 1);
    }

    #[tokio::test]
    async fn test_update_envelope_shape() {
        let db = test_db().await;

        let product = dispatch(
            &db,
            "product:add",
            json!({"name": "Engine Oil 1L", "rate": 5000}),
        )
        .await
        .unwrap();

        let updated = dispatch(
            &db,
            "product:update",
            json!({"id": product["id"], "data": {"rate": 5500}}),
        )
        .await
        .unwrap();
        assert_eq!(updated["rate"], 5500);
        assert_eq!(updated["name"], "Engine Oil 1L");

        let deleted = dispatch(&db, "product:delete", product["id"].clone())
            .await
            .unwrap();
        assert_eq!(deleted["success"], true);
    }

    #[tokio::test]
    async fn test_invalid_reference_surfaces_typed_code() {
        let db = test_db().await;

        let product = dispatch(
            &db,
            "product:add",
            json!({"name": "Engine Oil 1L", "rate": 5000}),
        )
        .await
        .unwrap();

        let err = dispatch(
            &db,
            "invoice:create",
            json!({
                "customerId": "ghost",
                "total": 5000,
                "items": [{"id": product["id"], "quantity": 1, "rate": 5000, "total": 5000}]
            }),
        )
        .await
        .unwrap_err();

        assert_eq!(err.code, ErrorCode::InvalidReference);
    }
}

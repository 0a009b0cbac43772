//! # Invoice Commands
//!
//! The client-facing surface of the creation transaction, plus listing
//! and receipt retrieval.
//!
//! ## Wire Contract
//! ```text
//! invoice:create  IN   {customerId, total, items:[{id, quantity, rate, total}]}
//!                 OUT  {invoice:{id, invoiceNumber, date, total},
//!                       items:[{id, quantity, rate, total}]}
//! invoice:getAll  OUT  [{id, invoiceNumber, date, total,
//!                        customerDetails:{name, mobile, address},
//!                        items:[{name, quantity, rate, total}]}]
//! invoice:receipt IN   {id}      OUT {invoiceId, document}
//! ```
//! Every amount on the wire is integer paise. The item input field `id`
//! is the product id, mirroring what the shells have always sent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::receipt::{self, ReceiptConfig};
use billing_core::{NewInvoice, NewInvoiceItem};
use billing_db::repository::invoice::InvoiceWithItems;
use billing_db::Database;

// =============================================================================
// DTOs
// =============================================================================

/// A requested line item: `id` is the product id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoiceItemInput {
    pub id: String,
    pub quantity: i64,
    pub rate: i64,
    pub total: i64,
}

/// Input for creating an invoice.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoiceInput {
    pub customer_id: String,
    pub total: i64,
    pub items: Vec<CreateInvoiceItemInput>,
}

/// The created invoice header.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDto {
    pub id: String,
    pub invoice_number: String,
    pub date: DateTime<Utc>,
    pub total: i64,
}

/// A created line item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedItemDto {
    pub id: String,
    pub quantity: i64,
    pub rate: i64,
    pub total: i64,
}

/// Result of `invoice:create`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoiceResponse {
    pub invoice: InvoiceDto,
    pub items: Vec<CreatedItemDto>,
}

/// Customer details block on a listed invoice (the creation-time snapshot).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDetailsDto {
    pub name: String,
    pub mobile: String,
    pub address: String,
}

/// A line item on a listed invoice, joined with its product name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLineDto {
    pub name: String,
    pub quantity: i64,
    pub rate: i64,
    pub total: i64,
}

/// A listed invoice with customer details and items.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceSummaryDto {
    pub id: String,
    pub invoice_number: String,
    pub date: DateTime<Utc>,
    pub total: i64,
    pub customer_details: CustomerDetailsDto,
    pub items: Vec<InvoiceLineDto>,
}

impl From<InvoiceWithItems> for InvoiceSummaryDto {
    fn from(full: InvoiceWithItems) -> Self {
        InvoiceSummaryDto {
            id: full.invoice.id,
            invoice_number: full.invoice.invoice_number,
            date: full.invoice.date,
            total: full.invoice.total_cents,
            customer_details: CustomerDetailsDto {
                name: full.invoice.customer_name,
                mobile: full.invoice.customer_mobile,
                address: full.invoice.customer_address,
            },
            items: full
                .items
                .into_iter()
                .map(|item| InvoiceLineDto {
                    name: item.product_name,
                    quantity: item.quantity,
                    rate: item.rate_cents,
                    total: item.total_cents,
                })
                .collect(),
        }
    }
}

/// Result of `invoice:receipt`: the rendered fixed-width document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptDto {
    pub invoice_id: String,
    pub document: String,
}

// =============================================================================
// Commands
// =============================================================================

/// Creates an invoice: the single entry point both bindings use.
///
/// Validation, number allocation, atomicity and the concurrency
/// discipline all live in `billing_db::InvoiceRepository::create`; this
/// command only translates DTOs.
pub async fn create_invoice(
    db: &Database,
    input: CreateInvoiceInput,
) -> Result<CreateInvoiceResponse, ApiError> {
    debug!(customer_id = %input.customer_id, items = input.items.len(), "invoice:create");

    let new = NewInvoice {
        customer_id: input.customer_id,
        items: input
            .items
            .into_iter()
            .map(|item| NewInvoiceItem {
                product_id: item.id,
                quantity: item.quantity,
                rate_cents: item.rate,
                total_cents: item.total,
            })
            .collect(),
        total_cents: input.total,
    };

    let created = db.invoices().create(new).await?;

    info!(
        invoice_number = %created.invoice.invoice_number,
        total = created.invoice.total_cents,
        "invoice:create succeeded"
    );

    Ok(CreateInvoiceResponse {
        invoice: InvoiceDto {
            id: created.invoice.id,
            invoice_number: created.invoice.invoice_number,
            date: created.invoice.date,
            total: created.invoice.total_cents,
        },
        items: created
            .items
            .into_iter()
            .map(|item| CreatedItemDto {
                id: item.id,
                quantity: item.quantity,
                rate: item.rate_cents,
                total: item.total_cents,
            })
            .collect(),
    })
}

/// Lists all invoices, newest first, with customer details and items.
pub async fn list_invoices(db: &Database) -> Result<Vec<InvoiceSummaryDto>, ApiError> {
    debug!("invoice:getAll");
    let invoices = db.invoices().list_with_items().await?;
    Ok(invoices.into_iter().map(InvoiceSummaryDto::from).collect())
}

/// Renders the fixed-width receipt document for an invoice.
pub async fn get_receipt(db: &Database, invoice_id: &str) -> Result<ReceiptDto, ApiError> {
    debug!(invoice_id = %invoice_id, "invoice:receipt");

    let full = db
        .invoices()
        .get_with_items(invoice_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Invoice", invoice_id))?;

    let summary = InvoiceSummaryDto::from(full);
    let document = receipt::render(&summary, &ReceiptConfig::default());

    Ok(ReceiptDto {
        invoice_id: invoice_id.to_string(),
        document,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::customer::{add_customer, NewCustomerInput};
    use crate::commands::product::{add_product, NewProductInput};
    use crate::error::ErrorCode;
    use billing_db::DbConfig;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed(db: &Database) -> (String, String) {
        let customer = add_customer(
            db,
            NewCustomerInput {
                name: "Ali Traders".to_string(),
                mobile: "9876543210".to_string(),
                address: "12 Workshop Road".to_string(),
            },
        )
        .await
        .unwrap();
        let product = add_product(
            db,
            NewProductInput {
                name: "Engine Oil 1L".to_string(),
                rate: 5000,
            },
        )
        .await
        .unwrap();
        (customer.id, product.id)
    }

    fn create_input(customer_id: &str, product_id: &str) -> CreateInvoiceInput {
        CreateInvoiceInput {
            customer_id: customer_id.to_string(),
            total: 10000,
            items: vec![CreateInvoiceItemInput {
                id: product_id.to_string(),
                quantity: 2,
                rate: 5000,
                total: 10000,
            }],
        }
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let db = test_db().await;
        let (customer_id, product_id) = seed(&db).await;

        let created = create_invoice(&db, create_input(&customer_id, &product_id))
            .await
            .unwrap();
        assert!(created.invoice.invoice_number.starts_with("001/"));
        assert_eq!(created.invoice.total, 10000);
        assert_eq!(created.items.len(), 1);
        assert_eq!(created.items[0].rate, 5000);

        let listed = list_invoices(&db).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].customer_details.name, "Ali Traders");
        assert_eq!(listed[0].items[0].name, "Engine Oil 1L");
        assert_eq!(listed[0].items[0].quantity, 2);
    }

    #[tokio::test]
    async fn test_create_with_unknown_customer() {
        let db = test_db().await;
        let (_, product_id) = seed(&db).await;

        let err = create_invoice(&db, create_input("ghost-customer", &product_id))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidReference);
    }

    #[tokio::test]
    async fn test_create_with_mismatched_total() {
        let db = test_db().await;
        let (customer_id, product_id) = seed(&db).await;

        let mut input = create_input(&customer_id, &product_id);
        input.total = 1;

        let err = create_invoice(&db, input).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInvoice);
    }

    #[tokio::test]
    async fn test_receipt_for_created_invoice() {
        let db = test_db().await;
        let (customer_id, product_id) = seed(&db).await;

        let created = create_invoice(&db, create_input(&customer_id, &product_id))
            .await
            .unwrap();
        let receipt = get_receipt(&db, &created.invoice.id).await.unwrap();

        assert!(receipt.document.contains(&created.invoice.invoice_number));
        assert!(receipt.document.contains("Ali Traders"));
    }

    #[tokio::test]
    async fn test_receipt_for_missing_invoice() {
        let db = test_db().await;
        let err = get_receipt(&db, "ghost").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}

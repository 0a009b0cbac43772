//! # Domain Types
//!
//! Core domain types used throughout the billing system.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    Customer     │   │    Invoice      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  name (unique)  │   │  mobile (uniq)  │   │  invoice_number │       │
//! │  │  rate_cents     │   │  name, address  │   │  total_cents    │       │
//! │  └─────────────────┘   └─────────────────┘   │  customer_* ◄── snapshot│
//! │                                              └───────┬─────────┘       │
//! │                                                      │ 1..n            │
//! │                                              ┌───────▼─────────┐       │
//! │                                              │  InvoiceItem    │       │
//! │                                              │  ─────────────  │       │
//! │                                              │  rate_cents  ◄── snapshot│
//! │                                              │  quantity,total │       │
//! │                                              └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Fields
//! An invoice freezes the customer's name/mobile/address, and each item
//! freezes the product rate, at creation time. Later edits to the Customer
//! or Product rows never rewrite what a historical invoice displays.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A product available for billing.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown on invoices. Unique across the catalogue.
    pub name: String,

    /// Unit price in paise (smallest currency unit).
    pub rate_cents: i64,

    /// When the product was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the unit price as a Money type.
    #[inline]
    pub fn rate(&self) -> Money {
        Money::from_paise(self.rate_cents)
    }
}

// =============================================================================
// Customer
// =============================================================================

/// A customer invoices are billed to.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Customer {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Customer name.
    pub name: String,

    /// 10-digit mobile number. Unique, doubles as a lookup key.
    pub mobile: String,

    /// Postal address printed on receipts.
    pub address: String,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Invoice
// =============================================================================

/// A finalized invoice. Immutable after creation: there are no update or
/// delete operations over invoices anywhere in the system.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Invoice {
    pub id: String,

    /// Human-readable sequential number, `SSS/MM/YY`. Globally unique;
    /// the serial restarts at 1 each calendar month.
    pub invoice_number: String,

    /// Invoice date. Defaults to creation time and drives the numbering
    /// scope the serial was allocated in.
    #[ts(as = "String")]
    pub date: DateTime<Utc>,

    /// Grand total in paise. Equals the sum of the item totals.
    pub total_cents: i64,

    pub customer_id: String,

    /// Customer name at creation time (frozen).
    pub customer_name: String,
    /// Customer mobile at creation time (frozen).
    pub customer_mobile: String,
    /// Customer address at creation time (frozen).
    pub customer_address: String,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Invoice {
    /// Returns the grand total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_paise(self.total_cents)
    }
}

// =============================================================================
// Invoice Item
// =============================================================================

/// A line item on an invoice.
/// Uses the snapshot pattern to freeze the product rate at time of sale.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct InvoiceItem {
    pub id: String,
    pub invoice_id: String,
    pub product_id: String,
    /// Quantity billed. Always positive.
    pub quantity: i64,
    /// Unit rate in paise at time of sale (frozen).
    pub rate_cents: i64,
    /// Line total in paise (quantity × rate).
    pub total_cents: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl InvoiceItem {
    /// Returns the unit rate as Money.
    #[inline]
    pub fn rate(&self) -> Money {
        Money::from_paise(self.rate_cents)
    }

    /// Returns the line total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_paise(self.total_cents)
    }
}

// =============================================================================
// Creation Inputs
// =============================================================================

/// A requested line item for a new invoice, as submitted by a client.
///
/// The rate and total are client-supplied snapshots of what the customer
/// was quoted; `validation::validate_new_invoice` recomputes and rejects
/// any that disagree with `quantity * rate`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewInvoiceItem {
    pub product_id: String,
    pub quantity: i64,
    pub rate_cents: i64,
    pub total_cents: i64,
}

/// A requested new invoice. The only way an Invoice comes into existence.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewInvoice {
    pub customer_id: String,
    pub items: Vec<NewInvoiceItem>,
    pub total_cents: i64,
}

// =============================================================================
// Unit Tests
// =============================================================================

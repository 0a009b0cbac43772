//! # billing-core: Pure Business Logic for the Billing System
//!
//! This crate is the **heart** of the billing application. It contains all
//! business rules as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Billing System Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │            Clients (desktop shell / web frontend)               │   │
//! │  └───────────────┬─────────────────────────────┬───────────────────┘   │
//! │                  │ in-process bridge           │ HTTP (axum)            │
//! │  ┌───────────────▼──────────────┐  ┌───────────▼───────────────────┐   │
//! │  │        billing-bridge        │  │          apps/server          │   │
//! │  │  "invoice:create", DTOs      │  │  POST /api/invoices, DTOs     │   │
//! │  └───────────────┬──────────────┘  └───────────┬───────────────────┘   │
//! │                  └──────────────┬──────────────┘                       │
//! │  ┌──────────────────────────────▼──────────────────────────────────┐   │
//! │  │                  ★ billing-core (THIS CRATE) ★                  │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐ ┌───────────┐ ┌────────────────┐ ┌───────────┐ │   │
//! │  │   │   types   │ │   money   │ │ invoice_number │ │ validation│ │   │
//! │  │   │  Product  │ │   Money   │ │  NumberScope   │ │   rules   │ │   │
//! │  │   │  Invoice  │ │  (paise)  │ │  serial math   │ │   checks  │ │   │
//! │  │   └───────────┘ └───────────┘ └────────────────┘ └───────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └──────────────────────────────┬──────────────────────────────────┘   │
//! │  ┌──────────────────────────────▼──────────────────────────────────┐   │
//! │  │                 billing-db (Database Layer)                     │   │
//! │  │       SQLite queries, migrations, the creation transaction      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Customer, Invoice, InvoiceItem)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`invoice_number`] - Invoice number scopes, parsing and formatting
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in paise (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod invoice_number;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use billing_core::Money` instead of
// `use billing_core::money::Money`

pub use error::{CoreError, ValidationError};
pub use invoice_number::NumberScope;
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of a product or customer name.
pub const MAX_NAME_LEN: usize = 200;

/// Maximum length of a customer address.
pub const MAX_ADDRESS_LEN: usize = 500;

/// Number of digits in a customer mobile number.
///
/// ## Business Reason
/// Mobile numbers are stored as the local 10-digit subscriber number,
/// without country code, and double as a customer lookup key.
pub const MOBILE_DIGITS: usize = 10;

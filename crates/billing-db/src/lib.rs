//! # billing-db: Database Layer for the Billing System
//!
//! This crate provides SQLite storage for products, customers, invoices
//! and invoice items, and owns the one subsystem with real consistency
//! requirements: the invoice creation transaction.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Billing Data Flow                                │
//! │                                                                         │
//! │  Bridge op ("invoice:create") / HTTP (POST /api/invoices)              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     billing-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │ product.rs    │    │  (embedded)  │  │   │
//! │  │   │               │    │ customer.rs   │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ invoice.rs ★  │    │ 001_init.sql │  │   │
//! │  │   │ creation lock │    │ analytics.rs  │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  │  ★ repository/invoice.rs is the single write path for invoice   │   │
//! │  │    and invoice_item rows. Nothing else inserts them.            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │                     SQLite database (WAL mode)                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database and creation-transaction error types
//! - [`repository`] - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use billing_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/billing.db")).await?;
//! let created = db.invoices().create(new_invoice).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, InvoiceError};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::analytics::AnalyticsRepository;
pub use repository::customer::CustomerRepository;
pub use repository::invoice::InvoiceRepository;
pub use repository::product::ProductRepository;

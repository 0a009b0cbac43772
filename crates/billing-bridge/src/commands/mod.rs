//! # Bridge Commands
//!
//! All operations exposed to clients, one module per entity.
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Command Flow                                       │
//! │                                                                         │
//! │  Desktop shell                        HTTP server                       │
//! │  ─────────────                        ───────────                       │
//! │  invoke("invoice:create", body)       POST /api/invoices body           │
//! │         │                                   │                           │
//! │         ▼                                   │                           │
//! │  dispatcher::dispatch ──────────┐           │                           │
//! │                                 ▼           ▼                           │
//! │            commands::invoice::create_invoice(db, input)                 │
//! │                                 │                                       │
//! │                                 ▼                                       │
//! │            Result<CreateInvoiceResponse, ApiError>                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Commands validate field-level input with billing-core validators, call
//! into billing-db, and map results into camelCase DTOs. They never touch
//! SQL themselves.

pub mod analytics;
pub mod customer;
pub mod invoice;
pub mod product;

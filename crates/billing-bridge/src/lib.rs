//! # billing-bridge: In-Process Command Bridge
//!
//! The command layer a desktop shell embeds, and the shared application
//! layer the HTTP server reuses.
//!
//! ## Module Organization
//! ```text
//! billing_bridge/
//! ├── lib.rs          ◄─── You are here (exports)
//! ├── commands/
//! │   ├── product.rs    ◄─── Product catalogue commands + DTOs
//! │   ├── customer.rs   ◄─── Customer commands + DTOs
//! │   ├── invoice.rs    ◄─── Invoice creation/listing commands + DTOs
//! │   └── analytics.rs  ◄─── Revenue analytics command + DTOs
//! ├── dispatcher.rs   ◄─── String-op JSON routing ("invoice:create", ...)
//! ├── receipt.rs      ◄─── Fixed-width receipt rendering
//! └── error.rs        ◄─── ApiError, the serialized client-facing error
//! ```
//!
//! ## Two Bindings, One Implementation
//! The desktop shell calls [`dispatch`] with an operation name and a JSON
//! payload. The HTTP server skips the dispatcher and calls the command
//! functions directly, mapping [`ApiError`] codes to status codes. Both
//! produce identical JSON shapes.

pub mod commands;
pub mod dispatcher;
pub mod error;
pub mod receipt;

pub use dispatcher::dispatch;
pub use error::{ApiError, ErrorCode};

//! # Repository Module
//!
//! Repository implementations over the shared connection pool.
//!
//! ```text
//! repository/
//! ├── mod.rs        ◄─── You are here (exports)
//! ├── product.rs    ◄─── Product catalogue CRUD
//! ├── customer.rs   ◄─── Customer CRUD
//! ├── invoice.rs    ◄─── Invoice creation transaction + read models
//! └── analytics.rs  ◄─── Read-only grouped sums
//! ```
//!
//! Invoice and invoice_item rows are written by `invoice.rs` ONLY. The
//! other repositories never touch those tables except to count references
//! before a delete.

pub mod analytics;
pub mod customer;
pub mod invoice;
pub mod product;

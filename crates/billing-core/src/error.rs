//! # Error Types
//!
//! Domain-specific error types for billing-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  billing-core errors (this file)                                       │
//! │  ├── CoreError        - Domain rule violations                         │
//! │  └── ValidationError  - Field-level input failures                     │
//! │                                                                         │
//! │  billing-db errors (separate crate)                                    │
//! │  ├── DbError          - Database operation failures                    │
//! │  └── InvoiceError     - Creation transaction taxonomy                  │
//! │                                                                         │
//! │  Bridge / HTTP errors (at the edges)                                   │
//! │  └── ApiError         - What clients see (serialized)                  │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → InvoiceError → ApiError → client  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (ids, amounts)
//! 3. Errors are enum variants, never String
//! 4. Reference failures and structural failures are distinct variants so
//!    the edges can classify them without string matching

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business rule errors.
///
/// The first two variants are the "invalid reference" family (the caller
/// named an entity that does not exist); the rest are the "invalid
/// invoice" family (the request itself is structurally wrong).
#[derive(Debug, Error)]
pub enum CoreError {
    /// The supplied customer id does not resolve to a customer.
    #[error("Customer not found: {0}")]
    CustomerNotFound(String),

    /// One or more supplied product ids do not resolve to products.
    #[error("Products not found: {}", ids.join(", "))]
    ProductsNotFound { ids: Vec<String> },

    /// An invoice must carry at least one line item.
    #[error("Invoice must contain at least one item")]
    EmptyInvoice,

    /// A line item's total disagrees with quantity × rate.
    #[error(
        "Item total for product {product_id} is {total_cents}, expected {quantity} x {rate_cents}"
    )]
    LineTotalMismatch {
        product_id: String,
        quantity: i64,
        rate_cents: i64,
        total_cents: i64,
    },

    /// The invoice total disagrees with the sum of its item totals.
    #[error("Invoice total is {supplied_cents}, item totals sum to {computed_cents}")]
    TotalMismatch {
        supplied_cents: i64,
        computed_cents: i64,
    },

    /// Field-level validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// True for the "caller referenced a missing entity" family.
    pub fn is_invalid_reference(&self) -> bool {
        matches!(
            self,
            CoreError::CustomerNotFound(_) | CoreError::ProductsNotFound { .. }
        )
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when user input does not meet field requirements, before
/// any business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID, malformed mobile number).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

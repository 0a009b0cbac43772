//! # API Error Type
//!
//! Unified, serializable error type for bridge commands and HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Flow                                      │
//! │                                                                         │
//! │  CoreError / DbError / InvoiceError (typed, internal detail)            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError { code, message }  ← this module                              │
//! │       │        raw storage text is logged here, never forwarded         │
//! │       ▼                                                                 │
//! │  Desktop shell: serialized as-is over the bridge                        │
//! │  HTTP server:   code → status, message → {"error": "..."}              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Code Taxonomy
//! The codes mirror the creation transaction's failure families so a
//! client can distinguish "fix your input" (INVALID_*, VALIDATION_ERROR)
//! from "try again later" (ALLOCATION_ERROR, STORAGE_ERROR) without
//! parsing message text.

use serde::Serialize;

use billing_core::{CoreError, ValidationError};
use billing_db::{DbError, InvoiceError};

/// API error returned from bridge commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "INVALID_REFERENCE",
///   "message": "Customer not found: 1b9c..."
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// A referenced customer or product does not exist (400)
    InvalidReference,

    /// The invoice request is structurally invalid (400)
    InvalidInvoice,

    /// Field-level input validation failed (400)
    ValidationError,

    /// Resource or operation not found (404)
    NotFound,

    /// Uniqueness conflict or referenced-entity deletion (409)
    Conflict,

    /// Invoice number allocation failed (500)
    AllocationError,

    /// Storage operation failed (500)
    StorageError,

    /// Internal error (500)
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts field validation errors to API errors.
impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

/// Converts domain errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        if err.is_invalid_reference() {
            return ApiError::new(ErrorCode::InvalidReference, err.to_string());
        }
        match err {
            CoreError::Validation(v) => ApiError::from(v),
            other => ApiError::new(ErrorCode::InvalidInvoice, other.to_string()),
        }
    }
}

/// Converts database errors to API errors.
///
/// Raw storage messages are logged and replaced with generic text so
/// internal error detail never reaches end users.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, .. } => ApiError::new(
                ErrorCode::Conflict,
                format!("Duplicate value for {}", field),
            ),
            DbError::InUse { .. } => ApiError::new(ErrorCode::Conflict, err.to_string()),
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                ApiError::new(ErrorCode::InvalidReference, "Invalid reference")
            }
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                ApiError::new(ErrorCode::StorageError, "Database connection failed")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Database migration failed: {}", e);
                ApiError::new(ErrorCode::StorageError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::StorageError, "Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                ApiError::new(ErrorCode::StorageError, "Database transaction failed")
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::StorageError, "Database pool exhausted")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::StorageError, "Database operation failed")
            }
        }
    }
}

/// Converts invoice creation errors to API errors.
impl From<InvoiceError> for ApiError {
    fn from(err: InvoiceError) -> Self {
        match err {
            InvoiceError::Domain(core) => ApiError::from(core),
            InvoiceError::Allocation(e) => {
                tracing::error!("Invoice number allocation failed: {}", e);
                ApiError::new(
                    ErrorCode::AllocationError,
                    "Failed to allocate an invoice number",
                )
            }
            InvoiceError::Storage(db) => ApiError::from(db),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// =============================================================================
// Unit Tests
// =============================================================================

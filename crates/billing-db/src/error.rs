//! # Database Error Types
//!
//! Error types for database operations and the invoice creation
//! transaction.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError (this module) ← Adds context and categorization               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  InvoiceError (this module) ← Creation-transaction taxonomy            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError / HTTP status (at the bindings)                              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use billing_core::CoreError;
use thiserror::Error;

/// Database operation errors.
///
/// These errors wrap sqlx errors and provide additional context
/// for debugging and user feedback.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in database.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation.
    ///
    /// ## When This Occurs
    /// - Inserting a duplicate product name or customer mobile
    /// - Duplicate invoice_number (the allocator race signature)
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// Foreign key constraint violation.
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// An entity cannot be deleted while invoices reference it.
    ///
    /// ## When This Occurs
    /// - Deleting a product that appears on an invoice item
    /// - Deleting a customer that owns invoices
    #[error("{entity} {id} is referenced by existing invoices")]
    InUse { entity: String, id: String },

    /// Database connection failed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Transaction failed.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Creates an InUse error for a referenced entity.
    pub fn in_use(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::InUse {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// True when this error is a unique violation on the given column
    /// (matched against the `table.column` the constraint names).
    pub fn is_unique_violation_on(&self, column: &str) -> bool {
        matches!(self, DbError::UniqueViolation { field, .. } if field.contains(column))
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → Analyze message for constraint type
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // SQLite error messages for constraints:
                // UNIQUE constraint: "UNIQUE constraint failed: <table>.<column>"
                // FK constraint: "FOREIGN KEY constraint failed"
                if msg.contains("UNIQUE constraint failed") {
                    let field = msg
                        .split("UNIQUE constraint failed: ")
                        .nth(1)
                        .unwrap_or("unknown")
                        .to_string();
                    DbError::UniqueViolation {
                        field,
                        value: "unknown".to_string(),
                    }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// Invoice Creation Error
// =============================================================================

/// The error taxonomy of the invoice creation transaction.
///
/// ## Classification
/// - `Domain` carries the invalid-reference and invalid-invoice families
///   from billing-core: client errors, never retried.
/// - `Allocation` is a failure computing the next invoice number (store
///   unreachable mid-read, or a malformed stored number). Server error;
///   never silently defaulted to serial 1.
/// - `Storage` wraps commit and query failures, including the
///   unique-violation-on-invoice_number race case that the repository
///   retries once before surfacing.
#[derive(Debug, Error)]
pub enum InvoiceError {
    #[error(transparent)]
    Domain(#[from] CoreError),

    #[error("Invoice number allocation failed: {0}")]
    Allocation(String),

    #[error(transparent)]
    Storage(#[from] DbError),
}

impl From<sqlx::Error> for InvoiceError {
    fn from(err: sqlx::Error) -> Self {
        InvoiceError::Storage(DbError::from(err))
    }
}

/// Result type for invoice creation.
pub type InvoiceResult<T> = Result<T, InvoiceError>;

// =============================================================================
// Unit Tests
// =============================================================================

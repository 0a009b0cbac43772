//! # Validation Module
//!
//! Input validation for the billing system.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Client (form checks, immediate feedback)                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Bridge / HTTP handler (Rust)                                 │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: field rules + invoice structure                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  ├── UNIQUE constraints (name, mobile, invoice_number)                 │
//! │  └── Foreign key constraints                                           │
//! │                                                                         │
//! │  Defense in depth: multiple layers catch different errors              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Totals Are Recomputed, Not Trusted
//! Clients submit per-item totals and a grand total alongside quantities
//! and rates. [`validate_new_invoice`] recomputes both and rejects any
//! disagreement, so the stored invoice arithmetic is always internally
//! consistent regardless of what the client sent.

use crate::error::{CoreError, ValidationError};
use crate::money::Money;
use crate::types::NewInvoice;
use crate::{MAX_ADDRESS_LEN, MAX_NAME_LEN, MOBILE_DIGITS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product or customer name.
///
/// ## Rules
/// - Must not be empty after trimming
/// - Must be at most 200 characters
///
/// ## Example
/// ```rust
/// use billing_core::validation::validate_name;
///
/// assert!(validate_name("Engine Oil 1L").is_ok());
/// assert!(validate_name("   ").is_err());
/// ```
pub fn validate_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a customer mobile number.
///
/// ## Rules
/// - Exactly 10 ASCII digits, no separators or country code
pub fn validate_mobile(mobile: &str) -> ValidationResult<()> {
    let mobile = mobile.trim();

    if mobile.is_empty() {
        return Err(ValidationError::Required {
            field: "mobile".to_string(),
        });
    }

    if mobile.len() != MOBILE_DIGITS || !mobile.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "mobile".to_string(),
            reason: format!("must be exactly {} digits", MOBILE_DIGITS),
        });
    }

    Ok(())
}

/// Validates a customer address.
pub fn validate_address(address: &str) -> ValidationResult<()> {
    let address = address.trim();

    if address.is_empty() {
        return Err(ValidationError::Required {
            field: "address".to_string(),
        });
    }

    if address.len() > MAX_ADDRESS_LEN {
        return Err(ValidationError::TooLong {
            field: "address".to_string(),
            max: MAX_ADDRESS_LEN,
        });
    }

    Ok(())
}

/// Validates a UUID string used as an entity reference.
pub fn validate_id(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a unit rate in paise.
///
/// ## Rules
/// - Must be non-negative (zero is allowed for complimentary items)
pub fn validate_rate_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "rate".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates an item quantity.
///
/// ## Rules
/// - Must be positive (> 0)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Invoice Structure
// =============================================================================

/// Validates the structure and arithmetic of a new invoice request.
///
/// ## Checks, in order (first failure wins)
/// 1. At least one item
/// 2. Every quantity positive, every rate non-negative
/// 3. Every item total == quantity × rate (recomputed, not trusted)
/// 4. Grand total == sum of item totals
///
/// Reference checks (does the customer/product exist) are storage reads
/// and live in `billing-db`; this function is the pure part that runs
/// before any store access.
pub fn validate_new_invoice(new: &NewInvoice) -> Result<(), CoreError> {
    if new.items.is_empty() {
        return Err(CoreError::EmptyInvoice);
    }

    let mut computed_total = Money::zero();

    for item in &new.items {
        validate_quantity(item.quantity)?;
        validate_rate_cents(item.rate_cents)?;

        let expected = Money::from_paise(item.rate_cents)
            .line_total(item.quantity)
            .ok_or_else(|| CoreError::LineTotalMismatch {
                product_id: item.product_id.clone(),
                quantity: item.quantity,
                rate_cents: item.rate_cents,
                total_cents: item.total_cents,
            })?;

        if expected.paise() != item.total_cents {
            return Err(CoreError::LineTotalMismatch {
                product_id: item.product_id.clone(),
                quantity: item.quantity,
                rate_cents: item.rate_cents,
                total_cents: item.total_cents,
            });
        }

        computed_total =
            computed_total
                .checked_add(expected)
                .ok_or_else(|| CoreError::TotalMismatch {
                    supplied_cents: new.total_cents,
                    computed_cents: i64::MAX,
                })?;
    }

    if computed_total.paise() != new.total_cents {
        return Err(CoreError::TotalMismatch {
            supplied_cents: new.total_cents,
            computed_cents: computed_total.paise(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NewInvoiceItem;

    fn item(product_id: &str, quantity: i64, rate: i64, total: i64) -> NewInvoiceItem {
        NewInvoiceItem {
            product_id: product_id.to_string(),
            quantity,
            rate_cents: rate,
            total_cents: total,
        }
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Engine Oil 1L").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_mobile() {
        assert!(validate_mobile("9876543210").is_ok());
        assert!(validate_mobile("").is_err());
        assert!(validate_mobile("12345").is_err());
        assert!(validate_mobile("98765432100").is_err());
        assert!(validate_mobile("98765o4321").is_err());
        assert!(validate_mobile("+919876543").is_err());
    }

    #[test]
    fn test_validate_address() {
        assert!(validate_address("12 Workshop Road, Sialkot").is_ok());
        assert!(validate_address(" ").is_err());
        assert!(validate_address(&"A".repeat(600)).is_err());
    }

    #[test]
    fn test_validate_id() {
        assert!(validate_id("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_id("").is_err());
        assert!(validate_id("not-a-uuid").is_err());
    }

    #[test]
    fn test_validate_rate_and_quantity() {
        assert!(validate_rate_cents(0).is_ok());
        assert!(validate_rate_cents(1099).is_ok());
        assert!(validate_rate_cents(-1).is_err());

        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-5).is_err());
    }

    #[test]
    fn test_new_invoice_happy_path() {
        let new = NewInvoice {
            customer_id: "c1".to_string(),
            items: vec![item("p1", 2, 5000, 10000), item("p2", 1, 2500, 2500)],
            total_cents: 12500,
        };
        assert!(validate_new_invoice(&new).is_ok());
    }

    #[test]
    fn test_new_invoice_rejects_empty_items() {
        let new = NewInvoice {
            customer_id: "c1".to_string(),
            items: vec![],
            total_cents: 0,
        };
        assert!(matches!(
            validate_new_invoice(&new),
            Err(CoreError::EmptyInvoice)
        ));
    }

    #[test]
    fn test_new_invoice_rejects_line_total_mismatch() {
        let new = NewInvoice {
            customer_id: "c1".to_string(),
            items: vec![item("p1", 2, 5000, 9999)],
            total_cents: 9999,
        };
        assert!(matches!(
            validate_new_invoice(&new),
            Err(CoreError::LineTotalMismatch { .. })
        ));
    }

    #[test]
    fn test_new_invoice_rejects_grand_total_mismatch() {
        let new = NewInvoice {
            customer_id: "c1".to_string(),
            items: vec![item("p1", 2, 5000, 10000)],
            total_cents: 9000,
        };
        assert!(matches!(
            validate_new_invoice(&new),
            Err(CoreError::TotalMismatch { .. })
        ));
    }

    #[test]
    fn test_new_invoice_rejects_nonpositive_quantity() {
        let new = NewInvoice {
            customer_id: "c1".to_string(),
            items: vec![item("p1", 0, 5000, 0)],
            total_cents: 0,
        };
        assert!(matches!(
            validate_new_invoice(&new),
            Err(CoreError::Validation(ValidationError::MustBePositive { .. }))
        ));
    }

    #[test]
    fn test_new_invoice_rejects_overflowing_line() {
        let new = NewInvoice {
            customer_id: "c1".to_string(),
            items: vec![item("p1", 3, i64::MAX / 2, 0)],
            total_cents: 0,
        };
        assert!(matches!(
            validate_new_invoice(&new),
            Err(CoreError::LineTotalMismatch { .. })
        ));
    }
}

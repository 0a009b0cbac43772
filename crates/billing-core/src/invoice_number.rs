//! # Invoice Number Module
//!
//! The pure half of the invoice number allocator: scope computation,
//! serial parsing and formatting. The storage half (finding the highest
//! existing number in a scope) lives in `billing-db`, which feeds its
//! result back through [`NumberScope::next_number`].
//!
//! ## Number Format
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Invoice Number Anatomy                            │
//! │                                                                         │
//! │                    0 1 2 / 0 3 / 2 4                                    │
//! │                    ──┬── ──┬──  ──┬──                                   │
//! │                      │     │      └── two-digit year                    │
//! │                      │     └── two-digit month                          │
//! │                      └── serial, zero-padded to 3 digits                │
//! │                                                                         │
//! │  The (month, year) pair is the SCOPE. Serials start at 1 in each        │
//! │  scope and increase without gaps. Past 999 the serial simply widens     │
//! │  ("1000/03/24"); the padding is a display minimum, not a cap.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Never Default On Parse Failure
//! A malformed stored number is an allocation error, not "serial 1".
//! Falling back to 1 would mint a duplicate of an existing number.

use chrono::{DateTime, Datelike, Utc};
use thiserror::Error;

/// Minimum serial width in a formatted invoice number.
const SERIAL_PAD: usize = 3;

/// Errors from invoice number parsing and allocation math.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvoiceNumberError {
    /// The stored number has no `/` separator or an empty serial part.
    #[error("Malformed invoice number: '{0}'")]
    Malformed(String),

    /// The serial component is not a decimal integer.
    #[error("Invoice number '{0}' has a non-numeric serial")]
    NonNumericSerial(String),

    /// The scope ran out of serials (next would overflow).
    #[error("Invoice serial overflow after {0}")]
    SerialOverflow(u64),
}

/// The `(month, two-digit year)` window invoice serials are scoped to.
///
/// ## Example
/// ```rust
/// use billing_core::invoice_number::NumberScope;
/// use chrono::{TimeZone, Utc};
///
/// let scope = NumberScope::for_date(Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap());
/// assert_eq!(scope.suffix(), "/03/24");
/// assert_eq!(scope.format_number(1), "001/03/24");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberScope {
    month: u32,
    /// Last two digits of the calendar year.
    year: u32,
}

impl NumberScope {
    /// Derives the numbering scope for a given date.
    pub fn for_date(date: DateTime<Utc>) -> Self {
        NumberScope {
            month: date.month(),
            year: date.year().rem_euclid(100) as u32,
        }
    }

    /// The scope suffix every number in this scope ends with: `"/MM/YY"`.
    pub fn suffix(&self) -> String {
        format!("/{:02}/{:02}", self.month, self.year)
    }

    /// SQL LIKE pattern matching any number in this scope: `"%/MM/YY"`.
    pub fn like_pattern(&self) -> String {
        format!("%{}", self.suffix())
    }

    /// Formats a serial into a full invoice number for this scope.
    ///
    /// Serials below 1000 are zero-padded to three digits; wider serials
    /// are emitted as-is.
    pub fn format_number(&self, serial: u64) -> String {
        format!("{:0pad$}{}", serial, self.suffix(), pad = SERIAL_PAD)
    }

    /// Computes the next invoice number given the highest existing number
    /// in this scope (or `None` when the scope is empty).
    ///
    /// ## Contract
    /// `highest` must come from a query scoped to this scope's suffix and
    /// must be read in the same transaction as the insert that will use
    /// the returned number.
    pub fn next_number(&self, highest: Option<&str>) -> Result<String, InvoiceNumberError> {
        let next = match highest {
            None => 1,
            Some(number) => {
                let serial = parse_serial(number)?;
                serial
                    .checked_add(1)
                    .ok_or(InvoiceNumberError::SerialOverflow(serial))?
            }
        };
        Ok(self.format_number(next))
    }
}

/// Parses the leading serial component of an invoice number.
///
/// The serial is the run of digits before the first `/`. Anything else
/// (missing separator, empty or non-numeric serial) is an error.
pub fn parse_serial(number: &str) -> Result<u64, InvoiceNumberError> {
    let serial_part = number
        .split('/')
        .next()
        .filter(|part| !part.is_empty())
        .ok_or_else(|| InvoiceNumberError::Malformed(number.to_string()))?;

    if number.split('/').count() < 2 {
        return Err(InvoiceNumberError::Malformed(number.to_string()));
    }

    serial_part
        .parse::<u64>()
        .map_err(|_| InvoiceNumberError::NonNumericSerial(number.to_string()))
}

// =============================================================================
// Unit Tests
// =============================================================================

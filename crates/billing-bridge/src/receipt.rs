//! # Receipt Rendering
//!
//! Renders a created invoice into a fixed-width document sized for a
//! 58mm thermal printer (32 columns). The shell owns the actual printer
//! dispatch; this module only produces the text.
//!
//! ## Layout
//! ```text
//! ┌────────────────────────────────┐
//! │         Your Shop Name         │  header (centered)
//! │ 123, Shop Street, City - 123456│
//! │     Phone: +91 1234567890      │
//! │--------------------------------│
//! │Invoice #: 001/03/24            │
//! │Date: 15/03/2024                │
//! │--------------------------------│
//! │Bill To:                        │
//! │Name: Ali Traders               │
//! │Mobile: 9876543210              │
//! │Address: 12 Workshop Road       │
//! │--------------------------------│
//! │Item         Qty    Rate  Amount│  item table
//! │Engine Oil 1   2   50.00  100.00│
//! │--------------------------------│
//! │                 Total: ₹100.00 │
//! │--------------------------------│
//! │Terms & Conditions:             │
//! │1. Goods once sold cannot be    │
//! │   returned                     │
//! │2. All disputes are subject to  │
//! │   local jurisdiction           │
//! │--------------------------------│
//! │  Thank you for your business!  │  footer (centered)
//! │          Visit Again           │
//! └────────────────────────────────┘
//! ```

use std::fmt::Write;

use crate::commands::invoice::InvoiceSummaryDto;
use billing_core::Money;

/// Printable width of the receipt in characters.
const WIDTH: usize = 32;

/// Item name column width; longer names are truncated.
const NAME_COL: usize = 11;

/// Store identity printed in the receipt header.
#[derive(Debug, Clone)]
pub struct ReceiptConfig {
    pub store_name: String,
    pub address_line: String,
    pub phone: String,
}

impl Default for ReceiptConfig {
    fn default() -> Self {
        ReceiptConfig {
            store_name: "Your Shop Name".to_string(),
            address_line: "123, Shop Street, City - 123456".to_string(),
            phone: "+91 1234567890".to_string(),
        }
    }
}

/// Renders an invoice as receipt text.
pub fn render(invoice: &InvoiceSummaryDto, config: &ReceiptConfig) -> String {
    let mut out = String::new();
    let rule = "-".repeat(WIDTH);

    // Header
    writeln!(out, "{}", center(&config.store_name)).ok();
    writeln!(out, "{}", center(&config.address_line)).ok();
    writeln!(out, "{}", center(&format!("Phone: {}", config.phone))).ok();
    writeln!(out, "{rule}").ok();

    writeln!(out, "Invoice #: {}", invoice.invoice_number).ok();
    writeln!(out, "Date: {}", invoice.date.format("%d/%m/%Y")).ok();
    writeln!(out, "{rule}").ok();

    // Bill-to block (the creation-time customer snapshot)
    writeln!(out, "Bill To:").ok();
    writeln!(out, "Name: {}", invoice.customer_details.name).ok();
    writeln!(out, "Mobile: {}", invoice.customer_details.mobile).ok();
    writeln!(out, "Address: {}", invoice.customer_details.address).ok();
    writeln!(out, "{rule}").ok();

    // Item table
    writeln!(
        out,
        "{:<name$} {:>3} {:>7} {:>8}",
        "Item",
        "Qty",
        "Rate",
        "Amount",
        name = NAME_COL
    )
    .ok();
    for item in &invoice.items {
        writeln!(
            out,
            "{:<name$} {:>3} {:>7} {:>8}",
            truncate(&item.name, NAME_COL),
            item.quantity,
            plain_amount(item.rate),
            plain_amount(item.total),
            name = NAME_COL
        )
        .ok();
    }
    writeln!(out, "{rule}").ok();

    let total_line = format!("Total: {}", Money::from_paise(invoice.total));
    writeln!(out, "{:>width$}", total_line, width = WIDTH).ok();
    writeln!(out, "{rule}").ok();

    // Terms
    writeln!(out, "Terms & Conditions:").ok();
    writeln!(out, "1. Goods once sold cannot be").ok();
    writeln!(out, "   returned").ok();
    writeln!(out, "2. All disputes are subject to").ok();
    writeln!(out, "   local jurisdiction").ok();
    writeln!(out, "{rule}").ok();

    // Footer
    writeln!(out, "{}", center("Thank you for your business!")).ok();
    writeln!(out, "{}", center("Visit Again")).ok();

    out
}

/// Formats paise as a bare decimal amount ("50.00") for table columns,
/// where the currency symbol would waste width.
fn plain_amount(paise: i64) -> String {
    let money = Money::from_paise(paise);
    let sign = if money.is_negative() { "-" } else { "" };
    format!("{}{}.{:02}", sign, money.rupees().abs(), money.paise_part())
}

/// Centers a line within the receipt width.
fn center(text: &str) -> String {
    let len = text.chars().count();
    if len >= WIDTH {
        return text.to_string();
    }
    let pad = (WIDTH - len) / 2;
    format!("{}{}", " ".repeat(pad), text)
}

/// Truncates a string to at most `max` characters.
fn truncate(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

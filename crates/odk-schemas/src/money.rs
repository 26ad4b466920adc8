//! Integer-cent money helpers.
//!
//! All order arithmetic (line totals, subtotal, grand total) is done in
//! integer cents. `f64` exists only on the serialized document surface;
//! use [`cents_to_amount`] exactly once, at assembly time, and
//! [`cents_from_amount`] to get back to cents before any comparison.

/// Convert a decimal amount (as read from reference data or a document
/// field) into integer cents, rounding half away from zero.
pub fn cents_from_amount(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

/// Convert integer cents into the decimal amount used on the wire.
pub fn cents_to_amount(cents: i64) -> f64 {
    cents as f64 / 100.0
}

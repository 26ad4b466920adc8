//! Strict document validation.
//!
//! The transformation pipeline runs [`validate`] on every assembled document
//! before it is handed to the submission gateway; a failure here aborts the
//! attempt so a malformed document is never transmitted.

use std::fmt;

use chrono::NaiveDate;

use crate::document::PurchaseOrder;
use crate::money::cents_from_amount;

// ---------------------------------------------------------------------------
// ValidationError
// ---------------------------------------------------------------------------

/// Why an assembled document was rejected.
///
/// Implements `std::error::Error` so it can be boxed and propagated through
/// `Box<dyn Error>` / `anyhow` chains without extra wrapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required string field is empty. Carries the JSON-ish field path.
    EmptyField(&'static str),
    /// A date field is not a valid ISO `YYYY-MM-DD` string.
    BadDate { field: &'static str, value: String },
    /// An item carries quantity zero; such lines must be filtered upstream.
    ZeroQuantity { item_number: String },
    /// A money field is negative.
    NegativeAmount { field: &'static str },
    /// `total != quantity × unit_price` for a line (compared in cents).
    LineTotalMismatch {
        item_number: String,
        expected_cents: i64,
        actual_cents: i64,
    },
    /// `subtotal != Σ line totals` (compared in cents).
    SubtotalMismatch { expected_cents: i64, actual_cents: i64 },
    /// `grand_total != subtotal + shipping + other_fees` (compared in cents).
    GrandTotalMismatch { expected_cents: i64, actual_cents: i64 },
    /// `total_bottles != Σ quantities`.
    BottleCountMismatch { expected: u32, actual: u32 },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyField(field) => {
                write!(f, "required field is empty: {field}")
            }
            ValidationError::BadDate { field, value } => {
                write!(f, "field {field} is not an ISO date: {value:?}")
            }
            ValidationError::ZeroQuantity { item_number } => {
                write!(f, "item {item_number} has zero quantity")
            }
            ValidationError::NegativeAmount { field } => {
                write!(f, "field {field} is negative")
            }
            ValidationError::LineTotalMismatch {
                item_number,
                expected_cents,
                actual_cents,
            } => write!(
                f,
                "item {item_number} total mismatch: expected {expected_cents} cents, got {actual_cents}"
            ),
            ValidationError::SubtotalMismatch {
                expected_cents,
                actual_cents,
            } => write!(
                f,
                "subtotal mismatch: expected {expected_cents} cents, got {actual_cents}"
            ),
            ValidationError::GrandTotalMismatch {
                expected_cents,
                actual_cents,
            } => write!(
                f,
                "grand_total mismatch: expected {expected_cents} cents, got {actual_cents}"
            ),
            ValidationError::BottleCountMismatch { expected, actual } => {
                write!(f, "total_bottles mismatch: expected {expected}, got {actual}")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

/// Check every schema invariant on an assembled document.
///
/// Returns the first violation found. Field-presence checks run before the
/// arithmetic checks so the error for a half-assembled document names the
/// missing field rather than a derived total.
pub fn validate(po: &PurchaseOrder) -> Result<(), ValidationError> {
    require(&po.po_number, "po_number")?;
    require_date(&po.po_date, "po_date")?;

    require(&po.company.name, "company.name")?;
    require(&po.company.address_line1, "company.address_line1")?;
    require(&po.company.phone, "company.phone")?;

    require(&po.to_manufacturer.name, "to_manufacturer.name")?;
    require(&po.to_manufacturer.company_name, "to_manufacturer.company_name")?;
    require(&po.ship_to.name, "ship_to.name")?;
    require(&po.ship_to.company_name, "ship_to.company_name")?;

    require_date(&po.general_po_info.est_delivery_date, "general_po_info.est_delivery_date")?;

    require_date(&po.auth_details.date_of_signature, "auth_details.date_of_signature")?;
    require(&po.auth_details.authority, "auth_details.authority")?;

    for instruction in &po.packaging_instructions {
        require(&instruction.component, "packaging_instructions[].component")?;
    }
    for annex in &po.annex_items {
        require(&annex.title, "annex_items[].title")?;
        require(&annex.r#type, "annex_items[].type")?;
    }

    // Line arithmetic, in cents.
    let mut subtotal_cents: i64 = 0;
    let mut bottle_count: u32 = 0;
    for item in &po.items {
        if item.quantity == 0 {
            return Err(ValidationError::ZeroQuantity {
                item_number: item.item_number.clone(),
            });
        }
        if item.unit_price < 0.0 {
            return Err(ValidationError::NegativeAmount {
                field: "items[].unit_price",
            });
        }
        let unit_cents = cents_from_amount(item.unit_price);
        let expected = unit_cents * i64::from(item.quantity);
        let actual = cents_from_amount(item.total);
        if expected != actual {
            return Err(ValidationError::LineTotalMismatch {
                item_number: item.item_number.clone(),
                expected_cents: expected,
                actual_cents: actual,
            });
        }
        subtotal_cents += actual;
        bottle_count += item.quantity;
    }

    let totals = &po.summary_totals;
    for (value, field) in [
        (totals.subtotal, "summary_totals.subtotal"),
        (totals.shipping, "summary_totals.shipping"),
        (totals.other_fees, "summary_totals.other_fees"),
        (totals.grand_total, "summary_totals.grand_total"),
        (totals.deposit, "summary_totals.deposit"),
    ] {
        if value < 0.0 {
            return Err(ValidationError::NegativeAmount { field });
        }
    }

    let actual_subtotal = cents_from_amount(totals.subtotal);
    if actual_subtotal != subtotal_cents {
        return Err(ValidationError::SubtotalMismatch {
            expected_cents: subtotal_cents,
            actual_cents: actual_subtotal,
        });
    }

    let expected_grand =
        actual_subtotal + cents_from_amount(totals.shipping) + cents_from_amount(totals.other_fees);
    let actual_grand = cents_from_amount(totals.grand_total);
    if actual_grand != expected_grand {
        return Err(ValidationError::GrandTotalMismatch {
            expected_cents: expected_grand,
            actual_cents: actual_grand,
        });
    }

    if totals.total_bottles != bottle_count {
        return Err(ValidationError::BottleCountMismatch {
            expected: bottle_count,
            actual: totals.total_bottles,
        });
    }

    Ok(())
}

fn require(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(())
}

fn require_date(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if NaiveDate::parse_from_str(value, "%Y-%m-%d").is_err() {
        return Err(ValidationError::BadDate {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

//! Canonical purchase-order document types and their strict validator.
//!
//! This crate defines **only** the wire-level document model: the JSON field
//! names here are the submission contract and must not drift. No lookup
//! logic, no wizard state, and no HTTP belong here.

pub mod document;
pub mod money;
pub mod validate;

pub use document::{
    AnnexedItem, AuthDetails, CompanyInfo, ContactInfo, GeneralPoInfo, LineItem,
    PackagingInstruction, PurchaseOrder, SummaryTotals,
};
pub use money::{cents_from_amount, cents_to_amount};
pub use validate::{validate, ValidationError};

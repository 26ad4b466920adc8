//! Order Transformation Pipeline.
//!
//! The single choke-point between wizard state and the wire: every document
//! the gateway sends was produced by [`build_purchase_order`], which resolves
//! all reference lookups up front, assembles the canonical document, and runs
//! the strict validator before returning. A document that fails validation
//! never leaves this crate.

pub mod numbering;
pub mod transform;

pub use numbering::next_po_number;
pub use transform::{build_purchase_order, TransformError};

//! Submission gateway.
//!
//! The only place that talks to the upstream purchase-order endpoint. The
//! gateway does one POST per call and relays whatever the upstream answered;
//! retry policy belongs to the operator, not this crate. Before anything is
//! sent, the document is also written to the exports directory as a local
//! JSON artifact so a submission is never lost to a transport failure.

pub mod artifact;
pub mod submit;

pub use artifact::write_po_artifact;
pub use submit::{GatewayError, SubmissionGateway, SubmitOutcome};

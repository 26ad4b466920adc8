//! odk-daemon library surface.
//!
//! `main.rs` is a thin binary; everything testable lives here so the
//! scenario tests in `tests/` can build the router in-process.

pub mod api_types;
pub mod routes;
pub mod state;

//! Reference data: the static JSON files behind the wizard.
//!
//! This crate defines **only** the typed snapshot of the reference files and
//! the lookups against it. No wizard state, no document assembly, no HTTP
//! belong here. Lookups that can fail return a [`RefdataError`] naming the
//! missing id; nothing falls through as a silent empty value into document
//! assembly.

pub mod error;
pub mod loader;
pub mod store;
pub mod types;

pub use error::RefdataError;
pub use store::{RefdataBuilder, RefdataStore};
pub use types::{CatalogEntry, NamedEntry, PoRecord, ProductInfo};

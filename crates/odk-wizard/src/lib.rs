//! Wizard State Container and Step Sequencing.
//!
//! The state is owned exclusively by a [`WizardSession`]; steps never mutate
//! it directly. They emit [`StepUpdate`] intent messages which the session
//! applies; the unidirectional flow keeps every mutation in one place and
//! makes the submitted state genuinely terminal.

pub mod session;
pub mod state;

pub use session::{SessionError, WizardSession, WizardStep};
pub use state::{is_valid_email, LabeledField, PackageInstructions, StepUpdate, WizardState};

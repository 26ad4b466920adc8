//! Request and response types for all odk-daemon HTTP endpoints.
//!
//! These types are `Serialize` (and `Deserialize` where tests decode them)
//! so they can be JSON-encoded by Axum. No business logic lives here.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use odk_refdata::CatalogEntry;
use odk_wizard::{WizardSession, WizardState, WizardStep};

// ---------------------------------------------------------------------------
// /v1/health
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub service: &'static str,
    pub version: &'static str,
}

// ---------------------------------------------------------------------------
// Error body, used by every refusing handler
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Wizard session views
// ---------------------------------------------------------------------------

/// Full session snapshot, returned by every session-mutating route so the
/// client never needs a follow-up GET.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub id: Uuid,
    pub step: WizardStep,
    pub step_index: u8,
    pub step_title: String,
    pub step_count: u8,
    pub submitted: bool,
    pub state: WizardState,
}

impl SessionResponse {
    pub fn from_session(session: &WizardSession) -> Self {
        Self {
            id: session.id,
            step: session.step,
            step_index: session.step.index(),
            step_title: session.step.title().to_string(),
            step_count: WizardStep::COUNT,
            submitted: session.submitted,
            state: session.state.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// /v1/catalog/:manufacturer
// ---------------------------------------------------------------------------

/// Priced products for the manufacturer: family catalog entries for the
/// requested families plus the manufacturer-specific other items.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogResponse {
    pub catalog: Vec<CatalogEntry>,
    pub other_items: Vec<CatalogEntry>,
}

// ---------------------------------------------------------------------------
// /v1/wizard/:id/submit
// ---------------------------------------------------------------------------

/// Outcome of a submission attempt that reached the upstream endpoint. The
/// HTTP status of the response itself relays the upstream status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub po_number: String,
    pub submitted: bool,
    pub upstream_status: u16,
    pub upstream_body: String,
    pub artifact_path: String,
}

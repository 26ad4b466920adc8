//! Shared runtime state for odk-daemon.
//!
//! All types here are `Clone`-able (via `Arc` or copy). Handlers receive
//! `State<Arc<AppState>>` from Axum; this module owns nothing async itself.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use odk_config::DaemonConfig;
use odk_gateway::SubmissionGateway;
use odk_refdata::RefdataStore;
use odk_wizard::WizardSession;

// ---------------------------------------------------------------------------
// BuildInfo
// ---------------------------------------------------------------------------

/// Static build metadata included in the health response.
#[derive(Clone, Debug)]
pub struct BuildInfo {
    pub service: &'static str,
    pub version: &'static str,
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// Cloneable (Arc) handle shared across all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// Static build metadata.
    pub build: BuildInfo,
    /// Effective configuration, resolved once at boot.
    pub config: DaemonConfig,
    /// Reference-data snapshot, immutable after load.
    pub refdata: Arc<RefdataStore>,
    /// In-memory wizard sessions. No persistence; a restart drops them.
    pub sessions: Arc<RwLock<HashMap<Uuid, WizardSession>>>,
    /// One shared HTTP client for all upstream calls.
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(config: DaemonConfig, refdata: RefdataStore) -> Self {
        Self {
            build: BuildInfo {
                service: "odk-daemon",
                version: env!("CARGO_PKG_VERSION"),
            },
            config,
            refdata: Arc::new(refdata),
            sessions: Arc::new(RwLock::new(HashMap::new())),
            http: reqwest::Client::new(),
        }
    }

    /// Gateway bound to the configured endpoint, or `None` while
    /// `ODK_ENDPOINT_POST` is unset.
    pub fn gateway(&self) -> Option<SubmissionGateway> {
        self.config
            .endpoint_post
            .as_ref()
            .map(|endpoint| SubmissionGateway::with_client(self.http.clone(), endpoint.clone()))
    }
}

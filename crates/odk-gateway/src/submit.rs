use std::fmt;

use serde::Serialize;
use tracing::info;

use odk_schemas::PurchaseOrder;

// ---------------------------------------------------------------------------
// GatewayError
// ---------------------------------------------------------------------------

/// The request never produced an upstream answer. An upstream answer with a
/// non-success status is NOT an error here; it comes back as a
/// [`SubmitOutcome`] so the caller can relay it verbatim.
#[derive(Debug)]
pub enum GatewayError {
    /// Serializing the payload failed.
    Encode(serde_json::Error),
    /// The POST itself failed (connect, TLS, timeout).
    Transport(reqwest::Error),
    /// The response status arrived but reading the body failed.
    BodyRead(reqwest::Error),
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayError::Encode(err) => write!(f, "payload encode failed: {err}"),
            GatewayError::Transport(err) => write!(f, "upstream request failed: {err}"),
            GatewayError::BodyRead(err) => write!(f, "upstream body read failed: {err}"),
        }
    }
}

impl std::error::Error for GatewayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GatewayError::Encode(err) => Some(err),
            GatewayError::Transport(err) => Some(err),
            GatewayError::BodyRead(err) => Some(err),
        }
    }
}

// ---------------------------------------------------------------------------
// SubmissionGateway
// ---------------------------------------------------------------------------

/// What the upstream answered. Status and body are relayed to the caller
/// unchanged, whatever they are.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub status: u16,
    pub body: String,
}

impl SubmitOutcome {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP client bound to one upstream endpoint URL.
#[derive(Debug, Clone)]
pub struct SubmissionGateway {
    http: reqwest::Client,
    endpoint: String,
}

impl SubmissionGateway {
    pub fn new(endpoint: String) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    /// Inject the client, so tests can point at a mock server.
    pub fn with_client(http: reqwest::Client, endpoint: String) -> Self {
        Self { http, endpoint }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POST one purchase-order document.
    pub async fn submit(&self, po: &PurchaseOrder) -> Result<SubmitOutcome, GatewayError> {
        let outcome = self.post_json(po).await?;
        info!(
            po_number = %po.po_number,
            status = outcome.status,
            "purchase order submitted upstream"
        );
        Ok(outcome)
    }

    /// POST an arbitrary JSON payload, for the pass-through forwarding route.
    pub async fn forward(&self, payload: &serde_json::Value) -> Result<SubmitOutcome, GatewayError> {
        self.post_json(payload).await
    }

    async fn post_json<T: Serialize>(&self, payload: &T) -> Result<SubmitOutcome, GatewayError> {
        let body = serde_json::to_string(payload).map_err(GatewayError::Encode)?;
        let response = self
            .http
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(GatewayError::Transport)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(GatewayError::BodyRead)?;
        Ok(SubmitOutcome { status, body })
    }
}

//! Axum router and all HTTP handlers for odk-daemon.
//!
//! `build_router` is the single entry point; `main.rs` calls it and attaches
//! middleware layers. All handlers are `pub(crate)` so the scenario tests in
//! `tests/` can compose the router directly.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use odk_gateway::write_po_artifact;
use odk_order::{build_purchase_order, next_po_number};
use odk_refdata::NamedEntry;
use odk_wizard::{is_valid_email, SessionError, StepUpdate, WizardSession};

use crate::{
    api_types::{CatalogResponse, ErrorResponse, HealthResponse, SessionResponse, SubmitResponse},
    state::AppState,
};

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the complete application router wired to the given shared state.
///
/// Middleware layers (CORS, tracing) are **not** applied here; `main.rs`
/// attaches them after this call so tests can use the bare router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/v1/health", get(health))
        .route("/v1/refdata/manufacturers", get(refdata_manufacturers))
        .route("/v1/refdata/ship-to", get(refdata_ship_to))
        .route("/v1/refdata/authorized-by", get(refdata_authorized_by))
        .route("/v1/refdata/product-families", get(refdata_product_families))
        .route("/v1/refdata/shipping-methods", get(refdata_shipping_methods))
        .route("/v1/refdata/terms", get(refdata_terms))
        .route("/v1/catalog/:manufacturer", get(catalog))
        .route("/v1/wizard", post(wizard_create))
        .route("/v1/wizard/:id", get(wizard_get).delete(wizard_delete))
        .route("/v1/wizard/:id/update", post(wizard_update))
        .route("/v1/wizard/:id/next", post(wizard_next))
        .route("/v1/wizard/:id/back", post(wizard_back))
        .route("/v1/wizard/:id/submit", post(wizard_submit))
        .route("/v1/forward", post(forward))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// GET /v1/health
// ---------------------------------------------------------------------------

pub(crate) async fn health(State(st): State<Arc<AppState>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            ok: true,
            service: st.build.service,
            version: st.build.version,
        }),
    )
}

// ---------------------------------------------------------------------------
// GET /v1/refdata/*  — option lists for the wizard dropdowns
// ---------------------------------------------------------------------------

pub(crate) async fn refdata_manufacturers(State(st): State<Arc<AppState>>) -> Json<Vec<NamedEntry>> {
    Json(st.refdata.manufacturers().to_vec())
}

pub(crate) async fn refdata_ship_to(State(st): State<Arc<AppState>>) -> Json<Vec<NamedEntry>> {
    Json(st.refdata.ship_to_options().to_vec())
}

pub(crate) async fn refdata_authorized_by(State(st): State<Arc<AppState>>) -> Json<Vec<NamedEntry>> {
    Json(st.refdata.authorized_by_options().to_vec())
}

#[derive(Debug, Deserialize)]
pub(crate) struct FamiliesQuery {
    /// When present, restrict to families the manufacturer actually prices.
    manufacturer: Option<String>,
}

pub(crate) async fn refdata_product_families(
    State(st): State<Arc<AppState>>,
    Query(query): Query<FamiliesQuery>,
) -> Json<Vec<NamedEntry>> {
    match query.manufacturer {
        Some(id) => Json(st.refdata.families_for_manufacturer(&id)),
        None => Json(st.refdata.product_families().to_vec()),
    }
}

pub(crate) async fn refdata_shipping_methods(
    State(st): State<Arc<AppState>>,
) -> Json<Vec<NamedEntry>> {
    Json(st.refdata.shipping_methods().to_vec())
}

pub(crate) async fn refdata_terms(State(st): State<Arc<AppState>>) -> Json<Vec<NamedEntry>> {
    Json(st.refdata.terms().to_vec())
}

// ---------------------------------------------------------------------------
// GET /v1/catalog/:manufacturer?families=a,b
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct CatalogQuery {
    /// Comma-separated family ids. Missing or empty means no family catalog,
    /// only the manufacturer's other items.
    families: Option<String>,
}

pub(crate) async fn catalog(
    State(st): State<Arc<AppState>>,
    Path(manufacturer): Path<String>,
    Query(query): Query<CatalogQuery>,
) -> Json<CatalogResponse> {
    let families: Vec<String> = query
        .families
        .as_deref()
        .unwrap_or("")
        .split(',')
        .filter(|part| !part.trim().is_empty())
        .map(|part| part.trim().to_string())
        .collect();

    Json(CatalogResponse {
        catalog: st.refdata.catalog_for(&manufacturer, &families),
        other_items: st.refdata.other_items_for(&manufacturer).to_vec(),
    })
}

// ---------------------------------------------------------------------------
// POST /v1/wizard  — create a session
// ---------------------------------------------------------------------------

pub(crate) async fn wizard_create(State(st): State<Arc<AppState>>) -> impl IntoResponse {
    let session = WizardSession::new(Uuid::new_v4());
    let view = SessionResponse::from_session(&session);

    st.sessions.write().await.insert(session.id, session);
    info!(session_id = %view.id, "wizard session created");
    (StatusCode::CREATED, Json(view))
}

// ---------------------------------------------------------------------------
// GET / DELETE /v1/wizard/:id
// ---------------------------------------------------------------------------

pub(crate) async fn wizard_get(
    State(st): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Response {
    match st.sessions.read().await.get(&id) {
        Some(session) => (StatusCode::OK, Json(SessionResponse::from_session(session))).into_response(),
        None => session_not_found(id),
    }
}

pub(crate) async fn wizard_delete(
    State(st): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Response {
    match st.sessions.write().await.remove(&id) {
        Some(_) => {
            info!(session_id = %id, "wizard session deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        None => session_not_found(id),
    }
}

// ---------------------------------------------------------------------------
// POST /v1/wizard/:id/update
// ---------------------------------------------------------------------------

pub(crate) async fn wizard_update(
    State(st): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(update): Json<StepUpdate>,
) -> Response {
    let mut sessions = st.sessions.write().await;
    let Some(session) = sessions.get_mut(&id) else {
        return session_not_found(id);
    };

    match session.apply(update) {
        Ok(()) => (StatusCode::OK, Json(SessionResponse::from_session(session))).into_response(),
        Err(err) => session_error(err),
    }
}

// ---------------------------------------------------------------------------
// POST /v1/wizard/:id/next  /back
// ---------------------------------------------------------------------------

pub(crate) async fn wizard_next(
    State(st): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Response {
    let mut sessions = st.sessions.write().await;
    let Some(session) = sessions.get_mut(&id) else {
        return session_not_found(id);
    };

    session.next();
    (StatusCode::OK, Json(SessionResponse::from_session(session))).into_response()
}

pub(crate) async fn wizard_back(
    State(st): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Response {
    let mut sessions = st.sessions.write().await;
    let Some(session) = sessions.get_mut(&id) else {
        return session_not_found(id);
    };

    match session.back() {
        Ok(_) => (StatusCode::OK, Json(SessionResponse::from_session(session))).into_response(),
        Err(err) => session_error(err),
    }
}

// ---------------------------------------------------------------------------
// POST /v1/wizard/:id/submit
// ---------------------------------------------------------------------------

/// Body of the submit request. The recipient email can be set here instead
/// of a prior `set_email` update; the body may be omitted entirely.
#[derive(Debug, Deserialize)]
pub(crate) struct SubmitRequest {
    email: Option<String>,
}

/// Run the whole submission pipeline for one session: gate checks, document
/// assembly, local artifact, upstream POST. The session lock is held across
/// the upstream call so two concurrent submits of the same daemon cannot
/// interleave and double-send.
pub(crate) async fn wizard_submit(
    State(st): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    body: Option<Json<SubmitRequest>>,
) -> Response {
    let mut sessions = st.sessions.write().await;
    let Some(session) = sessions.get_mut(&id) else {
        return session_not_found(id);
    };

    if let Err(err) = session.ensure_submittable() {
        return session_error(err);
    }
    if let Some(Json(SubmitRequest { email: Some(email) })) = body {
        session.state.email = email;
    }
    if !is_valid_email(&session.state.email) {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse::new("recipient email address is invalid")),
        )
            .into_response();
    }

    let Some(gateway) = st.gateway() else {
        warn!(session_id = %id, "submit refused: no upstream endpoint configured");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new("API endpoint is not configured")),
        )
            .into_response();
    };

    let po_number = next_po_number(st.refdata.existing_pos()).to_string();
    let today = chrono::Utc::now().date_naive();
    let po = match build_purchase_order(&session.state, &st.refdata, &po_number, today) {
        Ok(po) => po,
        Err(err) => {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorResponse::new(err.to_string())),
            )
                .into_response();
        }
    };

    // Artifact first: the document is on disk even if the POST fails. A
    // failed write is logged but does not block the submission itself.
    let artifact_path = match write_po_artifact(&st.config.exports_dir, &po) {
        Ok(path) => path.display().to_string(),
        Err(err) => {
            warn!(session_id = %id, error = %format!("{err:#}"), "artifact write failed");
            String::new()
        }
    };

    let outcome = match gateway.submit(&po).await {
        Ok(outcome) => outcome,
        Err(err) => {
            warn!(session_id = %id, error = %err, "upstream submission failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to forward request")),
            )
                .into_response();
        }
    };

    // Terminal only on upstream success; anything else stays resubmittable.
    if outcome.is_success() {
        session.mark_submitted();
    }

    let status =
        StatusCode::from_u16(outcome.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    info!(
        session_id = %id,
        po_number = %po_number,
        upstream_status = outcome.status,
        "submission attempt finished"
    );
    (
        status,
        Json(SubmitResponse {
            po_number,
            submitted: outcome.is_success(),
            upstream_status: outcome.status,
            upstream_body: outcome.body,
            artifact_path,
        }),
    )
        .into_response()
}

// ---------------------------------------------------------------------------
// POST /v1/forward  — raw pass-through to the upstream endpoint
// ---------------------------------------------------------------------------

/// Forward an arbitrary JSON payload to the configured endpoint and relay the
/// upstream status and body verbatim. Other HTTP methods on this path get the
/// router's automatic 405.
pub(crate) async fn forward(
    State(st): State<Arc<AppState>>,
    Json(payload): Json<serde_json::Value>,
) -> Response {
    let Some(gateway) = st.gateway() else {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new("API endpoint is not configured")),
        )
            .into_response();
    };

    match gateway.forward(&payload).await {
        Ok(outcome) => {
            let status =
                StatusCode::from_u16(outcome.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, outcome.body).into_response()
        }
        Err(err) => {
            warn!(error = %err, "forwarding failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to forward request")),
            )
                .into_response()
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn session_not_found(id: Uuid) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new(format!("no wizard session {id}"))),
    )
        .into_response()
}

fn session_error(err: SessionError) -> Response {
    let status = match err {
        SessionError::AlreadySubmitted | SessionError::NotOnConfirmationStep { .. } => {
            StatusCode::CONFLICT
        }
        SessionError::BadIndex(_) => StatusCode::UNPROCESSABLE_ENTITY,
    };
    (status, Json(ErrorResponse::new(err.to_string()))).into_response()
}

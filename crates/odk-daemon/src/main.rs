//! odk-daemon entry point.
//!
//! This file is intentionally thin: it sets up tracing, loads configuration
//! and reference data, wires middleware, and starts the HTTP server. All
//! route handlers live in `routes.rs`; all shared state types live in
//! `state.rs`.

use std::sync::Arc;

use anyhow::Context;
use axum::http::{HeaderValue, Method};
use odk_config::DaemonConfig;
use odk_daemon::{routes, state};
use odk_refdata::RefdataStore;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{info, warn, Level};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env.local if present (dev convenience). Silent if the file does
    // not exist; production injects env vars directly.
    let _ = dotenvy::from_filename(".env.local");

    init_tracing();

    let config = DaemonConfig::from_env().context("configuration failed")?;
    if config.endpoint_post.is_none() {
        warn!("ODK_ENDPOINT_POST is unset; submission and forwarding will be refused");
    }

    let refdata = RefdataStore::load_dir(&config.refdata_dir).with_context(|| {
        format!(
            "failed to load reference data from {}",
            config.refdata_dir.display()
        )
    })?;

    let addr = config.addr;
    let shared = Arc::new(state::AppState::new(config, refdata));

    let app = routes::build_router(Arc::clone(&shared))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_localhost_only());

    info!("odk-daemon listening on http://{}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, app)
        .await
        .context("server crashed")?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}

/// CORS: allow only localhost origins.
fn cors_localhost_only() -> CorsLayer {
    let allowed_origins = [
        "http://localhost",
        "http://127.0.0.1",
        "http://localhost:3000",
        "http://127.0.0.1:3000",
        "http://localhost:5173",
        "http://127.0.0.1:5173",
    ];

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(tower_http::cors::Any)
}

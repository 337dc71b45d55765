//! Health and status endpoints.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::health::ProbeOutcome;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health))
        .route("/status", get(status))
}

/// GET /health - probe the backend's listing endpoint.
async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<Value>) {
    match state.probe.probe(state.config.ollama.probe_timeout()).await {
        ProbeOutcome::Healthy => (StatusCode::OK, Json(json!({ "status": "ok" }))),
        ProbeOutcome::Unreachable => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "backend unreachable" })),
        ),
    }
}

/// GET /status - gateway status report.
async fn status(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "backend_state": state.readiness.state().as_str(),
        "model": state.config.ollama.model,
        "cache_size": state.gateway.cache_size(),
        "active_users": state.active_user_count(),
    }))
}

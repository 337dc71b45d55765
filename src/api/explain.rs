//! Explanation endpoint over the gateway contract.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;

use crate::error::GatewayError;
use crate::gateway::InferenceResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ExplainRequest {
    pub topic: String,
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/explain", post(explain))
}

/// POST /explain - run one topic through the gateway.
async fn explain(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ExplainRequest>,
) -> Result<Json<InferenceResponse>, GatewayError> {
    let response = state.gateway.handle(&request.topic).await?;
    Ok(Json(response))
}

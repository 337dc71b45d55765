//! Failure taxonomy for the inference gateway.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::backend::BackendError;

/// Failures the gateway surfaces to its callers.
///
/// Raw transport errors never leak past the gateway; every backend fault
/// arrives here as `Inference`. None of these are retried inside the gateway,
/// callers re-issue the request on a later turn.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Empty or whitespace-only topic; the caller should prompt for input.
    #[error("empty request")]
    EmptyRequest,

    /// The backend has not reached readiness yet; retry shortly.
    #[error("backend unavailable")]
    BackendUnavailable,

    /// The backend call failed, timed out, or returned garbage.
    #[error("inference failed: {0}")]
    Inference(#[from] BackendError),
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            GatewayError::EmptyRequest => (StatusCode::BAD_REQUEST, "empty_request"),
            GatewayError::BackendUnavailable => {
                (StatusCode::SERVICE_UNAVAILABLE, "backend_unavailable")
            }
            GatewayError::Inference(_) => (StatusCode::BAD_GATEWAY, "inference_failed"),
        };

        let body = Json(json!({
            "error": {
                "type": error_type,
                "message": self.to_string()
            }
        }));

        (status, body).into_response()
    }
}

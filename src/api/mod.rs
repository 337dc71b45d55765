//! Status and explanation HTTP surface.

pub mod explain;
pub mod health;

use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

/// Build the API router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .merge(health::router())
        .merge(explain::router())
}

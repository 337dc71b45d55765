//! Shared application state.

use std::sync::Arc;

use dashmap::DashMap;

use crate::config::Config;
use crate::gateway::InferenceGateway;
use crate::health::HealthProbe;
use crate::readiness::ReadinessController;

/// Per-user conversation state, tracked only for status reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserState {
    /// Greeted via /start, no topic asked yet.
    Idle,
    /// Has asked at least one topic.
    Engaged,
}

/// Shared state for the HTTP handlers and the chat transport.
pub struct AppState {
    pub config: Config,
    pub gateway: Arc<InferenceGateway>,
    pub readiness: Arc<ReadinessController>,
    pub probe: HealthProbe,
    /// Last-write-wins per-user state; never evicted.
    pub user_states: DashMap<i64, UserState>,
}

impl AppState {
    pub fn new(
        config: Config,
        gateway: Arc<InferenceGateway>,
        readiness: Arc<ReadinessController>,
        probe: HealthProbe,
    ) -> Self {
        Self {
            config,
            gateway,
            readiness,
            probe,
            user_states: DashMap::new(),
        }
    }

    pub fn active_user_count(&self) -> usize {
        self.user_states.len()
    }
}

//! Backend lifecycle state machine and warm-up task.
//!
//! The backend may take tens of seconds to load weights, so readiness is
//! computed once by a background task and cheaply polled thereafter. Caller
//! requests never block on warm-up.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use crate::backend::{BackendError, ChatBackend};
use crate::config::WarmupConfig;

/// Prompt for the trial inference confirming the model is loaded.
const TRIAL_PROMPT: &str = "Hello";

/// Lifecycle state of the inference backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BackendState {
    /// Process just started, the backend has not answered a listing call yet.
    Booting = 0,
    /// Backend reachable, model presence and trial inference in progress.
    Warming = 1,
    /// A trial inference succeeded.
    Ready = 2,
    /// Retry budget exhausted; terminal until an explicit re-probe.
    Degraded = 3,
}

impl BackendState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => BackendState::Booting,
            1 => BackendState::Warming,
            2 => BackendState::Ready,
            _ => BackendState::Degraded,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BackendState::Booting => "booting",
            BackendState::Warming => "warming",
            BackendState::Ready => "ready",
            BackendState::Degraded => "degraded",
        }
    }
}

/// Owns the backend's lifecycle state; single writer, any number of readers.
pub struct ReadinessController {
    backend: Arc<dyn ChatBackend>,
    model: String,
    config: WarmupConfig,
    state: AtomicU8,
}

impl ReadinessController {
    pub fn new(backend: Arc<dyn ChatBackend>, model: String, config: WarmupConfig) -> Self {
        Self {
            backend,
            model,
            config,
            state: AtomicU8::new(BackendState::Booting as u8),
        }
    }

    pub fn state(&self) -> BackendState {
        BackendState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Non-blocking readiness check; true only once a trial inference has
    /// succeeded.
    pub fn is_ready(&self) -> bool {
        self.state() == BackendState::Ready
    }

    fn set_state(&self, next: BackendState) {
        self.state.store(next as u8, Ordering::Release);
        tracing::info!("backend state: {}", next.as_str());
    }

    #[cfg(test)]
    pub(crate) fn force_state(&self, state: BackendState) {
        self.set_state(state);
    }

    /// Spawn the warm-up sequence. Called once at process startup.
    pub fn start(self: Arc<Self>) {
        tokio::spawn(async move {
            self.warm_up().await;
        });
    }

    /// Transition `Degraded` or `Ready` back into `Warming` and re-run the
    /// warm-up rounds. No-op while booting or already warming.
    pub fn force_reprobe(self: Arc<Self>) {
        for current in [BackendState::Degraded, BackendState::Ready] {
            let swapped = self.state.compare_exchange(
                current as u8,
                BackendState::Warming as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            );
            if swapped.is_ok() {
                tracing::info!("re-probing backend from {} state", current.as_str());
                tokio::spawn(async move {
                    self.warm_up_rounds().await;
                });
                return;
            }
        }
    }

    async fn warm_up(&self) {
        // Let the backend process finish booting before the first round.
        tokio::time::sleep(self.config.boot_delay()).await;
        self.warm_up_rounds().await;
    }

    async fn warm_up_rounds(&self) {
        for attempt in 1..=self.config.max_attempts {
            match self.warm_up_round().await {
                Ok(()) => {
                    self.set_state(BackendState::Ready);
                    tracing::info!(
                        "model {} ready after {} attempt(s)",
                        self.model,
                        attempt
                    );
                    return;
                }
                Err(e) => {
                    tracing::warn!(
                        "model not ready yet (attempt {}/{}): {}",
                        attempt,
                        self.config.max_attempts,
                        e
                    );
                    tokio::time::sleep(self.config.retry_delay()).await;
                }
            }
        }

        self.set_state(BackendState::Degraded);
        tracing::error!(
            "model {} failed to load after {} attempts",
            self.model,
            self.config.max_attempts
        );
    }

    /// One warm-up round: list models, pull the target if absent, trial chat.
    async fn warm_up_round(&self) -> Result<(), BackendError> {
        let models = self.backend.list_models().await?;

        // Backend answered, so it is past booting.
        if self.state() == BackendState::Booting {
            self.set_state(BackendState::Warming);
        }

        if !models.iter().any(|m| m == &self.model) {
            tracing::info!("model {} not found, pulling", self.model);
            self.backend.pull_model(&self.model).await?;
            // Give the backend time to register the pulled weights.
            tokio::time::sleep(self.config.pull_wait()).await;
        }

        self.backend.chat(&self.model, TRIAL_PROMPT, None).await?;
        Ok(())
    }
}

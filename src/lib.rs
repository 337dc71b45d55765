pub mod api;
pub mod backend;
pub mod cache;
pub mod config;
pub mod error;
pub mod gateway;
pub mod health;
pub mod readiness;
pub mod state;
pub mod telegram;
pub mod test_util;

pub use backend::{BackendError, ChatBackend, ChatOptions, OllamaClient};
pub use cache::ResponseCache;
pub use config::Config;
pub use error::GatewayError;
pub use gateway::{InferenceGateway, InferenceResponse};
pub use health::{HealthProbe, ProbeOutcome};
pub use readiness::{BackendState, ReadinessController};
pub use state::{AppState, UserState};

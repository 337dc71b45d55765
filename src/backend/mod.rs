//! Inference backend abstraction.
//!
//! The gateway talks to the backend through the `ChatBackend` trait so tests
//! can substitute a scripted implementation for the real Ollama client.

mod ollama;

pub use ollama::OllamaClient;

use async_trait::async_trait;

/// Errors from the backend collaborator.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("backend communication error: {0}")]
    Communication(String),

    #[error("inference failed: {0}")]
    InferenceFailed(String),

    #[error("invalid backend response: {0}")]
    InvalidResponse(String),

    #[error("model pull failed: {0}")]
    PullFailed(String),
}

pub type Result<T> = std::result::Result<T, BackendError>;

/// Decoding options for a chat call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChatOptions {
    pub temperature: f32,
    /// Output-length cap in tokens.
    pub num_predict: u32,
}

/// Operations the gateway needs from an inference backend.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// List identifiers of models the backend currently knows about.
    async fn list_models(&self) -> Result<Vec<String>>;

    /// Fetch a model into the backend. May block for a long time.
    async fn pull_model(&self, name: &str) -> Result<()>;

    /// Run one non-streaming chat call and return the response text.
    async fn chat(&self, model: &str, prompt: &str, options: Option<ChatOptions>)
        -> Result<String>;
}

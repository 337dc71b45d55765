//! The readiness-gated inference gateway.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::backend::{ChatBackend, ChatOptions};
use crate::cache::{normalize_topic, ResponseCache};
use crate::error::GatewayError;
use crate::readiness::ReadinessController;

/// Conservative decoding settings, chosen to keep latency acceptable on
/// constrained hardware.
const EXPLAIN_OPTIONS: ChatOptions = ChatOptions {
    temperature: 0.1,
    num_predict: 300,
};

/// One inbound explanation request. Ephemeral, never persisted.
#[derive(Debug, Clone)]
pub struct InferenceRequest {
    pub topic: String,
    pub created_at: DateTime<Utc>,
}

impl InferenceRequest {
    fn new(topic: String) -> Self {
        Self {
            topic,
            created_at: Utc::now(),
        }
    }
}

/// Result of a handled request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceResponse {
    pub text: String,
    pub served_from_cache: bool,
}

/// Public entry point: cache-first, readiness-gated, single-attempt inference.
pub struct InferenceGateway {
    backend: Arc<dyn ChatBackend>,
    cache: Arc<ResponseCache>,
    readiness: Arc<ReadinessController>,
    model: String,
}

impl InferenceGateway {
    pub fn new(
        backend: Arc<dyn ChatBackend>,
        cache: Arc<ResponseCache>,
        readiness: Arc<ReadinessController>,
        model: String,
    ) -> Self {
        Self {
            backend,
            cache,
            readiness,
            model,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.readiness.is_ready()
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }

    /// Handle one user topic.
    ///
    /// Cached answers are served even when the backend is down; a hit skips
    /// the readiness check entirely. On a miss there is no queueing and no
    /// retry, callers re-issue the request on a later turn.
    pub async fn handle(&self, topic: &str) -> Result<InferenceResponse, GatewayError> {
        let key = normalize_topic(topic);
        if key.is_empty() {
            return Err(GatewayError::EmptyRequest);
        }

        if let Some(text) = self.cache.get(&key) {
            tracing::debug!("cache hit for topic '{}'", key);
            return Ok(InferenceResponse {
                text,
                served_from_cache: true,
            });
        }

        if !self.readiness.is_ready() {
            return Err(GatewayError::BackendUnavailable);
        }

        let request = InferenceRequest::new(key);
        let prompt = build_prompt(&request.topic);
        let text = self
            .backend
            .chat(&self.model, &prompt, Some(EXPLAIN_OPTIONS))
            .await?;

        let latency_ms = (Utc::now() - request.created_at).num_milliseconds();
        tracing::info!(
            "explained '{}' in {}ms ({} chars)",
            request.topic,
            latency_ms,
            text.len()
        );

        self.cache.put(&request.topic, text.clone());
        Ok(InferenceResponse {
            text,
            served_from_cache: false,
        })
    }
}

/// Fixed instructional template embedding the topic.
fn build_prompt(topic: &str) -> String {
    format!(
        "You are SystemSensei, a system design expert. Explain this concept clearly and concisely.\n\
         \n\
         Topic: {topic}\n\
         \n\
         Please provide:\n\
         1. A simple analogy or real-world example\n\
         2. Key characteristics and components\n\
         3. When to use it and when to avoid it\n\
         4. Related technologies or patterns\n\
         \n\
         Keep it under 500 words. Use Markdown for formatting."
    )
}

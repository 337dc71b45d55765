//! Ollama backend client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{BackendError, ChatBackend, ChatOptions, Result};

/// Client for the Ollama HTTP API.
pub struct OllamaClient {
    http_client: Client,
    base_url: String,
    request_timeout: Duration,
}

impl OllamaClient {
    pub fn new(base_url: &str, request_timeout: Duration) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            request_timeout,
        }
    }
}

// ============================================================================
// Ollama API types
// ============================================================================

#[derive(Debug, Serialize)]
struct OllamaChatRequest {
    model: String,
    messages: Vec<OllamaMessage>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<OllamaOptions>,
}

#[derive(Debug, Serialize)]
struct OllamaMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: OllamaResponseMessage,
}

#[derive(Debug, Deserialize)]
struct OllamaResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Response from /api/tags.
#[derive(Debug, Deserialize)]
struct OllamaTagsResponse {
    #[serde(default)]
    models: Vec<OllamaModelTag>,
}

#[derive(Debug, Deserialize)]
struct OllamaModelTag {
    name: String,
}

#[derive(Debug, Serialize)]
struct OllamaPullRequest {
    name: String,
    stream: bool,
}

// ============================================================================
// ChatBackend implementation
// ============================================================================

#[async_trait]
impl ChatBackend for OllamaClient {
    async fn list_models(&self) -> Result<Vec<String>> {
        let url = format!("{}/api/tags", self.base_url);

        let response = self
            .http_client
            .get(&url)
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| BackendError::Communication(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BackendError::Communication(format!(
                "Ollama returned {}",
                response.status()
            )));
        }

        let tags: OllamaTagsResponse = response
            .json()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))?;

        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    async fn pull_model(&self, name: &str) -> Result<()> {
        let url = format!("{}/api/pull", self.base_url);

        tracing::info!("Pulling model {} via {}", name, url);

        let request = OllamaPullRequest {
            name: name.to_string(),
            stream: false,
        };

        // Pulls can take far longer than a chat call; no client-side timeout.
        let response = self
            .http_client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| BackendError::Communication(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::PullFailed(format!("{}: {}", status, body)));
        }

        Ok(())
    }

    async fn chat(
        &self,
        model: &str,
        prompt: &str,
        options: Option<ChatOptions>,
    ) -> Result<String> {
        let ollama_request = OllamaChatRequest {
            model: model.to_string(),
            messages: vec![OllamaMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            stream: false,
            options: options.map(|o| OllamaOptions {
                temperature: o.temperature,
                num_predict: o.num_predict,
            }),
        };

        let url = format!("{}/api/chat", self.base_url);

        tracing::debug!("Sending chat request to Ollama: {} model={}", url, model);

        let response = self
            .http_client
            .post(&url)
            .json(&ollama_request)
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| BackendError::Communication(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::InferenceFailed(format!("{}: {}", status, body)));
        }

        let ollama_response: OllamaChatResponse = response
            .json()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))?;

        ollama_response
            .message
            .content
            .ok_or_else(|| BackendError::InvalidResponse("response without content".to_string()))
    }
}

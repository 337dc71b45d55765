//! Minimal Telegram Bot API client.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum TelegramError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    #[error("Telegram API error: {0}")]
    Api(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

// ============================================================================
// Bot API types (only the fields the bot reads)
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    #[serde(default)]
    pub from: Option<User>,
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    pub first_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    #[serde(default)]
    result: Option<T>,
    #[serde(default)]
    description: Option<String>,
}

/// Long-polling client for the Bot API.
pub struct TelegramClient {
    http_client: Client,
    base_url: String,
}

impl TelegramClient {
    pub fn new(api_url: &str, token: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: format!("{}/bot{}", api_url.trim_end_matches('/'), token),
        }
    }

    /// Fetch pending updates, long-polling up to `timeout_secs` server-side.
    pub async fn get_updates(
        &self,
        offset: i64,
        timeout_secs: u64,
    ) -> Result<Vec<Update>, TelegramError> {
        // Client timeout sits above the server-side long-poll window.
        let timeout = Duration::from_secs(timeout_secs + 10);
        self.call(
            "getUpdates",
            &json!({ "offset": offset, "timeout": timeout_secs }),
            timeout,
        )
        .await
    }

    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), TelegramError> {
        let _: serde_json::Value = self
            .call(
                "sendMessage",
                &json!({ "chat_id": chat_id, "text": text, "parse_mode": "Markdown" }),
                Duration::from_secs(10),
            )
            .await?;
        Ok(())
    }

    pub async fn send_chat_action(&self, chat_id: i64, action: &str) -> Result<(), TelegramError> {
        let _: serde_json::Value = self
            .call(
                "sendChatAction",
                &json!({ "chat_id": chat_id, "action": action }),
                Duration::from_secs(10),
            )
            .await?;
        Ok(())
    }

    async fn call<T: DeserializeOwned + Default, B: Serialize>(
        &self,
        method: &str,
        body: &B,
        timeout: Duration,
    ) -> Result<T, TelegramError> {
        let url = format!("{}/{}", self.base_url, method);

        let response = self
            .http_client
            .post(&url)
            .json(body)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| TelegramError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TelegramError::Api(format!("{}: {}", status, body)));
        }

        let api: ApiResponse<T> = response
            .json()
            .await
            .map_err(|e| TelegramError::InvalidResponse(e.to_string()))?;

        if !api.ok {
            return Err(TelegramError::Api(
                api.description
                    .unwrap_or_else(|| "unknown error".to_string()),
            ));
        }

        api.result
            .ok_or_else(|| TelegramError::InvalidResponse("missing result".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_embeds_token() {
        let client = TelegramClient::new("https://api.telegram.org/", "123:ABC");
        assert_eq!(client.base_url, "https://api.telegram.org/bot123:ABC");
    }

    #[test]
    fn test_parse_update_with_text_message() {
        let json = r#"{
            "update_id": 42,
            "message": {
                "message_id": 7,
                "from": {"id": 99, "is_bot": false, "first_name": "Ada"},
                "chat": {"id": 99, "type": "private"},
                "text": "Load Balancer"
            }
        }"#;

        let update: Update = serde_json::from_str(json).unwrap();
        assert_eq!(update.update_id, 42);
        let message = update.message.unwrap();
        assert_eq!(message.chat.id, 99);
        assert_eq!(message.text.as_deref(), Some("Load Balancer"));
        assert_eq!(message.from.unwrap().first_name, "Ada");
    }

    #[test]
    fn test_parse_update_without_message() {
        let json = r#"{"update_id": 43}"#;
        let update: Update = serde_json::from_str(json).unwrap();
        assert!(update.message.is_none());
    }
}

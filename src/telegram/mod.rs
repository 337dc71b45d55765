//! Telegram long-polling transport.
//!
//! Thin glue between the Bot API and the gateway: one task per inbound
//! message, the gateway does all the real work.

mod api;

pub use api::{Chat, Message, TelegramClient, TelegramError, Update, User};

use std::sync::Arc;
use std::time::Duration;

use crate::error::GatewayError;
use crate::health::ProbeOutcome;
use crate::state::{AppState, UserState};

const POLL_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Long-poll loop over getUpdates.
pub struct TelegramTransport {
    client: Arc<TelegramClient>,
    state: Arc<AppState>,
}

impl TelegramTransport {
    pub fn new(client: Arc<TelegramClient>, state: Arc<AppState>) -> Self {
        Self { client, state }
    }

    /// Run indefinitely. Poll failures log, back off, and retry.
    pub async fn run(&self) {
        let poll_timeout = self.state.config.telegram.poll_timeout_secs;
        let mut offset = 0i64;

        loop {
            match self.client.get_updates(offset, poll_timeout).await {
                Ok(updates) => {
                    for update in updates {
                        offset = offset.max(update.update_id + 1);
                        let Some(message) = update.message else {
                            continue;
                        };
                        let client = Arc::clone(&self.client);
                        let state = Arc::clone(&self.state);
                        tokio::spawn(async move {
                            if let Err(e) = handle_message(&client, &state, message).await {
                                tracing::error!("failed to handle message: {}", e);
                            }
                        });
                    }
                }
                Err(e) => {
                    tracing::error!("update poll failed: {}", e);
                    tokio::time::sleep(POLL_RETRY_DELAY).await;
                }
            }
        }
    }
}

/// Dispatch one inbound message: command or topic.
async fn handle_message(
    client: &TelegramClient,
    state: &AppState,
    message: Message,
) -> Result<(), TelegramError> {
    let chat_id = message.chat.id;
    let Some(text) = message.text.as_deref() else {
        return Ok(());
    };
    let text = text.trim();

    match parse_command(text) {
        Some("start") => {
            if let Some(user) = &message.from {
                state.user_states.insert(user.id, UserState::Idle);
            }
            let first_name = message
                .from
                .as_ref()
                .map(|u| u.first_name.as_str())
                .unwrap_or("there");
            client.send_message(chat_id, &welcome_text(first_name)).await
        }
        Some("status") => {
            let outcome = state.probe.probe(state.config.ollama.probe_timeout()).await;
            // A caller-visible probe failure is the trigger for re-warming.
            if outcome == ProbeOutcome::Unreachable {
                Arc::clone(&state.readiness).force_reprobe();
            }
            client.send_message(chat_id, &status_text(state, outcome)).await
        }
        Some(other) => {
            tracing::debug!("ignoring unknown command /{}", other);
            client
                .send_message(chat_id, "Unknown command. Send me a topic instead!")
                .await
        }
        None => handle_topic(client, state, &message, text).await,
    }
}

async fn handle_topic(
    client: &TelegramClient,
    state: &AppState,
    message: &Message,
    topic: &str,
) -> Result<(), TelegramError> {
    let chat_id = message.chat.id;
    if let Some(user) = &message.from {
        state.user_states.insert(user.id, UserState::Engaged);
    }

    if let Err(e) = client.send_chat_action(chat_id, "typing").await {
        tracing::warn!("failed to send typing action: {}", e);
    }

    let reply = match state.gateway.handle(topic).await {
        Ok(response) => response.text,
        Err(GatewayError::EmptyRequest) => "Please send a topic or question!".to_string(),
        Err(GatewayError::BackendUnavailable) => {
            "⚠️ AI engine is starting up. Please wait a moment and try again.".to_string()
        }
        Err(GatewayError::Inference(e)) => {
            tracing::error!("inference failed for '{}': {}", topic, e);
            "❌ Sorry, I'm having trouble processing your request. \
             The model might still be loading. Try again in a moment."
                .to_string()
        }
    };

    client.send_message(chat_id, &reply).await
}

/// Extract the command name from text like "/status@SenseiBot extra".
fn parse_command(text: &str) -> Option<&str> {
    let first = text.split_whitespace().next()?;
    let name = first.strip_prefix('/')?;
    let name = name.split('@').next().unwrap_or(name);
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

fn welcome_text(first_name: &str) -> String {
    format!(
        "👋 Hello {first_name}! I'm *SystemSensei*, your AI system design mentor.\n\
         \n\
         I can help you with:\n\
         • Explaining system design concepts\n\
         • Architecture patterns\n\
         • Technology comparisons\n\
         • Design principles\n\
         \n\
         Just send me a topic like:\n\
         • `Load Balancer`\n\
         • `CAP Theorem`\n\
         • `Microservices vs Monolith`\n\
         • `Database indexing`"
    )
}

fn status_text(state: &AppState, outcome: ProbeOutcome) -> String {
    let health = match outcome {
        ProbeOutcome::Healthy => "✅ Healthy",
        ProbeOutcome::Unreachable => "❌ Unhealthy",
    };
    format!(
        "🔄 *System Status*\n\
         • Backend Health: {health}\n\
         • Backend State: {}\n\
         • Model: `{}`\n\
         • Cache Size: {} topics\n\
         • Active Users: {}",
        state.readiness.state().as_str(),
        state.config.ollama.model,
        state.gateway.cache_size(),
        state.active_user_count(),
    )
}

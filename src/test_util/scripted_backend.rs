use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::backend::{BackendError, ChatBackend, ChatOptions, Result};

/// Scripted in-memory backend.
///
/// Chat replies come from a FIFO script; when the script is empty, the
/// fallback reply is used, and with neither set the call fails. All calls are
/// counted so tests can assert the backend was (or was not) touched.
#[derive(Default)]
pub struct ScriptedBackend {
    models: Mutex<Vec<String>>,
    chat_script: Mutex<VecDeque<std::result::Result<String, String>>>,
    fallback_reply: Mutex<Option<String>>,
    pub list_calls: AtomicUsize,
    pub pull_calls: AtomicUsize,
    pub chat_calls: AtomicUsize,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(name: &str) -> Self {
        let backend = Self::default();
        backend.add_model(name);
        backend
    }

    pub fn add_model(&self, name: &str) {
        self.models.lock().unwrap().push(name.to_string());
    }

    /// Queue one chat outcome.
    pub fn push_chat(&self, outcome: std::result::Result<&str, &str>) {
        self.chat_script
            .lock()
            .unwrap()
            .push_back(outcome.map(String::from).map_err(String::from));
    }

    /// Reply used once the script runs dry.
    pub fn reply_with(&self, text: &str) {
        *self.fallback_reply.lock().unwrap() = Some(text.to_string());
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    async fn list_models(&self) -> Result<Vec<String>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.models.lock().unwrap().clone())
    }

    async fn pull_model(&self, name: &str) -> Result<()> {
        self.pull_calls.fetch_add(1, Ordering::SeqCst);
        self.add_model(name);
        Ok(())
    }

    async fn chat(
        &self,
        _model: &str,
        _prompt: &str,
        _options: Option<ChatOptions>,
    ) -> Result<String> {
        self.chat_calls.fetch_add(1, Ordering::SeqCst);

        // Yield so concurrent callers interleave like real network calls.
        tokio::task::yield_now().await;

        let scripted = self.chat_script.lock().unwrap().pop_front();
        if let Some(outcome) = scripted {
            return outcome.map_err(BackendError::InferenceFailed);
        }
        if let Some(reply) = self.fallback_reply.lock().unwrap().clone() {
            return Ok(reply);
        }
        Err(BackendError::InferenceFailed("no scripted reply".to_string()))
    }
}

//! Configuration for the gateway and its collaborators.

use std::time::Duration;

use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;

/// Main configuration structure, read once at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub ollama: OllamaConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub warmup: WarmupConfig,
}

/// Chat transport configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramConfig {
    /// Bot access token. Required; the process does not start without it.
    pub bot_token: String,
    /// Long-poll timeout passed to getUpdates.
    #[serde(default = "default_poll_timeout")]
    pub poll_timeout_secs: u64,
    /// Bot API base URL, overridable for tests.
    #[serde(default = "default_telegram_api_url")]
    pub api_url: String,
}

/// Inference backend configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct OllamaConfig {
    #[serde(default = "default_ollama_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Per-request timeout for backend calls.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    /// Timeout for the model-listing probe used by health and status checks.
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_secs: u64,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: default_ollama_url(),
            model: default_model(),
            request_timeout_secs: default_request_timeout(),
            probe_timeout_secs: default_probe_timeout(),
        }
    }
}

impl OllamaConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }
}

/// Status HTTP surface configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Timing and retry budget for the backend warm-up sequence.
#[derive(Debug, Clone, Deserialize)]
pub struct WarmupConfig {
    /// Delay before the first round, letting the backend process boot.
    #[serde(default = "default_boot_delay")]
    pub boot_delay_secs: u64,
    /// Wait after a model pull before the trial inference.
    #[serde(default = "default_pull_wait")]
    pub pull_wait_secs: u64,
    /// Backoff between failed rounds.
    #[serde(default = "default_retry_delay")]
    pub retry_delay_secs: u64,
    /// Rounds attempted before giving up and going degraded.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl Default for WarmupConfig {
    fn default() -> Self {
        Self {
            boot_delay_secs: default_boot_delay(),
            pull_wait_secs: default_pull_wait(),
            retry_delay_secs: default_retry_delay(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl WarmupConfig {
    pub fn boot_delay(&self) -> Duration {
        Duration::from_secs(self.boot_delay_secs)
    }

    pub fn pull_wait(&self) -> Duration {
        Duration::from_secs(self.pull_wait_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }
}

// Default values
fn default_poll_timeout() -> u64 {
    30
}
fn default_telegram_api_url() -> String {
    "https://api.telegram.org".to_string()
}
fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}
fn default_model() -> String {
    "deepseek-r1:8b".to_string()
}
fn default_request_timeout() -> u64 {
    120
}
fn default_probe_timeout() -> u64 {
    5
}
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_boot_delay() -> u64 {
    2
}
fn default_pull_wait() -> u64 {
    10
}
fn default_retry_delay() -> u64 {
    5
}
fn default_max_attempts() -> u32 {
    5
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Configuration sources (in order of precedence):
    /// 1. Environment variables (SENSEI__SECTION__KEY format)
    /// 2. config.toml file (if present)
    /// 3. Built-in defaults
    pub fn load() -> Result<Self, ConfigError> {
        let config = ConfigLoader::builder()
            .add_source(File::with_name("config").required(false))
            .add_source(
                Environment::with_prefix("SENSEI")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = config.try_deserialize()?;

        if config.telegram.bot_token.trim().is_empty() {
            return Err(ConfigError::Message(
                "telegram.bot_token must not be empty".to_string(),
            ));
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_api_config() {
        let api = ApiConfig::default();
        assert_eq!(api.host, "0.0.0.0");
        assert_eq!(api.port, 8080);
    }

    #[test]
    fn test_default_warmup_config() {
        let warmup = WarmupConfig::default();
        assert_eq!(warmup.boot_delay(), Duration::from_secs(2));
        assert_eq!(warmup.pull_wait(), Duration::from_secs(10));
        assert_eq!(warmup.retry_delay(), Duration::from_secs(5));
        assert_eq!(warmup.max_attempts, 5);
    }

    #[test]
    fn test_default_ollama_config() {
        let ollama = OllamaConfig::default();
        assert_eq!(ollama.base_url, "http://localhost:11434");
        assert_eq!(ollama.model, "deepseek-r1:8b");
        assert_eq!(ollama.request_timeout(), Duration::from_secs(120));
        assert_eq!(ollama.probe_timeout(), Duration::from_secs(5));
    }
}

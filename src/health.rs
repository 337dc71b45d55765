//! Liveness probe for the inference backend.

use std::time::Duration;

use reqwest::Client;

/// Outcome of a single liveness probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    Healthy,
    Unreachable,
}

/// Stateless probe against the backend's model listing endpoint.
///
/// Retry policy belongs to callers; one call issues exactly one request.
pub struct HealthProbe {
    http_client: Client,
    tags_url: String,
}

impl HealthProbe {
    pub fn new(base_url: &str) -> Self {
        Self {
            http_client: Client::new(),
            tags_url: format!("{}/api/tags", base_url.trim_end_matches('/')),
        }
    }

    /// Issue one bounded-timeout status request.
    ///
    /// Any non-success status, timeout, or transport failure is `Unreachable`.
    pub async fn probe(&self, timeout: Duration) -> ProbeOutcome {
        match self
            .http_client
            .get(&self.tags_url)
            .timeout(timeout)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => {
                tracing::debug!("backend probe: healthy");
                ProbeOutcome::Healthy
            }
            Ok(response) => {
                tracing::warn!("backend probe returned {}", response.status());
                ProbeOutcome::Unreachable
            }
            Err(e) => {
                tracing::warn!("backend probe failed: {}", e);
                ProbeOutcome::Unreachable
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_url_normalization() {
        let probe = HealthProbe::new("http://localhost:11434/");
        assert_eq!(probe.tags_url, "http://localhost:11434/api/tags");
    }
}

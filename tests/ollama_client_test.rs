//! Tests for the Ollama client and the health probe against a mock server.

use std::time::Duration;

use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use system_sensei::backend::{BackendError, ChatBackend, ChatOptions, OllamaClient};
use system_sensei::health::{HealthProbe, ProbeOutcome};
use system_sensei::test_util::MockOllama;

const MODEL: &str = "deepseek-r1:8b";

fn client(server: &MockServer) -> OllamaClient {
    OllamaClient::new(&server.uri(), Duration::from_secs(5))
}

#[tokio::test]
async fn test_chat_returns_response_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_partial_json(serde_json::json!({
            "model": MODEL,
            "stream": false,
            "options": { "num_predict": 300 }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockOllama::chat("here you go")))
        .expect(1)
        .mount(&server)
        .await;

    let options = ChatOptions {
        temperature: 0.1,
        num_predict: 300,
    };
    let text = client(&server)
        .chat(MODEL, "Explain sharding", Some(options))
        .await
        .unwrap();
    assert_eq!(text, "here you go");
}

#[tokio::test]
async fn test_chat_error_status_is_inference_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(500).set_body_json(MockOllama::error("model loading")))
        .mount(&server)
        .await;

    let result = client(&server).chat(MODEL, "hi", None).await;
    assert!(matches!(result, Err(BackendError::InferenceFailed(_))));
}

#[tokio::test]
async fn test_chat_malformed_body_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let result = client(&server).chat(MODEL, "hi", None).await;
    assert!(matches!(result, Err(BackendError::InvalidResponse(_))));
}

#[tokio::test]
async fn test_chat_timeout_is_communication_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(MockOllama::chat("late"))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let slow_client = OllamaClient::new(&server.uri(), Duration::from_millis(100));
    let result = slow_client.chat(MODEL, "hi", None).await;
    assert!(matches!(result, Err(BackendError::Communication(_))));
}

#[tokio::test]
async fn test_list_models_parses_tags() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(MockOllama::tags(&[MODEL, "llama3.2"])),
        )
        .mount(&server)
        .await;

    let models = client(&server).list_models().await.unwrap();
    assert_eq!(models, vec![MODEL.to_string(), "llama3.2".to_string()]);
}

#[tokio::test]
async fn test_list_models_error_status_is_communication_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let result = client(&server).list_models().await;
    assert!(matches!(result, Err(BackendError::Communication(_))));
}

#[tokio::test]
async fn test_pull_model_success_and_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/pull"))
        .and(body_partial_json(serde_json::json!({"name": MODEL})))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockOllama::pull_success()))
        .expect(1)
        .mount(&server)
        .await;

    client(&server).pull_model(MODEL).await.unwrap();

    let failing = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/pull"))
        .respond_with(ResponseTemplate::new(404).set_body_json(MockOllama::error("no such model")))
        .mount(&failing)
        .await;

    let result = client(&failing).pull_model("nope").await;
    assert!(matches!(result, Err(BackendError::PullFailed(_))));
}

#[tokio::test]
async fn test_probe_healthy_backend() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockOllama::tags(&[])))
        .mount(&server)
        .await;

    let probe = HealthProbe::new(&server.uri());
    assert_eq!(
        probe.probe(Duration::from_secs(5)).await,
        ProbeOutcome::Healthy
    );
}

#[tokio::test]
async fn test_probe_error_status_is_unreachable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let probe = HealthProbe::new(&server.uri());
    assert_eq!(
        probe.probe(Duration::from_secs(5)).await,
        ProbeOutcome::Unreachable
    );
}

#[tokio::test]
async fn test_probe_timeout_is_unreachable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(MockOllama::tags(&[]))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let probe = HealthProbe::new(&server.uri());
    assert_eq!(
        probe.probe(Duration::from_millis(100)).await,
        ProbeOutcome::Unreachable
    );
}

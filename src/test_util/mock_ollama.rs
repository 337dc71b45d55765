use serde_json::{json, Value};

/// Canned Ollama JSON bodies for wiremock-based tests.
pub struct MockOllama;

impl MockOllama {
    pub fn tags(models: &[&str]) -> Value {
        json!({
            "models": models.iter().map(|m| json!({"name": m, "model": m})).collect::<Vec<_>>()
        })
    }

    pub fn chat(content: &str) -> Value {
        json!({
            "message": {
                "role": "assistant",
                "content": content
            },
            "done": true,
            "prompt_eval_count": 10,
            "eval_count": content.split_whitespace().count()
        })
    }

    pub fn pull_success() -> Value {
        json!({"status": "success"})
    }

    pub fn error(message: &str) -> Value {
        json!({"error": message})
    }
}

//! Test doubles shared by unit and integration tests.

mod mock_ollama;
mod scripted_backend;

pub use mock_ollama::MockOllama;
pub use scripted_backend::ScriptedBackend;

//! SystemSensei - Telegram front-end over a readiness-gated Ollama gateway.

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use system_sensei::api;
use system_sensei::backend::{ChatBackend, OllamaClient};
use system_sensei::cache::ResponseCache;
use system_sensei::config::Config;
use system_sensei::gateway::InferenceGateway;
use system_sensei::health::HealthProbe;
use system_sensei::readiness::ReadinessController;
use system_sensei::state::AppState;
use system_sensei::telegram::{TelegramClient, TelegramTransport};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration; a missing bot token is fatal here.
    let config = Config::load().map_err(|e| {
        format!(
            "Failed to load configuration: {}. \
             Make sure config.toml exists or set SENSEI__TELEGRAM__BOT_TOKEN.",
            e
        )
    })?;

    tracing::info!(
        "Starting system-sensei {}: model {} at {}",
        env!("CARGO_PKG_VERSION"),
        config.ollama.model,
        config.ollama.base_url
    );

    // Wire up the gateway
    let backend: Arc<dyn ChatBackend> = Arc::new(OllamaClient::new(
        &config.ollama.base_url,
        config.ollama.request_timeout(),
    ));
    let cache = Arc::new(ResponseCache::new());
    let readiness = Arc::new(ReadinessController::new(
        Arc::clone(&backend),
        config.ollama.model.clone(),
        config.warmup.clone(),
    ));
    let gateway = Arc::new(InferenceGateway::new(
        backend,
        cache,
        Arc::clone(&readiness),
        config.ollama.model.clone(),
    ));
    let probe = HealthProbe::new(&config.ollama.base_url);

    // Warm the model in the background; callers never wait on this.
    Arc::clone(&readiness).start();

    let state = Arc::new(AppState::new(config, gateway, readiness, probe));

    // Status HTTP surface
    let app = Router::new()
        .merge(api::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(Arc::clone(&state));

    let addr = format!("{}:{}", state.config.api.host, state.config.api.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Status API listening on {}", addr);
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("status API server error: {}", e);
        }
    });

    // Telegram long-poll loop runs in the foreground.
    let client = Arc::new(TelegramClient::new(
        &state.config.telegram.api_url,
        &state.config.telegram.bot_token,
    ));
    let transport = TelegramTransport::new(client, state);
    tracing::info!("Starting Telegram long-poll loop");
    transport.run().await;

    Ok(())
}

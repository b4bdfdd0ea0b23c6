//! Docsmith gateway: document forms plus streamed generation over SSE.
//!
//! Startup: `.env` → `Settings::load` → tracing → router → listen on `BIND_ADDR`.
//! A missing `ANTHROPIC_API_KEY` is not fatal; generation endpoints answer 503 until it is set.

mod app;
mod error;
mod handlers;
mod relay;

use app::{build_app, AppState};
use docsmith_core::{AnthropicService, Settings, TextGenerator};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        // Tracing is not up yet; a missing .env is normal in deployed environments.
        eprintln!("[docsmith-gateway] .env not loaded: {} (using process environment)", e);
    }

    let settings = Settings::load()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| settings.default_log_directive().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if !settings.is_configured() {
        tracing::warn!(
            target: "docsmith::gateway",
            "ANTHROPIC_API_KEY is not set; generation endpoints will answer 503"
        );
    }

    let generator: Arc<dyn TextGenerator> = Arc::new(AnthropicService::from_settings(&settings));
    let bind_addr = settings.bind_addr.clone();
    tracing::info!(target: "docsmith::gateway", settings = ?settings, "Settings loaded");

    let app = build_app(AppState::new(settings, generator));
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(
        target: "docsmith::gateway",
        addr = %listener.local_addr()?,
        "Docsmith gateway listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

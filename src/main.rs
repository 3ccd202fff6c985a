//! CHEESA-BOT - chat proxy
//!
//! Forwards chat turns from the CHEESA website to Gemini, adding the
//! CHEESA-BOT persona and keeping the API key on the server.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod conversation;
mod core;
mod providers;
mod routes;

use config::Config;
use crate::core::ChatEngine;
use providers::GeminiProvider;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub chat_engine: Arc<ChatEngine>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cheesa_bot=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    let provider = GeminiProvider::from_config(&config);
    tracing::info!("Using model {}", config.model);

    let state = AppState {
        chat_engine: Arc::new(ChatEngine::new(Arc::new(provider))),
    };

    let app = routes::app(state);

    tracing::info!("CHEESA-BOT API running at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

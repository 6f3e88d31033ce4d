//! transdesk translation server.
//!
//! # Environment Variables
//!
//! - `AZURE_OPENAI_ENDPOINT`, `AZURE_OPENAI_API_KEY` — required
//! - `AZURE_OPENAI_API_VERSION` — default `2024-02-01`
//! - `AZURE_OPENAI_DEPLOYMENT` — default `gpt-4o`
//! - `TRANSDESK_LLM_TIMEOUT_SECS` — optional model request timeout
//! - `HOST` / `PORT` — bind address (default `0.0.0.0:8000`)
//! - `TRANSDESK_DATABASE` — SQLite file for `/projects` (default
//!   `translations.db`, `off` to disable)
//! - `RUST_LOG` — tracing filter (default `info,transdesk=debug`)
//!
//! A `.env` file in the working directory is read first if present.

use std::sync::Arc;

use anyhow::Context;
use transdesk::config::{self, ServerConfig};
use transdesk::llms::providers::AzureCompletion;
use transdesk::server::{app_router, AppState};
use transdesk::{Store, Translator};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,transdesk=debug".into()),
        )
        .init();

    config::load_dotenv();
    let config = ServerConfig::from_env().context("Invalid server configuration")?;

    tracing::info!("Endpoint: {}", config.azure.endpoint);
    tracing::info!("API Key: ****");
    tracing::info!("API Version: {}", config.azure.api_version);
    tracing::info!("Deployment: {}", config.azure.deployment);

    let llm = AzureCompletion::from_config(&config.azure).context("Failed to build model client")?;
    let mut state = AppState::new(Translator::new(Arc::new(llm)));

    if let Some(path) = &config.database {
        let store = Store::open(path)
            .with_context(|| format!("Failed to open database at {}", path.display()))?;
        tracing::info!("Translation store: {}", path.display());
        state = state.with_store(Arc::new(store));
    } else {
        tracing::warn!("TRANSDESK_DATABASE=off, /projects routes disabled");
    }

    let app = app_router(state);
    let bind_addr = config.bind_addr()?;

    tracing::info!("transdesk server starting on {}", bind_addr);
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health               — liveness probe");
    tracing::info!("  POST /translate/{{language}}/ — translate into one language");
    tracing::info!("  POST /translate/           — translate into the batch set");

    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server failed")?;

    tracing::info!("transdesk server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

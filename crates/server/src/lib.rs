//! HTTP server and answer pipeline for localaid.
//!
//! Wires the directory, prompt and generator crates together behind two
//! endpoints:
//!
//! - `GET /health` reports how much data is loaded and which model is bound.
//! - `POST /api/ask` answers a question from the directory.
//!
//! # Example
//! ```no_run
//! use localaid_core::AppConfig;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = AppConfig::load(None)?;
//! localaid_server::run_server(&config).await?;
//! # Ok(())
//! # }
//! ```

pub mod answer;
pub mod error;
pub mod routes;
pub mod state;

#[cfg(test)]
mod tests;

pub use answer::{answer_question, AnswerResponse, MISSING_QUESTION, NO_DATA};
pub use error::ApiError;
pub use routes::{router, AskRequest, HealthResponse};
pub use state::AppState;

use anyhow::Context;
use localaid_core::AppConfig;
use tokio::net::TcpListener;

/// Load state from `config` and serve until interrupted.
pub async fn run_server(config: &AppConfig) -> anyhow::Result<()> {
    let state = AppState::from_config(config).context("Failed to initialize server state")?;

    let bind_addr = config.bind_addr();
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;

    serve(listener, state).await
}

/// Serve `state` on an already bound listener.
pub async fn serve(listener: TcpListener, state: AppState) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!(
        "Listening on http://{} ({} records, model: {})",
        addr,
        state.directory.len(),
        state.model_name().await.as_deref().unwrap_or("none")
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

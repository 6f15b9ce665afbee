use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use attend_api::state::AppState;
use attend_api::{app, config};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    // Structured JSON logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .json()
        .init();

    let config = config::load()?;
    let addr = config.bind_addr()?;
    let state = AppState::from_config(config)?;
    tracing::info!(
        rows = state.dataset.len(),
        fallback_used = state.dataset.provenance.fallback_used,
        "dataset ready"
    );

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

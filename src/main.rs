use std::time::Duration;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use text_translator::config::Config;
use text_translator::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("text_translator=debug,tower_http=debug")),
        )
        .init();

    let config = Config::discover(&Config::candidate_paths());

    let app_state = AppState::new(config.clone())?;
    if app_state.languages().is_empty() {
        tracing::warn!("Language table is empty; every request will be rejected");
    }
    info!("Audio clips stored in {}", app_state.audio().dir().display());

    let sweeper = app_state
        .audio()
        .spawn_sweeper(Duration::from_secs(config.audio.sweep_interval_secs.max(1)));

    let app = text_translator::app(app_state.clone());

    // Start server
    let listener =
        tokio::net::TcpListener::bind((config.server.host.as_str(), config.server.port)).await?;
    info!("Starting server on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    sweeper.abort();
    let removed = app_state.audio().clear();
    info!("Shut down, removed {} audio clips", removed);

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

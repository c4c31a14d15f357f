//! HTTP serving layer
//!
//! Wires the serving core (registry, cache, window log, task queue, drift
//! reporter) into an axum application with graceful shutdown: the response
//! loop stops first, then in-flight background tasks drain, then the model
//! registry is cleared.

mod api;
mod error;
mod handlers;
mod middleware;
mod state;

pub use api::create_router;
pub use error::ServerError;
pub use state::AppState;

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;

use crate::config::AppConfig;

/// Start the server with the given configuration
pub async fn run_server(config: AppConfig) -> anyhow::Result<()> {
    let start_time = chrono::Utc::now();

    let state = Arc::new(AppState::new(config.clone())?);
    info!(
        models = ?state.registry.names().iter().map(|n| n.as_str()).collect::<Vec<_>>(),
        ttl_secs = config.cache_ttl.as_secs(),
        window_size = config.window_size,
        started_at = %start_time.to_rfc3339(),
        "Serving state initialized"
    );

    let app = create_router(Arc::clone(&state));

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(address = %addr, pid = std::process::id(), "Server listening");
    info!(url = %format!("http://{}/api/health", addr), "Health endpoint available");
    info!(url = %format!("http://{}/api/monitoring", addr), "Drift monitoring available");

    let shutdown_signal = async move {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C signal handler");
        let stop_time = chrono::Utc::now();
        let uptime = stop_time.signed_duration_since(start_time);
        info!(
            stopped_at = %stop_time.to_rfc3339(),
            uptime_secs = uptime.num_seconds(),
            "Shutdown signal received, stopping server gracefully"
        );
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    // Scheduled appends drain before the registry goes away
    state.shutdown().await;
    info!("Server shut down cleanly");
    Ok(())
}

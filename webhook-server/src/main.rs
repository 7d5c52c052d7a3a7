//! Pushhook - GitHub push webhook receiver.
//!
//! This binary loads configuration once, then serves:
//! - `POST /webhook`: authenticated webhook intake
//! - `GET /health`: liveness check

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pushhook::{create_router, AppState, Config, LoggingHooks};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before anything reads the environment, including RUST_LOG
    let dotenv = dotenvy::dotenv();

    // Initialize structured JSON logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    info!("web_server_starting");

    match dotenv {
        Ok(path) => info!(path = %path.display(), "dotenv_loaded"),
        Err(e) => warn!(error = %e, "dotenv_not_loaded"),
    }

    // Load configuration
    let config = Config::from_env();
    info!(
        port = config.port,
        webhook_secret_configured = config.webhook_secret.is_set(),
        max_body_bytes = config.max_body_bytes,
        "config_loaded"
    );

    if !config.webhook_secret.is_set() {
        warn!("webhook_secret_not_set_deliveries_will_be_rejected");
    }

    let port = config.port;
    let state = AppState::new(config, Arc::new(LoggingHooks));
    let app = create_router(state);

    // Bind to address
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(address = %addr, "web_server_listening");

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("web_server_shutdown_complete");

    Ok(())
}

/// Create a future that completes when a shutdown signal is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }

    info!("web_server_shutting_down");
}

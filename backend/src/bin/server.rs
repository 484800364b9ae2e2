//! Rockets HTTP Server Binary
//!
//! This is the main entry point for the scheduling REST API server.
//! It loads configuration, creates the in-memory store, sets up the HTTP
//! router, and starts serving requests.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin rockets-server
//!
//! # With an explicit config file and the console bundle
//! ROCKETS_CONFIG=deploy/rockets.toml STATIC_DIR=console/dist cargo run --bin rockets-server
//! ```
//!
//! # Environment Variables
//!
//! - `ROCKETS_CONFIG`: Path to a TOML config file (default: search for `rockets.toml`)
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `STATIC_DIR`: Directory holding the console's `index.html`
//! - `RUST_LOG`: Log filter (default: the configured `log_level`)

use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use rockets_backend::config::ServerConfig;
use rockets_backend::db::{FullRepository, LocalRepository};
use rockets_backend::http::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::load().context("Failed to load server configuration")?;

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.server.log_level))
        .context("Invalid log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting Rockets HTTP Server");

    let repository: Arc<dyn FullRepository> = Arc::new(LocalRepository::new());
    info!("In-memory store initialized");

    let state = AppState::new(repository);
    let app = create_router(state, &config);

    if let Some(dir) = &config.static_files.dir {
        info!("Serving console from {}", dir.display());
    }

    let addr = config.socket_addr()?;
    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}

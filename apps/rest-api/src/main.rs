//! # Kirana API
//!
//! HTTP server for the shop: sale processing, invoice retrieval and
//! product search.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Kirana API Server                               │
//! │                                                                         │
//! │  POS client ───► HTTP (3000) ───► handlers ───► kirana-db ───► SQLite  │
//! │                                       │                                 │
//! │                                       ▼                                 │
//! │                                  kirana-core                            │
//! │                             (GST math, invoices)                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use kirana_core::CompanyInfo;
use kirana_db::{Database, DbConfig};

use crate::config::ApiConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("Starting Kirana API server...");

    // Load configuration
    let config = ApiConfig::load()?;
    info!(
        port = config.port,
        db_path = %config.database_path,
        "Configuration loaded"
    );

    // Connect to database; migrations run on connect
    let db = Database::new(DbConfig::new(&config.database_path)).await?;
    info!("Connected to SQLite");

    // Create shared state
    let state = Arc::new(AppState {
        db: db.clone(),
        company: config.company.clone(),
    });

    let app = routes::router(state);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Shared application state.
pub struct AppState {
    pub db: Database,
    pub company: CompanyInfo,
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}

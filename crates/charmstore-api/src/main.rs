//! Charm store server binary.
//!
//! # Usage
//!
//! ```bash
//! # With config file
//! charmstore --config config.yaml
//!
//! # With environment variables only
//! CHARMSTORE_STORAGE__FIXTURES_PATH=fixtures/catalogue.json charmstore
//! ```

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::signal;
use tokio::sync::broadcast;
use tower_http::timeout::TimeoutLayer;
use tracing::{error, info};

use charmstore_api::http::{create_router_with_body_limit, AppState, RouterOptions};
use charmstore_api::middleware::{RequestIdLayer, RequestLoggingLayer};
use charmstore_api::observability::{init_logging, LoggingConfig};
use charmstore_server::ServerConfig;
use charmstore_storage::MemoryEntityStore;

/// Charm store HTTP server
#[derive(Parser, Debug)]
#[command(name = "charmstore")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file (YAML)
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = match args.config {
        Some(path) => ServerConfig::load(&path)?,
        None => ServerConfig::from_env()?,
    };

    init_logging(LoggingConfig::from_settings(&config.logging));
    info!(version = env!("CARGO_PKG_VERSION"), "starting charm store");

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let router = build_app(&config)?;

    let (shutdown_tx, shutdown_rx) = broadcast::channel::<()>(1);
    tokio::select! {
        result = run_http_server(router, addr, shutdown_rx) => {
            if let Err(ref e) = result {
                error!("HTTP server error: {}", e);
            }
            result
        }
        _ = shutdown_signal() => {
            let _ = shutdown_tx.send(());
            Ok(())
        }
    }
}

/// Builds the router with storage and middleware per configuration.
fn build_app(config: &ServerConfig) -> anyhow::Result<axum::Router> {
    let store = match &config.storage.fixtures_path {
        Some(path) => {
            let store = MemoryEntityStore::from_fixtures(path)?;
            info!(path = %path, entities = store.len(), "loaded fixtures");
            store
        }
        None => {
            info!("starting with an empty in-memory store");
            MemoryEntityStore::new()
        }
    };

    let options = RouterOptions {
        series: config.series_set()?,
        concurrent_meta_groups: config.router.concurrent_meta_groups,
    };
    let state = AppState::with_store(Arc::new(store), options);

    Ok(
        create_router_with_body_limit(state, config.server.body_limit_bytes)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.server.request_timeout_secs,
            )))
            .layer(RequestLoggingLayer::new())
            .layer(RequestIdLayer::new()),
    )
}

/// Run the HTTP server with graceful shutdown.
async fn run_http_server(
    router: axum::Router,
    addr: SocketAddr,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "HTTP server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.recv().await;
            info!("HTTP server received shutdown signal");
        })
        .await?;

    info!("HTTP server shutdown complete");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM.
///
/// A signal that cannot be installed is logged and never fires.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

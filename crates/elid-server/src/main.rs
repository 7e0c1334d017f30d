//! ELID device worker server
//!
//! Opens the device database, starts a worker for every active device and
//! keeps them running until SIGINT or SIGTERM, then stops all workers before
//! exiting.

mod config;

use anyhow::{Context, Result};
use clap::Parser;
use config::ServerConfig;
use elid_storage::Database;
use elid_workers::{Reconciler, WorkerManager};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::parse();
    init_tracing(config.log_json);

    info!("Starting ELID device worker server v{}", env!("CARGO_PKG_VERSION"));

    let worker_config = config.worker_config();
    worker_config.validate()?;

    let db = Database::new(config.database_config())
        .await
        .with_context(|| format!("Failed to open database at {}", config.database_path))?;
    let store = Arc::new(db.clone());

    let manager = WorkerManager::new(Arc::clone(&store), worker_config);
    let reconciler = Reconciler::new(store, manager.clone());

    // A failed restore leaves the server up with no workers.
    if let Err(e) = reconciler.restore().await {
        error!(error = %e, "Failed to restore workers for active devices");
    }

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    let mut status = tokio::time::interval(config.status_interval());
    status.tick().await;

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = status.tick() => {
                info!(active = manager.active_count().await, "Worker status");
            }
        }
    }

    reconciler.shutdown().await;
    db.close().await;

    info!("Server shutdown complete");
    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(tracing_subscriber::fmt::layer))
        .init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, stopping workers");
}

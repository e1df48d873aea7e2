//! HTTP server for the games catalog.
//!
//! Wires configuration, storage selection, optional sample data and the axum
//! router together. The `gamelayer-server` binary is a thin wrapper over [`serve`].

use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;

use gamelayer::{error::GameError, service::GameService};

pub mod config;
pub mod http;
pub mod seed;

pub use config::ServerConfig;
pub use http::router;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error(transparent)]
    Service(#[from] GameError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<gamelayer::error::DocumentStoreError> for ServerError {
    fn from(err: gamelayer::error::DocumentStoreError) -> Self {
        ServerError::Service(err.into())
    }
}

/// Serves the catalog until Ctrl-C, then releases the storage backend.
pub async fn serve(config: ServerConfig) -> Result<(), ServerError> {
    let service = Arc::new(GameService::new(config.open_store().await?).await?);

    if config.seed {
        seed::seed_catalog(&service).await?;
    }

    let listener = TcpListener::bind(config.bind).await?;
    log::info!("Server is listening on {}", listener.local_addr()?);

    axum::serve(listener, router(service.clone()))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    match Arc::try_unwrap(service) {
        Ok(service) => service.shutdown().await?,
        Err(_) => log::warn!("connections still hold the catalog; skipping backend shutdown"),
    }

    log::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::error!("failed to listen for Ctrl-C: {err}");
        std::future::pending::<()>().await;
    }
}

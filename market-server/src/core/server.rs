//! Server Implementation
//!
//! HTTP server startup and shutdown.

use crate::api;
use crate::core::{Config, ServerState};

pub struct Server {
    config: Config,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub async fn run(&self) -> anyhow::Result<()> {
        let (state, worker) = ServerState::initialize(&self.config)?;

        // Confirmation worker runs for the lifetime of the server
        let worker_handle = tokio::spawn(worker.run());

        let app = api::router(state.clone());

        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        tracing::info!(%addr, environment = %self.config.environment, "Market server starting");

        let listener = tokio::net::TcpListener::bind(addr).await?;
        let shutdown = state.shutdown.clone();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = tokio::signal::ctrl_c().await;
                tracing::info!("Shutting down...");
                shutdown.cancel();
            })
            .await?;

        // Let the worker finish its current confirmation
        let _ = worker_handle.await;

        Ok(())
    }
}

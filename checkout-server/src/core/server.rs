//! Server Implementation
//!
//! HTTP server startup and graceful shutdown

use std::time::Duration;

use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::core::{Config, Result, ServerState};

/// HTTP Server
pub struct Server {
    config: Config,
    state: Option<ServerState>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Create server with existing state (tests, embedded setups)
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self {
            config,
            state: Some(state),
        }
    }

    pub async fn run(&self) -> Result<()> {
        let state = match &self.state {
            Some(s) => s.clone(),
            None => ServerState::new(self.config.clone())?,
        };

        let app = crate::api::create_router(state.clone())
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(Duration::from_millis(
                self.config.request_timeout_ms,
            )));

        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        tracing::info!(%addr, environment = %self.config.environment, "checkout server starting");

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal(self.config.shutdown_timeout_ms))
            .await?;

        tracing::info!("checkout server stopped");
        Ok(())
    }
}

async fn shutdown_signal(shutdown_timeout_ms: u64) {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!(
        timeout_ms = shutdown_timeout_ms,
        "shutdown signal received, draining connections"
    );
}

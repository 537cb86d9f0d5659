//! Server execution logic.

use std::sync::Arc;

use axum::{Router, routing::get};
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::{
    handler::{
        http::{get_stats, health_check},
        websocket::websocket_handler,
    },
    signal::shutdown_signal,
    state::AppState,
};

/// Errors that stop the server
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// WebSocket relay server
///
/// # Example
///
/// ```ignore
/// let server = Server::new(app_state, config.cors_layer()?);
/// server.run(&config.bind_addr()).await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
    cors: CorsLayer,
}

impl Server {
    pub fn new(state: AppState, cors: CorsLayer) -> Self {
        Self {
            state: Arc::new(state),
            cors,
        }
    }

    pub fn router(&self) -> Router {
        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/stats", get(get_stats))
            .layer(self.cors.clone())
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Bind to `bind_addr` and serve until a shutdown signal arrives.
    ///
    /// # Errors
    ///
    /// Returns `ServerError::Bind` if the address is unavailable.
    pub async fn run(self, bind_addr: &str) -> Result<(), ServerError> {
        let listener = TcpListener::bind(bind_addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: bind_addr.to_string(),
                source,
            })?;

        self.serve(listener).await
    }

    /// Serve on an already bound listener.
    pub async fn serve(self, listener: TcpListener) -> Result<(), ServerError> {
        let local_addr = listener.local_addr()?;
        tracing::info!("Relay server listening on {}", local_addr);
        tracing::info!("Connect to: ws://{}/ws", local_addr);
        tracing::info!(
            "Heartbeat: ping every {:?}, drop after {:?} of silence",
            self.state.heartbeat.interval,
            self.state.heartbeat.deadline()
        );

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}

//! Room-scoped WebSocket relay server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hiroba-server
//! cargo run --bin hiroba-server -- --host 0.0.0.0 --port 3000 --heartbeat-interval-ms 10000
//! ```

use std::sync::Arc;

use clap::Parser;
use hiroba_server::{
    config::RelayConfig,
    infrastructure::{message_pusher::WebSocketMessagePusher, repository::InMemoryRoomRepository},
    ui::{AppState, HeartbeatPolicy, Server},
    usecase::ConnectionRegistry,
};
use hiroba_shared::{logger::setup_logger, time::SystemClock};

#[tokio::main]
async fn main() {
    let config = RelayConfig::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &config.log_level);

    let cors = match config.validate().and_then(|_| config.cors_layer()) {
        Ok(cors) => cors,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize dependencies in order:
    // 1. Repository
    // 2. MessagePusher
    // 3. Connection Registry
    // 4. AppState (UseCases)
    // 5. Server
    let repository = Arc::new(InMemoryRoomRepository::new());
    let message_pusher = Arc::new(WebSocketMessagePusher::new());
    let registry = Arc::new(ConnectionRegistry::new(repository, message_pusher));
    let state = AppState::new(
        registry,
        Arc::new(SystemClock),
        HeartbeatPolicy::new(config.heartbeat_interval(), config.heartbeat_timeout()),
        config.origins(),
    );

    let server = Server::new(state, cors);
    if let Err(e) = server.run(&config.bind_addr()).await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

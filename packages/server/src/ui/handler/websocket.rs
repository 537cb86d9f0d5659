//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, SplitStream, StreamExt},
};
use tokio::{
    sync::{mpsc, watch},
    time::{Instant, MissedTickBehavior},
};

use crate::{
    domain::{Connection, ConnectionId, RelayEvent},
    infrastructure::dto::{DecodeError, decode_inbound},
    ui::state::AppState,
};

use super::{
    heartbeat::HeartbeatPolicy,
    relay::{handle_event, reject_frame},
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, StatusCode> {
    let origin = headers
        .get(header::ORIGIN)
        .and_then(|value| value.to_str().ok());
    if !state.is_origin_allowed(origin) {
        tracing::warn!("Rejecting WebSocket upgrade from origin {:?}", origin);
        return Err(StatusCode::FORBIDDEN);
    }

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state)))
}

/// Spawns a task that drains the connection's channel into the socket and
/// drives the heartbeat.
///
/// The task ends when the channel closes, the socket write fails, or the
/// client has been silent past the heartbeat deadline.
fn pusher_loop(
    connection_id: ConnectionId,
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
    heartbeat: HeartbeatPolicy,
    last_seen: watch::Receiver<Instant>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(heartbeat.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        ticker.tick().await;

        loop {
            tokio::select! {
                msg = rx.recv() => {
                    let Some(msg) = msg else { break };
                    if sender.send(Message::Text(msg.into())).await.is_err() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    if heartbeat.is_expired(*last_seen.borrow(), Instant::now()) {
                        tracing::warn!(
                            "Connection '{}' missed heartbeat deadline of {:?}, closing",
                            connection_id,
                            heartbeat.deadline()
                        );
                        let _ = sender.send(Message::Close(None)).await;
                        break;
                    }
                    if sender.send(Message::Ping(Bytes::new())).await.is_err() {
                        break;
                    }
                }
            }
        }
    })
}

/// Reads frames until the client closes or the socket fails.
async fn receive_loop(
    state: &AppState,
    connection: &mut Connection,
    receiver: &mut SplitStream<WebSocket>,
    last_seen: &watch::Sender<Instant>,
) {
    while let Some(frame) = receiver.next().await {
        last_seen.send_replace(Instant::now());

        let decoded = match frame {
            Ok(Message::Text(text)) => decode_inbound(text.as_str()),
            Ok(Message::Binary(_)) => Err(DecodeError::BinaryFrame),
            Ok(Message::Ping(_) | Message::Pong(_)) => continue,
            Ok(Message::Close(_)) => {
                tracing::info!("Connection '{}' requested close", connection.id);
                break;
            }
            Err(e) => {
                handle_event(
                    state,
                    connection,
                    RelayEvent::TransportError {
                        reason: e.to_string(),
                    },
                )
                .await;
                break;
            }
        };

        match decoded {
            Ok(event) => handle_event(state, connection, event).await,
            Err(e) => reject_frame(state, connection, e.into()).await,
        }
    }
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let mut connection = match state
        .connect_connection_usecase
        .execute(ConnectionId::generate(), tx)
        .await
    {
        Ok(connection) => connection,
        Err(e) => {
            tracing::error!("Failed to register connection: {}", e);
            return;
        }
    };
    tracing::info!(
        "Connection '{}' accepted ({} live)",
        connection.id,
        state.registry.count().await
    );

    let (sender, mut receiver) = socket.split();
    let (last_seen_tx, last_seen_rx) = watch::channel(Instant::now());

    let mut send_task = pusher_loop(connection.id, rx, sender, state.heartbeat, last_seen_rx);

    // If either side finishes, the connection is over
    tokio::select! {
        _ = receive_loop(&state, &mut connection, &mut receiver, &last_seen_tx) => send_task.abort(),
        _ = &mut send_task => {},
    }

    handle_event(&state, &mut connection, RelayEvent::Disconnect).await;
    tracing::info!(
        "Connection '{}' closed ({} live)",
        connection.id,
        state.registry.count().await
    );
}

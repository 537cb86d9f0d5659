//! Relay protocol handler.
//!
//! Interprets inbound events for one connection and drives the use cases.
//! Every event runs inside its own failure boundary: errors and panics are
//! logged, reported to the sender as an `error` frame, and never escape to
//! the socket loop or to other connections.

use std::{any::Any, panic::AssertUnwindSafe};

use futures_util::FutureExt;

use crate::{
    domain::{Connection, OutboundEvent, RelayEvent},
    ui::state::AppState,
    usecase::RelayError,
};

/// Apply one event to `connection`.
pub async fn dispatch(
    state: &AppState,
    connection: &mut Connection,
    event: RelayEvent,
) -> Result<(), RelayError> {
    match event {
        RelayEvent::IdentityClaim { user_id } => {
            tracing::info!("Connection '{}' claims identity '{}'", connection.id, user_id);
            state
                .claim_identity_usecase
                .execute(connection, user_id)
                .await?;
        }
        RelayEvent::Notification { room, payload } => {
            let delivered = state
                .send_notification_usecase
                .execute(connection, room.clone(), payload)
                .await?;
            tracing::debug!(
                "Notification from '{}' to room '{}' reached {} connection(s)",
                connection.id,
                room,
                delivered
            );
        }
        RelayEvent::MessageSend {
            room,
            user_id,
            payload,
        } => {
            let delivered = state
                .send_message_usecase
                .execute(connection, room.clone(), user_id, payload)
                .await?;
            tracing::debug!(
                "Message from '{}' to room '{}' reached {} connection(s)",
                connection.id,
                room,
                delivered
            );
        }
        RelayEvent::Disconnect => {
            state
                .disconnect_connection_usecase
                .execute(connection)
                .await;
        }
        RelayEvent::TransportError { reason } => {
            tracing::warn!("Transport error on connection '{}': {}", connection.id, reason);
        }
    }

    Ok(())
}

/// Handle one event inside an isolated failure boundary.
pub async fn handle_event(state: &AppState, connection: &mut Connection, event: RelayEvent) {
    let event_name = event.name();
    let result = AssertUnwindSafe(dispatch(state, connection, event))
        .catch_unwind()
        .await;

    match result {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            tracing::warn!(
                "Failed to handle '{}' from connection '{}': {}",
                event_name,
                connection.id,
                e
            );
            report_error(state, connection, &e.to_string()).await;
        }
        Err(panic) => {
            let reason = panic_message(panic.as_ref());
            tracing::error!(
                "Handler for '{}' panicked on connection '{}': {}",
                event_name,
                connection.id,
                reason
            );
            report_error(state, connection, "internal error").await;
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    panic
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| panic.downcast_ref::<&str>().map(|s| s.to_string()))
        .unwrap_or_else(|| "unknown panic".to_string())
}

/// Reject a frame that could not be turned into an event.
pub async fn reject_frame(state: &AppState, connection: &Connection, error: RelayError) {
    tracing::warn!("Rejected frame from connection '{}': {}", connection.id, error);
    report_error(state, connection, &error.to_string()).await;
}

/// Tell the offending connection what went wrong. Best-effort.
async fn report_error(state: &AppState, connection: &Connection, message: &str) {
    if connection.is_terminated() {
        return;
    }
    let event = OutboundEvent::Error {
        message: message.to_string(),
    };
    if let Err(e) = state.registry.push_to(connection.id, &event).await {
        tracing::debug!("Could not report error to '{}': {}", connection.id, e);
    }
}

//! Relay events.

use serde_json::Value;

use super::{RoomName, UserId};

/// Inbound event for one connection, decoded at the transport boundary.
///
/// `Disconnect` and `TransportError` are produced by the socket loop itself
/// rather than decoded from a frame.
#[derive(Debug, Clone, PartialEq)]
pub enum RelayEvent {
    IdentityClaim {
        user_id: UserId,
    },
    Notification {
        room: RoomName,
        payload: Value,
    },
    MessageSend {
        room: RoomName,
        user_id: UserId,
        payload: Value,
    },
    Disconnect,
    TransportError {
        reason: String,
    },
}

impl RelayEvent {
    /// Event name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::IdentityClaim { .. } => "identity-claim",
            Self::Notification { .. } => "notification",
            Self::MessageSend { .. } => "message-send",
            Self::Disconnect => "disconnect",
            Self::TransportError { .. } => "transport-error",
        }
    }
}

/// Event delivered to connections. Payloads are relayed verbatim.
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundEvent {
    Notification { payload: Value },
    MessageReceive { user_id: UserId, payload: Value },
    Error { message: String },
}

impl OutboundEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Notification { .. } => "notification",
            Self::MessageReceive { .. } => "message-receive",
            Self::Error { .. } => "error",
        }
    }
}

//! Domain errors.

use thiserror::Error;

use super::ConnectionId;

/// Value object construction errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("Invalid connection id: '{0}'")]
    InvalidConnectionId(String),
}

/// An event arrived for a connection that can no longer accept it
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectionStateError {
    #[error("Connection '{0}' is already terminated")]
    Terminated(ConnectionId),
}

/// Delivery errors raised by a `MessagePusher`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("Client '{0}' not found")]
    ClientNotFound(String),

    #[error("Failed to push message: {0}")]
    PushFailed(String),

    #[error("Failed to encode outbound event: {0}")]
    EncodeFailed(String),
}

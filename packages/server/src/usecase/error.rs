//! UseCase errors.

use thiserror::Error;

use crate::{
    domain::{ConnectionId, ConnectionStateError, MessagePushError},
    infrastructure::dto::DecodeError,
};

/// Errors from accepting a new connection
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    #[error("Connection '{0}' is already registered")]
    DuplicateConnection(ConnectionId),
}

/// Errors from handling one inbound event. Never fatal to the connection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayError {
    #[error(transparent)]
    State(#[from] ConnectionStateError),

    #[error(transparent)]
    Push(#[from] MessagePushError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

//! Connection entity.
//!
//! A `Connection` is owned by the handler task bound to its socket and encodes
//! the relay lifecycle:
//!
//! ```text
//! Anonymous --identity-claim--> Identified --disconnect--> Terminated
//!     \_______________________disconnect________________________/
//! ```
//!
//! Room membership is not stored here; the room repository is the single
//! source of truth for it.

use super::{ConnectionId, ConnectionStateError, Timestamp, UserId};

/// Lifecycle state of a connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    /// Connected, no identity claimed yet
    Anonymous,
    /// Connected with the most recently claimed identity
    Identified(UserId),
    /// Disconnected; accepts no further events
    Terminated,
}

/// Result of an identity claim, as seen by the entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityClaim {
    /// First claim on this connection
    New,
    /// Same identity claimed again
    Unchanged,
    /// A different identity replaced an earlier one. The earlier room is kept.
    Replaced { previous: UserId },
}

/// One live transport-level channel to a single client
#[derive(Debug, Clone)]
pub struct Connection {
    pub id: ConnectionId,
    pub connected_at: Timestamp,
    state: ConnectionState,
}

impl Connection {
    pub fn new(id: ConnectionId, connected_at: Timestamp) -> Self {
        Self {
            id,
            connected_at,
            state: ConnectionState::Anonymous,
        }
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    pub fn identity(&self) -> Option<&UserId> {
        match &self.state {
            ConnectionState::Identified(user_id) => Some(user_id),
            _ => None,
        }
    }

    pub fn is_terminated(&self) -> bool {
        self.state == ConnectionState::Terminated
    }

    /// Fails once the connection has been terminated.
    pub fn ensure_active(&self) -> Result<(), ConnectionStateError> {
        if self.is_terminated() {
            return Err(ConnectionStateError::Terminated(self.id));
        }
        Ok(())
    }

    /// Record `user_id` as this connection's identity.
    pub fn claim_identity(&mut self, user_id: UserId) -> Result<IdentityClaim, ConnectionStateError> {
        self.ensure_active()?;

        let claim = match &self.state {
            ConnectionState::Identified(current) if *current == user_id => IdentityClaim::Unchanged,
            ConnectionState::Identified(current) => IdentityClaim::Replaced {
                previous: current.clone(),
            },
            _ => IdentityClaim::New,
        };
        self.state = ConnectionState::Identified(user_id);

        Ok(claim)
    }

    /// Move to `Terminated`.
    ///
    /// Returns the identity held at termination, or `Err` if the connection was
    /// already terminated so callers can run teardown exactly once.
    pub fn terminate(&mut self) -> Result<Option<UserId>, ConnectionStateError> {
        match std::mem::replace(&mut self.state, ConnectionState::Terminated) {
            ConnectionState::Terminated => Err(ConnectionStateError::Terminated(self.id)),
            ConnectionState::Identified(user_id) => Ok(Some(user_id)),
            ConnectionState::Anonymous => Ok(None),
        }
    }
}

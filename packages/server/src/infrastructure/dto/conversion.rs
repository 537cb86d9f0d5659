//! Conversion logic between wire frames and domain events.

use serde_json::Value;
use thiserror::Error;

use crate::domain::{OutboundEvent, RelayEvent, RoomName, UserId};
use crate::infrastructure::dto::websocket::{INBOUND_EVENT_TYPES, InboundFrame, OutboundFrame};

/// Reasons an inbound frame is rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("Frame is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("Frame must be a JSON object with a string 'type' field")]
    MissingType,

    #[error("Unknown event type '{0}'")]
    UnknownEvent(String),

    #[error("Invalid '{event}' event: {reason}")]
    InvalidFields { event: String, reason: String },

    #[error("Binary frames are not supported")]
    BinaryFrame,
}

// ========================================
// DTO → Domain
// ========================================

impl From<InboundFrame> for RelayEvent {
    fn from(frame: InboundFrame) -> Self {
        match frame {
            InboundFrame::IdentityClaim { user_id } => Self::IdentityClaim {
                user_id: UserId::new(user_id),
            },
            InboundFrame::Notification { room, payload } => Self::Notification {
                room: RoomName::new(room),
                payload,
            },
            InboundFrame::MessageSend {
                room,
                user_id,
                payload,
            } => Self::MessageSend {
                room: RoomName::new(room),
                user_id: UserId::new(user_id),
                payload,
            },
        }
    }
}

/// Decode one text frame into a relay event.
///
/// The `type` tag is checked before the fields so unknown event kinds are
/// reported as such rather than as a generic shape error.
pub fn decode_inbound(text: &str) -> Result<RelayEvent, DecodeError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| DecodeError::InvalidJson(e.to_string()))?;

    let event = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or(DecodeError::MissingType)?
        .to_string();
    if !INBOUND_EVENT_TYPES.contains(&event.as_str()) {
        return Err(DecodeError::UnknownEvent(event));
    }

    serde_json::from_value::<InboundFrame>(value)
        .map(RelayEvent::from)
        .map_err(|e| DecodeError::InvalidFields {
            event,
            reason: e.to_string(),
        })
}

// ========================================
// Domain → DTO
// ========================================

impl<'a> From<&'a OutboundEvent> for OutboundFrame<'a> {
    fn from(event: &'a OutboundEvent) -> Self {
        match event {
            OutboundEvent::Notification { payload } => Self::Notification { payload },
            OutboundEvent::MessageReceive { user_id, payload } => Self::MessageReceive {
                user_id: user_id.as_str(),
                payload,
            },
            OutboundEvent::Error { message } => Self::Error { message },
        }
    }
}

/// Encode an outbound event as a text frame.
pub fn encode_outbound(event: &OutboundEvent) -> Result<String, serde_json::Error> {
    serde_json::to_string(&OutboundFrame::from(event))
}

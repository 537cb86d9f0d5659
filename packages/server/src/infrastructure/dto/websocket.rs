//! WebSocket frame DTOs.
//!
//! Every frame is a JSON object tagged by `type`:
//!
//! ```text
//! -> {"type":"identity-claim","userId":"u1"}
//! -> {"type":"notification","room":"u1","payload":{"text":"hi"}}
//! -> {"type":"message-send","room":"lobby","userId":"A","payload":"hello"}
//! <- {"type":"notification","payload":{"text":"hi"}}
//! <- {"type":"message-receive","userId":"A","payload":"hello"}
//! <- {"type":"error","message":"..."}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Inbound event kinds accepted on the socket
pub const INBOUND_EVENT_TYPES: [&str; 3] = ["identity-claim", "notification", "message-send"];

/// Frame sent by a client
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum InboundFrame {
    IdentityClaim {
        user_id: String,
    },
    Notification {
        room: String,
        #[serde(default)]
        payload: Value,
    },
    MessageSend {
        room: String,
        user_id: String,
        #[serde(default)]
        payload: Value,
    },
}

/// Frame sent to a client
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(
    tag = "type",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum OutboundFrame<'a> {
    Notification {
        payload: &'a Value,
    },
    MessageReceive {
        user_id: &'a str,
        payload: &'a Value,
    },
    Error {
        message: &'a str,
    },
}

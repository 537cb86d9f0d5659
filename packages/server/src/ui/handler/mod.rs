//! Request handlers.

pub mod heartbeat;
pub mod http;
pub mod relay;
pub mod websocket;

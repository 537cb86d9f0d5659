//! WebSocket relay server: router, handlers and application state.

mod handler;
mod server;
mod signal;
pub mod state;

pub use handler::heartbeat::HeartbeatPolicy;
pub use server::{Server, ServerError};
pub use state::AppState;

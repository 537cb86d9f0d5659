//! UseCase layer: one use case per relay operation.

mod claim_identity;
mod connect_connection;
mod disconnect_connection;
mod error;
mod get_stats;
mod registry;
mod send_message;
mod send_notification;

pub use claim_identity::ClaimIdentityUseCase;
pub use connect_connection::ConnectConnectionUseCase;
pub use disconnect_connection::DisconnectConnectionUseCase;
pub use error::{ConnectError, RelayError};
pub use get_stats::{GetStatsUseCase, RelayStats};
pub use registry::ConnectionRegistry;
pub use send_message::SendMessageUseCase;
pub use send_notification::SendNotificationUseCase;

//! Domain layer: value objects, the connection entity, relay events and ports.

pub mod entity;
pub mod error;
pub mod event;
pub mod message_pusher;
pub mod repository;
pub mod service;
pub mod value_object;

pub use entity::{Connection, ConnectionState, IdentityClaim};
pub use error::{ConnectionStateError, MessagePushError, ValueObjectError};
pub use event::{OutboundEvent, RelayEvent};
pub use message_pusher::{MessagePusher, PusherChannel};
pub use repository::RoomRepository;
pub use value_object::{ConnectionId, RoomName, Timestamp, UserId};

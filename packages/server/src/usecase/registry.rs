//! Connection Registry
//!
//! `RoomRepository`（メンバーシップ）と `MessagePusher`（配送）を組み合わせ、
//! join / leave / leave_all / broadcast_to_room / count を提供します。
//! プロセスにつき 1 インスタンスを起動時に生成し、各 UseCase に注入します。

use std::sync::Arc;

use crate::domain::{
    ConnectionId, MessagePushError, MessagePusher, OutboundEvent, PusherChannel, RoomName,
    RoomRepository, service::broadcast_targets,
};

/// Room-scoped membership and delivery for all live connections
pub struct ConnectionRegistry {
    /// Repository（メンバーシップの抽象化）
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl ConnectionRegistry {
    pub fn new(repository: Arc<dyn RoomRepository>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// Start tracking a live connection. `false` if the id is already tracked.
    pub async fn register(&self, connection_id: ConnectionId, sender: PusherChannel) -> bool {
        self.message_pusher.register_client(connection_id, sender).await
    }

    /// Stop tracking a connection. `false` if it was not tracked.
    pub async fn unregister(&self, connection_id: ConnectionId) -> bool {
        self.message_pusher.unregister_client(connection_id).await
    }

    pub async fn join(&self, connection_id: ConnectionId, room: RoomName) -> bool {
        let joined = self.repository.join(connection_id, room.clone()).await;
        if joined {
            tracing::debug!("Connection '{}' joined room '{}'", connection_id, room);
        }
        joined
    }

    pub async fn leave(&self, connection_id: ConnectionId, room: &RoomName) -> bool {
        let left = self.repository.leave(connection_id, room).await;
        if left {
            tracing::debug!("Connection '{}' left room '{}'", connection_id, room);
        }
        left
    }

    pub async fn leave_all(&self, connection_id: ConnectionId) -> Vec<RoomName> {
        self.repository.leave_all(connection_id).await
    }

    /// Deliver `event` to every current member of `room` except `exclude`.
    ///
    /// Returns the number of members the event was handed to.
    pub async fn broadcast_to_room(
        &self,
        room: &RoomName,
        exclude: Option<ConnectionId>,
        event: &OutboundEvent,
    ) -> Result<usize, MessagePushError> {
        let targets = broadcast_targets(self.repository.members(room).await, exclude);
        if targets.is_empty() {
            tracing::debug!("No recipients for '{}' in room '{}'", event.name(), room);
            return Ok(0);
        }

        let delivered = self.message_pusher.broadcast(targets, event).await?;
        tracing::debug!(
            "Broadcasted '{}' to {} member(s) of room '{}'",
            event.name(),
            delivered,
            room
        );
        Ok(delivered)
    }

    pub async fn push_to(
        &self,
        connection_id: ConnectionId,
        event: &OutboundEvent,
    ) -> Result<(), MessagePushError> {
        self.message_pusher.push_to(connection_id, event).await
    }

    /// Number of live connections, process-wide
    pub async fn count(&self) -> usize {
        self.message_pusher.count_clients().await
    }

    pub async fn room_count(&self) -> usize {
        self.repository.count_rooms().await
    }

    pub async fn rooms_of(&self, connection_id: ConnectionId) -> Vec<RoomName> {
        self.repository.rooms_of(connection_id).await
    }

    pub async fn members(&self, room: &RoomName) -> Vec<ConnectionId> {
        self.repository.members(room).await
    }
}

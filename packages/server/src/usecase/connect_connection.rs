//! UseCase: 接続受付処理
//!
//! 新しい接続を登録し（接続数 +1）、接続 ID と同名のデフォルトルームに参加させます。

use std::sync::Arc;

use hiroba_shared::time::Clock;

use crate::domain::{Connection, ConnectionId, PusherChannel, RoomName, Timestamp};

use super::{ConnectError, ConnectionRegistry};

/// 接続受付のユースケース
pub struct ConnectConnectionUseCase {
    registry: Arc<ConnectionRegistry>,
    clock: Arc<dyn Clock>,
}

impl ConnectConnectionUseCase {
    /// 新しい ConnectConnectionUseCase を作成
    pub fn new(registry: Arc<ConnectionRegistry>, clock: Arc<dyn Clock>) -> Self {
        Self { registry, clock }
    }

    /// 接続受付を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Connection)` - 匿名状態の接続エンティティ。ハンドラが所有する
    /// * `Err(ConnectError)` - 同じ ID が既に登録されている
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        sender: PusherChannel,
    ) -> Result<Connection, ConnectError> {
        if !self.registry.register(connection_id, sender).await {
            return Err(ConnectError::DuplicateConnection(connection_id));
        }
        self.registry
            .join(connection_id, RoomName::from(connection_id))
            .await;

        Ok(Connection::new(
            connection_id,
            Timestamp::new(self.clock.now_millis()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::ConnectionState,
        infrastructure::{
            message_pusher::WebSocketMessagePusher, repository::InMemoryRoomRepository,
        },
    };
    use hiroba_shared::time::FixedClock;
    use tokio::sync::mpsc;

    fn create_test_usecase() -> (ConnectConnectionUseCase, Arc<ConnectionRegistry>) {
        let registry = Arc::new(ConnectionRegistry::new(
            Arc::new(InMemoryRoomRepository::new()),
            Arc::new(WebSocketMessagePusher::new()),
        ));
        let usecase = ConnectConnectionUseCase::new(registry.clone(), Arc::new(FixedClock::new(1000)));
        (usecase, registry)
    }

    #[tokio::test]
    async fn test_connect_registers_anonymous_connection() {
        // テスト項目: 接続すると匿名状態の接続が登録され、接続数が 1 増える
        // given (前提条件):
        let (usecase, registry) = create_test_usecase();
        let (tx, _rx) = mpsc::unbounded_channel();
        let id = ConnectionId::generate();

        // when (操作):
        let connection = usecase.execute(id, tx).await.unwrap();

        // then (期待する結果):
        assert_eq!(connection.id, id);
        assert_eq!(connection.state(), &ConnectionState::Anonymous);
        assert_eq!(connection.connected_at, Timestamp::new(1000));
        assert_eq!(registry.count().await, 1);
    }

    #[tokio::test]
    async fn test_connect_joins_default_room_alone() {
        // テスト項目: 接続は自分だけが参加するデフォルトルームに入る
        // given (前提条件):
        let (usecase, registry) = create_test_usecase();
        let (tx, _rx) = mpsc::unbounded_channel();
        let id = ConnectionId::generate();

        // when (操作):
        usecase.execute(id, tx).await.unwrap();

        // then (期待する結果):
        let default_room = RoomName::from(id);
        assert_eq!(registry.rooms_of(id).await, vec![default_room.clone()]);
        assert_eq!(registry.members(&default_room).await, vec![id]);
    }

    #[tokio::test]
    async fn test_connect_duplicate_id_is_rejected() {
        // テスト項目: 同じ接続 ID での二重登録は拒否され、接続数はずれない
        // given (前提条件):
        let (usecase, registry) = create_test_usecase();
        let (tx1, _rx1) = mpsc::unbounded_channel();
        let (tx2, _rx2) = mpsc::unbounded_channel();
        let id = ConnectionId::generate();
        usecase.execute(id, tx1).await.unwrap();

        // when (操作):
        let result = usecase.execute(id, tx2).await;

        // then (期待する結果):
        assert!(matches!(result, Err(ConnectError::DuplicateConnection(dup)) if dup == id));
        assert_eq!(registry.count().await, 1);
    }
}

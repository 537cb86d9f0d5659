//! UseCase: 通知送信処理
//!
//! 指定ルームのメンバー（送信者を除く）に `notification` を配送します。
//! 送信者がそのルームのメンバーである必要はありません。

use std::sync::Arc;

use serde_json::Value;

use crate::domain::{Connection, OutboundEvent, RoomName};

use super::{ConnectionRegistry, RelayError};

/// 通知送信のユースケース
pub struct SendNotificationUseCase {
    registry: Arc<ConnectionRegistry>,
}

impl SendNotificationUseCase {
    /// 新しい SendNotificationUseCase を作成
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// 通知送信を実行
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - 配送したメンバー数
    /// * `Err(RelayError)` - 切断済みの接続、または配送失敗
    pub async fn execute(
        &self,
        connection: &Connection,
        room: RoomName,
        payload: Value,
    ) -> Result<usize, RelayError> {
        connection.ensure_active()?;

        let event = OutboundEvent::Notification { payload };
        let delivered = self
            .registry
            .broadcast_to_room(&room, Some(connection.id), &event)
            .await?;

        Ok(delivered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{ConnectionId, MessagePushError, Timestamp, message_pusher::MockMessagePusher},
        infrastructure::{
            message_pusher::WebSocketMessagePusher, repository::InMemoryRoomRepository,
        },
    };
    use serde_json::json;
    use tokio::sync::mpsc;

    fn create_test_connection() -> Connection {
        Connection::new(ConnectionId::generate(), Timestamp::new(1000))
    }

    #[tokio::test]
    async fn test_notification_reaches_room_member_but_not_sender() {
        // テスト項目: u1 のメンバーに通知が届き、ルーム外の送信者には届かない
        // given (前提条件):
        let registry = Arc::new(ConnectionRegistry::new(
            Arc::new(InMemoryRoomRepository::new()),
            Arc::new(WebSocketMessagePusher::new()),
        ));
        let usecase = SendNotificationUseCase::new(registry.clone());
        let sender = create_test_connection();
        let receiver_id = ConnectionId::generate();
        let (tx_s, mut rx_s) = mpsc::unbounded_channel();
        let (tx_r, mut rx_r) = mpsc::unbounded_channel();
        registry.register(sender.id, tx_s).await;
        registry.register(receiver_id, tx_r).await;
        registry.join(receiver_id, RoomName::new("u1")).await;

        // when (操作):
        let result = usecase
            .execute(&sender, RoomName::new("u1"), json!({"text": "hi"}))
            .await;

        // then (期待する結果):
        assert_eq!(result, Ok(1));
        let frame: Value = serde_json::from_str(&rx_r.recv().await.unwrap()).unwrap();
        assert_eq!(frame, json!({"type": "notification", "payload": {"text": "hi"}}));
        assert!(rx_s.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_notification_excludes_sender_who_is_member() {
        // テスト項目: 送信者がルームのメンバーでも自分の通知は配送対象に含まれない
        // given (前提条件):
        let sender = create_test_connection();
        let other = ConnectionId::generate();
        let repository = Arc::new(InMemoryRoomRepository::new());
        let mut pusher = MockMessagePusher::new();
        pusher
            .expect_broadcast()
            .withf(move |targets, event| {
                targets == &vec![other] && event.name() == "notification"
            })
            .times(1)
            .returning(|targets, _| Ok(targets.len()));
        let registry = Arc::new(ConnectionRegistry::new(repository, Arc::new(pusher)));
        registry.join(sender.id, RoomName::new("lobby")).await;
        registry.join(other, RoomName::new("lobby")).await;
        let usecase = SendNotificationUseCase::new(registry);

        // when (操作):
        let result = usecase
            .execute(&sender, RoomName::new("lobby"), json!("ping"))
            .await;

        // then (期待する結果):
        assert_eq!(result, Ok(1));
    }

    #[tokio::test]
    async fn test_notification_push_failure_is_reported() {
        // テスト項目: 配送エラーは RelayError として呼び出し側に返される
        // given (前提条件):
        let sender = create_test_connection();
        let other = ConnectionId::generate();
        let mut pusher = MockMessagePusher::new();
        pusher
            .expect_broadcast()
            .returning(|_, _| Err(MessagePushError::EncodeFailed("boom".to_string())));
        let registry = Arc::new(ConnectionRegistry::new(
            Arc::new(InMemoryRoomRepository::new()),
            Arc::new(pusher),
        ));
        registry.join(other, RoomName::new("lobby")).await;
        let usecase = SendNotificationUseCase::new(registry);

        // when (操作):
        let result = usecase
            .execute(&sender, RoomName::new("lobby"), Value::Null)
            .await;

        // then (期待する結果):
        assert!(matches!(result, Err(RelayError::Push(_))));
    }

    #[tokio::test]
    async fn test_notification_from_terminated_connection_is_rejected() {
        // テスト項目: 切断済みの接続からの通知は配送されない
        // given (前提条件):
        let mut pusher = MockMessagePusher::new();
        pusher.expect_broadcast().never();
        let registry = Arc::new(ConnectionRegistry::new(
            Arc::new(InMemoryRoomRepository::new()),
            Arc::new(pusher),
        ));
        registry.join(ConnectionId::generate(), RoomName::new("u1")).await;
        let usecase = SendNotificationUseCase::new(registry);
        let mut sender = create_test_connection();
        sender.terminate().unwrap();

        // when (操作):
        let result = usecase
            .execute(&sender, RoomName::new("u1"), json!({"text": "hi"}))
            .await;

        // then (期待する結果):
        assert!(matches!(result, Err(RelayError::State(_))));
    }
}

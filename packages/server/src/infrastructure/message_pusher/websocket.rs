//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続ごとの `UnboundedSender` を管理
//! - イベントを JSON テキストフレームにエンコードして送信（push_to, broadcast）
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`ui/handler/websocket.rs`）で行われます。
//! この実装は生成された `UnboundedSender` を受け取り、メッセージ送信に使用します。
//! 登録済みの sender の数がプロセス全体の接続数になります。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    domain::{ConnectionId, MessagePushError, MessagePusher, OutboundEvent, PusherChannel},
    infrastructure::dto::encode_outbound,
};

/// WebSocket を使った MessagePusher 実装
///
/// ## 使用例
///
/// ```ignore
/// let pusher = WebSocketMessagePusher::new();
/// pusher.register_client(connection_id, tx).await;
///
/// // クライアントに送信
/// pusher.push_to(connection_id, &event).await?;
/// ```
#[derive(Debug, Default)]
pub struct WebSocketMessagePusher {
    /// 接続中のクライアントの WebSocket sender
    clients: Mutex<HashMap<ConnectionId, PusherChannel>>,
}

impl WebSocketMessagePusher {
    /// 新しい WebSocketMessagePusher を作成
    pub fn new() -> Self {
        Self::default()
    }
}

fn encode(event: &OutboundEvent) -> Result<String, MessagePushError> {
    encode_outbound(event).map_err(|e| MessagePushError::EncodeFailed(e.to_string()))
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel) -> bool {
        let mut clients = self.clients.lock().await;
        if clients.contains_key(&connection_id) {
            tracing::warn!("Connection '{}' is already registered", connection_id);
            return false;
        }
        clients.insert(connection_id, sender);
        tracing::debug!("Connection '{}' registered to MessagePusher", connection_id);
        true
    }

    async fn unregister_client(&self, connection_id: ConnectionId) -> bool {
        let mut clients = self.clients.lock().await;
        let removed = clients.remove(&connection_id).is_some();
        if removed {
            tracing::debug!("Connection '{}' unregistered from MessagePusher", connection_id);
        }
        removed
    }

    async fn push_to(
        &self,
        connection_id: ConnectionId,
        event: &OutboundEvent,
    ) -> Result<(), MessagePushError> {
        let content = encode(event)?;
        let clients = self.clients.lock().await;

        let sender = clients
            .get(&connection_id)
            .ok_or_else(|| MessagePushError::ClientNotFound(connection_id.to_string()))?;
        sender
            .send(content)
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
        tracing::debug!("Pushed '{}' to connection '{}'", event.name(), connection_id);

        Ok(())
    }

    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        event: &OutboundEvent,
    ) -> Result<usize, MessagePushError> {
        let content = encode(event)?;
        let clients = self.clients.lock().await;

        let mut delivered = 0;
        for target in targets {
            let Some(sender) = clients.get(&target) else {
                tracing::warn!("Connection '{}' not found during broadcast, skipping", target);
                continue;
            };
            // ブロードキャストでは一部の送信失敗を許容
            match sender.send(content.clone()) {
                Ok(()) => delivered += 1,
                Err(e) => tracing::warn!("Failed to push message to connection '{}': {}", target, e),
            }
        }

        Ok(delivered)
    }

    async fn count_clients(&self) -> usize {
        self.clients.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::sync::mpsc;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - 登録・登録解除と接続数のカウント
    // - push_to: 特定の接続への送信
    // - broadcast: 複数接続への送信と部分失敗の許容
    //
    // 【なぜこのテストが必要か】
    // - 接続数は登録・解除ごとにちょうど 1 ずつ増減しなければならない
    // - ペイロードが加工されずに届くことを保証する
    // ========================================

    fn notification() -> OutboundEvent {
        OutboundEvent::Notification {
            payload: json!({"text": "hi"}),
        }
    }

    #[tokio::test]
    async fn test_register_and_unregister_track_count() {
        // テスト項目: 登録と解除で接続数が正確に増減し、重複登録・二重解除ではずれない
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let alice = ConnectionId::generate();
        let (tx1, _rx1) = mpsc::unbounded_channel();
        let (tx2, _rx2) = mpsc::unbounded_channel();

        // when (操作):
        let first = pusher.register_client(alice, tx1).await;
        let duplicate = pusher.register_client(alice, tx2).await;
        let count_after_register = pusher.count_clients().await;
        let removed = pusher.unregister_client(alice).await;
        let removed_again = pusher.unregister_client(alice).await;

        // then (期待する結果):
        assert!(first);
        assert!(!duplicate);
        assert_eq!(count_after_register, 1);
        assert!(removed);
        assert!(!removed_again);
        assert_eq!(pusher.count_clients().await, 0);
    }

    #[tokio::test]
    async fn test_push_to_success() {
        // テスト項目: 特定の接続にエンコード済みのフレームを送信できる
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let alice = ConnectionId::generate();
        pusher.register_client(alice, tx).await;

        // when (操作):
        let result = pusher.push_to(alice, &notification()).await;

        // then (期待する結果):
        assert!(result.is_ok());
        let received: serde_json::Value = serde_json::from_str(&rx.recv().await.unwrap()).unwrap();
        assert_eq!(received, json!({"type": "notification", "payload": {"text": "hi"}}));
    }

    #[tokio::test]
    async fn test_push_to_client_not_found() {
        // テスト項目: 存在しない接続への送信はエラーを返す
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();

        // when (操作):
        let result = pusher.push_to(ConnectionId::generate(), &notification()).await;

        // then (期待する結果):
        assert!(matches!(result, Err(MessagePushError::ClientNotFound(_))));
    }

    #[tokio::test]
    async fn test_broadcast_success() {
        // テスト項目: 複数の接続に同一のフレームをブロードキャストできる
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        let alice = ConnectionId::generate();
        let bob = ConnectionId::generate();
        pusher.register_client(alice, tx1).await;
        pusher.register_client(bob, tx2).await;

        // when (操作):
        let result = pusher.broadcast(vec![alice, bob], &notification()).await;

        // then (期待する結果):
        assert_eq!(result, Ok(2));
        assert_eq!(rx1.recv().await, rx2.recv().await);
    }

    #[tokio::test]
    async fn test_broadcast_partial_failure() {
        // テスト項目: 一部の接続が存在しない・閉じていてもブロードキャストは成功する
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, rx2) = mpsc::unbounded_channel();
        let alice = ConnectionId::generate();
        let closed = ConnectionId::generate();
        pusher.register_client(alice, tx1).await;
        pusher.register_client(closed, tx2).await;
        drop(rx2);

        // when (操作):
        let targets = vec![alice, closed, ConnectionId::generate()];
        let result = pusher.broadcast(targets, &notification()).await;

        // then (期待する結果):
        assert_eq!(result, Ok(1));
        assert!(rx1.recv().await.is_some());
    }

    #[tokio::test]
    async fn test_broadcast_empty_targets() {
        // テスト項目: 空のターゲットリストでもエラーにならない
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();

        // when (操作):
        let result = pusher.broadcast(vec![], &notification()).await;

        // then (期待する結果):
        assert_eq!(result, Ok(0));
    }
}

//! UseCase: メッセージ送信処理
//!
//! 指定ルームのメンバー（送信者を除く）に `message-receive` を配送します。
//! `user_id` はクライアントが指定した値をそのまま使い、宣言済み ID との照合は行いません。

use std::sync::Arc;

use serde_json::Value;

use crate::domain::{Connection, OutboundEvent, RoomName, UserId};

use super::{ConnectionRegistry, RelayError};

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    registry: Arc<ConnectionRegistry>,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// メッセージ送信を実行
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - 配送したメンバー数
    /// * `Err(RelayError)` - 切断済みの接続、または配送失敗
    pub async fn execute(
        &self,
        connection: &Connection,
        room: RoomName,
        user_id: UserId,
        payload: Value,
    ) -> Result<usize, RelayError> {
        connection.ensure_active()?;

        let event = OutboundEvent::MessageReceive { user_id, payload };
        let delivered = self
            .registry
            .broadcast_to_room(&room, Some(connection.id), &event)
            .await?;

        Ok(delivered)
    }
}

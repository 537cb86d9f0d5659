//! UseCase: 切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectConnectionUseCase::execute() メソッド
//! - 切断時のルーム退出と登録解除
//!
//! ### なぜこのテストが必要か
//! - 切断は接続ごとにちょうど一度だけ実行されなければならない
//! - 接続数（count）は切断ごとにちょうど 1 減らなければならない
//! - ID 未宣言の接続でも失敗してはならない
//!
//! ### どのような状況を想定しているか
//! - 正常系：ID 宣言済みの接続の切断
//! - エッジケース：ID 未宣言の接続の切断
//! - 異常系：二重切断（no-op）

use std::sync::Arc;

use crate::domain::{Connection, RoomName};

use super::ConnectionRegistry;

/// 切断のユースケース
pub struct DisconnectConnectionUseCase {
    registry: Arc<ConnectionRegistry>,
}

impl DisconnectConnectionUseCase {
    /// 新しい DisconnectConnectionUseCase を作成
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// 切断を実行
    ///
    /// ID のルームから退出し、次に全ルームから退出し、最後に登録を解除します。
    ///
    /// # Returns
    ///
    /// * `true` - 今回の呼び出しで切断処理を行った
    /// * `false` - 既に切断済みだったため何もしなかった
    pub async fn execute(&self, connection: &mut Connection) -> bool {
        let identity = match connection.terminate() {
            Ok(identity) => identity,
            Err(e) => {
                tracing::debug!("{}; skipping teardown", e);
                return false;
            }
        };

        let mut rooms_left = 0;
        if let Some(user_id) = &identity {
            if self
                .registry
                .leave(connection.id, &RoomName::from(user_id))
                .await
            {
                rooms_left += 1;
            }
        }
        rooms_left += self.registry.leave_all(connection.id).await.len();
        self.registry.unregister(connection.id).await;

        tracing::info!(
            "Connection '{}' ({}) disconnected; left {} room(s)",
            connection.id,
            identity
                .as_ref()
                .map(|user_id| user_id.as_str())
                .unwrap_or("anonymous"),
            rooms_left
        );

        true
    }
}

//! UseCase: ID 宣言処理
//!
//! ID を記録し、同名のルームに参加させます。別の ID を再宣言しても
//! 以前のルームからは退出しません（明示的な退出が必要）。

use std::sync::Arc;

use crate::domain::{Connection, IdentityClaim, RoomName, UserId};

use super::{ConnectionRegistry, RelayError};

/// ID 宣言のユースケース
pub struct ClaimIdentityUseCase {
    registry: Arc<ConnectionRegistry>,
}

impl ClaimIdentityUseCase {
    /// 新しい ClaimIdentityUseCase を作成
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// ID 宣言を実行
    ///
    /// # Returns
    ///
    /// * `Ok(IdentityClaim)` - 宣言の種別（初回 / 同一 / 置き換え）
    /// * `Err(RelayError::State)` - 切断済みの接続
    pub async fn execute(
        &self,
        connection: &mut Connection,
        user_id: UserId,
    ) -> Result<IdentityClaim, RelayError> {
        let room = RoomName::from(&user_id);
        let claim = connection.claim_identity(user_id)?;
        self.registry.join(connection.id, room.clone()).await;

        if let IdentityClaim::Replaced { previous } = &claim {
            tracing::info!(
                "Connection '{}' re-claimed identity '{}' (was '{}'); still a member of '{}'",
                connection.id,
                room,
                previous,
                previous
            );
        }

        Ok(claim)
    }
}

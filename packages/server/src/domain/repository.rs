//! Repository trait 定義
//!
//! ルームのメンバーシップを管理するデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
//!
//! メンバーシップ操作にはエラー条件がありません。ルーム名は任意の文字列で、
//! 参加・退出はどちらも冪等です。

use async_trait::async_trait;

use super::{ConnectionId, RoomName};

/// Room Repository trait
///
/// ルーム名 → 参加中の接続集合 の対応を保持するストアへのインターフェース。
/// メンバーが 0 になったルームは存在しなくなる。
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// 接続をルームに参加させる。新たに参加した場合は `true`、既に参加済みなら `false`
    async fn join(&self, connection_id: ConnectionId, room: RoomName) -> bool;

    /// 接続をルームから退出させる。参加していなかった場合は `false`
    async fn leave(&self, connection_id: ConnectionId, room: &RoomName) -> bool;

    /// 接続を参加中の全ルームから退出させ、退出したルームを返す
    async fn leave_all(&self, connection_id: ConnectionId) -> Vec<RoomName>;

    /// ルームに参加中の接続 ID を取得
    async fn members(&self, room: &RoomName) -> Vec<ConnectionId>;

    /// 接続が参加中のルームを取得
    async fn rooms_of(&self, connection_id: ConnectionId) -> Vec<RoomName>;

    /// メンバーが 1 人以上いるルームの数を取得
    async fn count_rooms(&self) -> usize;
}

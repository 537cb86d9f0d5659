//! MessagePusher trait 定義
//!
//! 接続中のクライアントへのメッセージ送信（通知）のインターフェース。
//! 送信はすべて fire-and-forget で、受信確認は行いません。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ConnectionId, MessagePushError, OutboundEvent};

/// 1 接続ぶんの送信チャネル。エンコード済みのテキストフレームを流す
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// MessagePusher trait
///
/// 登録済みクライアントの数がプロセス全体の接続数になる。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// クライアントを登録。同じ ID が既に登録されている場合は `false`
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel) -> bool;

    /// クライアントを登録解除。登録されていなかった場合は `false`
    async fn unregister_client(&self, connection_id: ConnectionId) -> bool;

    /// 特定のクライアントにイベントを送信
    async fn push_to(
        &self,
        connection_id: ConnectionId,
        event: &OutboundEvent,
    ) -> Result<(), MessagePushError>;

    /// 複数のクライアントにイベントを送信し、送信できた数を返す
    ///
    /// 一部の送信失敗は許容する。
    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        event: &OutboundEvent,
    ) -> Result<usize, MessagePushError>;

    /// 登録済みクライアント数を取得
    async fn count_clients(&self) -> usize;
}

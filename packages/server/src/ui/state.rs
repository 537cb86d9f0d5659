//! Server state.

use std::sync::Arc;

use hiroba_shared::time::Clock;

use crate::{
    domain::Timestamp,
    usecase::{
        ClaimIdentityUseCase, ConnectConnectionUseCase, ConnectionRegistry,
        DisconnectConnectionUseCase, GetStatsUseCase, SendMessageUseCase, SendNotificationUseCase,
    },
};

use super::HeartbeatPolicy;

/// Shared application state
pub struct AppState {
    /// Connection Registry（エラー通知の直接送信に使用）
    pub registry: Arc<ConnectionRegistry>,
    /// ConnectConnectionUseCase（接続受付のユースケース）
    pub connect_connection_usecase: ConnectConnectionUseCase,
    /// ClaimIdentityUseCase（ID 宣言のユースケース）
    pub claim_identity_usecase: ClaimIdentityUseCase,
    /// SendNotificationUseCase（通知送信のユースケース）
    pub send_notification_usecase: SendNotificationUseCase,
    /// SendMessageUseCase（メッセージ送信のユースケース）
    pub send_message_usecase: SendMessageUseCase,
    /// DisconnectConnectionUseCase（切断のユースケース）
    pub disconnect_connection_usecase: DisconnectConnectionUseCase,
    /// GetStatsUseCase（統計情報取得のユースケース）
    pub get_stats_usecase: GetStatsUseCase,
    /// Liveness check applied to every connection
    pub heartbeat: HeartbeatPolicy,
    /// Origins allowed to open a WebSocket. Empty allows any origin.
    pub allowed_origins: Vec<String>,
}

impl AppState {
    /// Wire every use case to the one registry instance.
    pub fn new(
        registry: Arc<ConnectionRegistry>,
        clock: Arc<dyn Clock>,
        heartbeat: HeartbeatPolicy,
        allowed_origins: Vec<String>,
    ) -> Self {
        let started_at = Timestamp::new(clock.now_millis());
        Self {
            connect_connection_usecase: ConnectConnectionUseCase::new(registry.clone(), clock),
            claim_identity_usecase: ClaimIdentityUseCase::new(registry.clone()),
            send_notification_usecase: SendNotificationUseCase::new(registry.clone()),
            send_message_usecase: SendMessageUseCase::new(registry.clone()),
            disconnect_connection_usecase: DisconnectConnectionUseCase::new(registry.clone()),
            get_stats_usecase: GetStatsUseCase::new(registry.clone(), started_at),
            registry,
            heartbeat,
            allowed_origins,
        }
    }

    /// Requests without an `Origin` header (non-browser clients) are accepted.
    pub fn is_origin_allowed(&self, origin: Option<&str>) -> bool {
        match origin {
            _ if self.allowed_origins.is_empty() => true,
            None => true,
            Some(origin) => self.allowed_origins.iter().any(|allowed| allowed == origin),
        }
    }
}

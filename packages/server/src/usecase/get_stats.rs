//! UseCase: 統計情報取得処理

use std::sync::Arc;

use crate::domain::Timestamp;

use super::ConnectionRegistry;

/// Observability snapshot of the relay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayStats {
    pub connections: usize,
    pub rooms: usize,
    pub started_at: Timestamp,
}

/// 統計情報取得のユースケース
pub struct GetStatsUseCase {
    registry: Arc<ConnectionRegistry>,
    started_at: Timestamp,
}

impl GetStatsUseCase {
    /// 新しい GetStatsUseCase を作成
    pub fn new(registry: Arc<ConnectionRegistry>, started_at: Timestamp) -> Self {
        Self {
            registry,
            started_at,
        }
    }

    pub async fn execute(&self) -> RelayStats {
        RelayStats {
            connections: self.registry.count().await,
            rooms: self.registry.room_count().await,
            started_at: self.started_at,
        }
    }
}

//! Connection liveness policy.

use std::time::Duration;

use tokio::time::Instant;

/// Ping every `interval`; drop the connection when nothing has been received
/// for `interval + timeout`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeartbeatPolicy {
    pub interval: Duration,
    pub timeout: Duration,
}

impl HeartbeatPolicy {
    pub fn new(interval: Duration, timeout: Duration) -> Self {
        Self { interval, timeout }
    }

    /// Longest silence tolerated from a client
    pub fn deadline(&self) -> Duration {
        self.interval + self.timeout
    }

    pub fn is_expired(&self, last_seen: Instant, now: Instant) -> bool {
        now.saturating_duration_since(last_seen) > self.deadline()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> HeartbeatPolicy {
        HeartbeatPolicy::new(Duration::from_secs(25), Duration::from_secs(20))
    }

    #[test]
    fn test_recent_activity_is_not_expired() {
        // テスト項目: 期限内に受信があれば切断しない
        // given (前提条件):
        let last_seen = Instant::now();

        // when (操作):
        let expired = policy().is_expired(last_seen, last_seen + Duration::from_secs(45));

        // then (期待する結果):
        assert!(!expired);
    }

    #[test]
    fn test_silence_past_deadline_is_expired() {
        // テスト項目: interval + timeout を超えて無応答なら期限切れ
        // given (前提条件):
        let last_seen = Instant::now();

        // when (操作):
        let expired = policy().is_expired(last_seen, last_seen + Duration::from_millis(45_001));

        // then (期待する結果):
        assert!(expired);
    }

    #[test]
    fn test_last_seen_in_future_is_not_expired() {
        // テスト項目: 最終受信時刻が現在より後でも期限切れと判定しない
        // given (前提条件):
        let now = Instant::now();

        // when (操作):
        let expired = policy().is_expired(now + Duration::from_secs(1), now);

        // then (期待する結果):
        assert!(!expired);
    }
}

//! HTTP API response DTOs.

use serde::Serialize;

/// Response body of `GET /api/health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthDto {
    pub status: &'static str,
}

/// Response body of `GET /api/stats`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsDto {
    pub connections: usize,
    pub rooms: usize,
    /// RFC 3339 timestamp of process start
    pub started_at: String,
}

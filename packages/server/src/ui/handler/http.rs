//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};
use hiroba_shared::time::timestamp_to_rfc3339;

use crate::{
    infrastructure::dto::http::{HealthDto, StatsDto},
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<HealthDto> {
    Json(HealthDto { status: "ok" })
}

/// Live connection and room counts
pub async fn get_stats(State(state): State<Arc<AppState>>) -> Json<StatsDto> {
    let stats = state.get_stats_usecase.execute().await;

    Json(StatsDto {
        connections: stats.connections,
        rooms: stats.rooms,
        started_at: timestamp_to_rfc3339(stats.started_at.value()),
    })
}

//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    domain::RoomId,
    infrastructure::dto::http::{HealthDto, RoomDetailDto, RoomSummaryDto},
    ui::state::AppState,
};

/// Liveness probe
pub async fn ping() -> &'static str {
    "pong"
}

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthDto> {
    let rooms = state.get_rooms_usecase.execute().await;
    let connections = state.get_rooms_usecase.count_connections().await;

    Json(HealthDto {
        status: "ok",
        connections,
        rooms: rooms.len(),
    })
}

/// Get list of rooms
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let rooms = state.get_rooms_usecase.execute().await;

    // Domain Model から DTO への変換
    Json(rooms.iter().map(RoomSummaryDto::from).collect())
}

/// Get room detail by ID
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomDetailDto>, StatusCode> {
    let room_id = RoomId::new(room_id).map_err(|_| StatusCode::NOT_FOUND)?;
    let room = state
        .get_rooms_usecase
        .get_room(&room_id)
        .await
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(RoomDetailDto::from(&room)))
}

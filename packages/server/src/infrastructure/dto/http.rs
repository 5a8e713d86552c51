//! HTTP API response DTOs.

use serde::Serialize;

use super::websocket::ChatEntry;

/// Room summary for `GET /api/rooms`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummaryDto {
    pub id: String,
    pub users: Vec<String>,
    pub member_count: usize,
    pub message_count: usize,
    /// RFC 3339
    pub created_at: String,
}

/// Room detail for `GET /api/rooms/{room_id}`, including the chat history
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDetailDto {
    pub id: String,
    pub users: Vec<String>,
    pub member_count: usize,
    pub messages: Vec<ChatEntry>,
    /// RFC 3339
    pub created_at: String,
}

/// Body of `GET /api/health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthDto {
    pub status: &'static str,
    pub connections: usize,
    pub rooms: usize,
}

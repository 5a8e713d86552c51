//! Conversion logic between DTOs and domain types.

use hiroba_shared::time::timestamp_to_rfc3339;

use crate::domain::{
    ChatMessage, ClientEvent, MessageText, Room, RoomId, ServerEvent, Username, ValueObjectError,
};
use crate::infrastructure::dto::{
    http::{RoomDetailDto, RoomSummaryDto},
    websocket as dto,
};

// ========================================
// DTO → Domain
// ========================================

impl TryFrom<dto::ClientMessage> for ClientEvent {
    type Error = ValueObjectError;

    fn try_from(msg: dto::ClientMessage) -> Result<Self, Self::Error> {
        Ok(match msg {
            dto::ClientMessage::Join(payload) => ClientEvent::Join {
                room_id: RoomId::try_from(payload.room_id)?,
                username: Username::try_from(payload.username)?,
            },
            dto::ClientMessage::Chat(payload) => ClientEvent::Chat {
                text: MessageText::from(payload.message),
            },
            dto::ClientMessage::Exit(_) => ClientEvent::Exit,
        })
    }
}

// ========================================
// Domain → DTO
// ========================================

impl From<&ChatMessage> for dto::ChatEntry {
    fn from(message: &ChatMessage) -> Self {
        Self {
            from: message.from.as_str().to_string(),
            message: message.text.as_str().to_string(),
        }
    }
}

fn presence(room_id: &RoomId, username: &Username) -> dto::PresencePayload {
    dto::PresencePayload {
        room_id: room_id.as_str().to_string(),
        username: username.as_str().to_string(),
    }
}

impl From<&ServerEvent> for dto::ServerMessage {
    fn from(event: &ServerEvent) -> Self {
        match event {
            ServerEvent::SelfJoined { room_id, username } => {
                Self::SelfJoined(presence(room_id, username))
            }
            ServerEvent::Joined { room_id, username } => Self::Joined(presence(room_id, username)),
            ServerEvent::Left { room_id, username } => Self::Left(presence(room_id, username)),
            ServerEvent::Users { users } => Self::Users(dto::UsersPayload {
                users: users.iter().map(|u| u.as_str().to_string()).collect(),
            }),
            ServerEvent::ChatHistory { messages } => Self::ChatHistory(dto::ChatHistoryPayload {
                messages: messages.iter().map(dto::ChatEntry::from).collect(),
            }),
            ServerEvent::ChatNew { message } => Self::ChatNew(message.into()),
        }
    }
}

impl From<&Room> for RoomDetailDto {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id.as_str().to_string(),
            users: room
                .usernames()
                .iter()
                .map(|u| u.as_str().to_string())
                .collect(),
            member_count: room.members().len(),
            messages: room.history().iter().map(dto::ChatEntry::from).collect(),
            created_at: timestamp_to_rfc3339(room.created_at.value()),
        }
    }
}

impl From<&Room> for RoomSummaryDto {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id.as_str().to_string(),
            users: room
                .usernames()
                .iter()
                .map(|u| u.as_str().to_string())
                .collect(),
            member_count: room.members().len(),
            message_count: room.history().len(),
            created_at: timestamp_to_rfc3339(room.created_at.value()),
        }
    }
}

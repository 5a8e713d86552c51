//! Inbound and outbound protocol events, independent of the wire format.

use super::{
    entity::ChatMessage,
    value_object::{MessageText, RoomId, Username},
};

/// Event sent by a client over its connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    Join { room_id: RoomId, username: Username },
    Chat { text: MessageText },
    /// Explicit leave. Room and username come from server-side state.
    Exit,
}

/// Event pushed from the server to one or more clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    /// Sent to the joining connection only
    SelfJoined { room_id: RoomId, username: Username },
    Joined { room_id: RoomId, username: Username },
    Left { room_id: RoomId, username: Username },
    /// Distinct names currently present, in insertion order
    Users { users: Vec<Username> },
    ChatHistory { messages: Vec<ChatMessage> },
    ChatNew { message: ChatMessage },
}

impl ServerEvent {
    /// Short name used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SelfJoined { .. } => "self-joined",
            Self::Joined { .. } => "joined",
            Self::Left { .. } => "left",
            Self::Users { .. } => "users",
            Self::ChatHistory { .. } => "chat-history",
            Self::ChatNew { .. } => "chat-new",
        }
    }
}

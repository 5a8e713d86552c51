//! Entities and the snapshots returned by repository operations.

use super::value_object::{ConnectionId, MessageText, RoomId, Timestamp, Username};

/// One message in a room's history. Never mutated after it is appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub from: Username,
    pub text: MessageText,
    pub sent_at: Timestamp,
}

impl ChatMessage {
    pub fn new(from: Username, text: MessageText, sent_at: Timestamp) -> Self {
        Self {
            from,
            text,
            sent_at,
        }
    }
}

/// Room a connection has joined, and the name it joined with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Membership {
    pub room_id: RoomId,
    pub username: Username,
}

/// Registry entry for one live connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub id: ConnectionId,
    pub connected_at: Timestamp,
    /// `None` while the connection is not in any room
    pub membership: Option<Membership>,
}

impl Connection {
    pub fn new(id: ConnectionId, connected_at: Timestamp) -> Self {
        Self {
            id,
            connected_at,
            membership: None,
        }
    }
}

/// A chat room.
///
/// Members and names behave as sets that keep insertion order. History grows
/// without bound for as long as the room exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub id: RoomId,
    pub created_at: Timestamp,
    members: Vec<ConnectionId>,
    usernames: Vec<Username>,
    history: Vec<ChatMessage>,
}

impl Room {
    pub fn new(id: RoomId, created_at: Timestamp) -> Self {
        Self {
            id,
            created_at,
            members: Vec::new(),
            usernames: Vec::new(),
            history: Vec::new(),
        }
    }

    /// Add a member. Returns `false` if it was already present.
    pub fn add_member(&mut self, connection_id: ConnectionId) -> bool {
        if self.members.contains(&connection_id) {
            return false;
        }
        self.members.push(connection_id);
        true
    }

    /// Remove a member. Returns `false` if it was not present.
    pub fn remove_member(&mut self, connection_id: &ConnectionId) -> bool {
        let before = self.members.len();
        self.members.retain(|id| id != connection_id);
        self.members.len() != before
    }

    pub fn add_username(&mut self, username: Username) {
        if !self.usernames.contains(&username) {
            self.usernames.push(username);
        }
    }

    /// Remove a name by value. Other connections sharing the name are not
    /// taken into account.
    pub fn remove_username(&mut self, username: &Username) {
        self.usernames.retain(|name| name != username);
    }

    pub fn append_message(&mut self, message: ChatMessage) {
        self.history.push(message);
    }

    pub fn members(&self) -> &[ConnectionId] {
        &self.members
    }

    pub fn usernames(&self) -> &[Username] {
        &self.usernames
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Members other than `connection_id`.
    pub fn peers_of(&self, connection_id: &ConnectionId) -> Vec<ConnectionId> {
        self.members
            .iter()
            .filter(|id| *id != connection_id)
            .copied()
            .collect()
    }
}

/// State of a room right after a successful join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinedRoom {
    pub room_id: RoomId,
    pub username: Username,
    /// All members, including the joiner
    pub members: Vec<ConnectionId>,
    pub usernames: Vec<Username>,
    pub history: Vec<ChatMessage>,
    /// `true` when this join created the room
    pub created: bool,
}

/// A message that was appended to a room's history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostedMessage {
    pub room_id: RoomId,
    pub message: ChatMessage,
    /// Members other than the sender
    pub recipients: Vec<ConnectionId>,
}

/// State of a room right after a member left.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeftRoom {
    pub room_id: RoomId,
    pub username: Username,
    pub remaining: Vec<ConnectionId>,
    pub usernames: Vec<Username>,
    /// `true` when the last member left and the room was removed
    pub room_deleted: bool,
}

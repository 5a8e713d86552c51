//! Domain error types.

use thiserror::Error;

use super::value_object::{ConnectionId, RoomId};

/// Value object validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("room id must not be empty")]
    EmptyRoomId,

    #[error("username must not be empty")]
    EmptyUsername,
}

/// Repository errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// The connection was never registered, or has already been removed
    #[error("connection '{0}' is not registered")]
    ConnectionNotFound(ConnectionId),

    #[error("connection '{0}' is already registered")]
    DuplicateConnection(ConnectionId),

    /// Joining a second room while still a member of another one
    #[error("connection is already in room '{current}'")]
    AlreadyInRoom { current: RoomId },

    /// Registry points at a room the directory no longer holds
    #[error("room '{0}' not found")]
    RoomNotFound(RoomId),
}

/// MessagePusher errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("client '{0}' is not registered")]
    ClientNotFound(ConnectionId),

    /// Receiving side of the channel is gone (transport closing or closed)
    #[error("channel for client '{0}' is closed")]
    ChannelClosed(ConnectionId),

    #[error("failed to encode event: {0}")]
    Encode(String),
}

//! UseCase errors.

use thiserror::Error;

use crate::domain::{ConnectionId, RepositoryError, RoomId};

/// Errors from `ConnectClientUseCase`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    #[error("connection '{0}' is already registered")]
    DuplicateConnection(ConnectionId),

    #[error(transparent)]
    Repository(RepositoryError),
}

impl From<RepositoryError> for ConnectError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::DuplicateConnection(id) => Self::DuplicateConnection(id),
            other => Self::Repository(other),
        }
    }
}

/// Errors from `JoinRoomUseCase`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinError {
    /// One room per connection: exit the current room first
    #[error("already in room '{current}', cannot join '{requested}'")]
    AlreadyInRoom { current: RoomId, requested: RoomId },

    #[error(transparent)]
    Repository(RepositoryError),
}

/// Errors from `SendChatUseCase`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendChatError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Errors from `LeaveRoomUseCase` / `DisconnectClientUseCase`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LeaveError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

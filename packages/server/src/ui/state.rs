//! Shared application state for the axum handlers.

use std::sync::Arc;

use tokio::sync::watch;

use crate::usecase::GetRoomsUseCase;

use super::engine::EngineHandle;

/// Shared application state
pub struct AppState {
    /// Entry point for every client event; all mutation goes through here
    pub engine: EngineHandle,
    /// Read-only room snapshots for the HTTP API
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    /// Flips to `true` when the server starts shutting down
    pub shutdown: watch::Receiver<bool>,
}

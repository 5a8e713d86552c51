//! UI layer: HTTP/WebSocket transport and the presence engine task.

mod engine;
mod handler;
mod server;
mod signal;
pub mod state;

pub use engine::{EngineCommand, EngineHandle, EngineUseCases, PresenceEngine};
pub use server::Server;

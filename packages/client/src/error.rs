//! Client error types.

use hiroba_server::domain::ValueObjectError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Room id or username rejected before connecting
    #[error("Invalid argument: {0}")]
    InvalidArgument(#[from] ValueObjectError),

    /// Could not establish the WebSocket connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The connection dropped while the session was running
    #[error("Connection lost")]
    ConnectionLost,

    /// Failed to encode an outbound frame
    #[error("Failed to encode message: {0}")]
    Encode(#[from] serde_json::Error),
}

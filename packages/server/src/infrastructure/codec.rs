//! Decoding of inbound frames and encoding of outbound events.
//!
//! Decoding fails closed: anything that is not a well-formed envelope with a
//! known `type` and a valid payload is rejected with a [`DecodeError`].

use serde::Deserialize;
use thiserror::Error;

use crate::domain::{ClientEvent, ServerEvent, ValueObjectError};

use super::dto::websocket::{ChatPayload, ClientMessage, JoinPayload, ServerMessage};

/// Errors produced while decoding an inbound frame
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("frame is not a JSON envelope: {0}")]
    InvalidEnvelope(#[source] serde_json::Error),

    #[error("unknown event type '{0}'")]
    UnknownType(String),

    #[error("invalid payload for '{event_type}': {source}")]
    InvalidPayload {
        event_type: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid value: {0}")]
    InvalidValue(#[from] ValueObjectError),
}

#[derive(Deserialize)]
struct Envelope {
    r#type: String,
    #[serde(default)]
    payload: serde_json::Value,
}

/// Decode one text frame into a [`ClientEvent`].
pub fn decode_client_event(text: &str) -> Result<ClientEvent, DecodeError> {
    let Envelope {
        r#type: event_type,
        payload: body,
    } = serde_json::from_str(text).map_err(DecodeError::InvalidEnvelope)?;

    let message = match event_type.as_str() {
        "join" => ClientMessage::Join(payload::<JoinPayload>("join", body)?),
        "chat" => ClientMessage::Chat(payload::<ChatPayload>("chat", body)?),
        // Exit fields are never read, so any body counts as an exit
        "exit" => ClientMessage::Exit(serde_json::from_value(body).unwrap_or_default()),
        _ => return Err(DecodeError::UnknownType(event_type.clone())),
    };

    Ok(ClientEvent::try_from(message)?)
}

fn payload<T: serde::de::DeserializeOwned>(
    event_type: &'static str,
    value: serde_json::Value,
) -> Result<T, DecodeError> {
    serde_json::from_value(value).map_err(|source| DecodeError::InvalidPayload { event_type, source })
}

/// Encode a [`ServerEvent`] into a text frame.
pub fn encode_server_event(event: &ServerEvent) -> Result<String, serde_json::Error> {
    serde_json::to_string(&ServerMessage::from(event))
}

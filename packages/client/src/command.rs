//! Parsing of lines typed at the prompt and the frames they turn into.
//!
//! Plain lines are chat messages. Lines starting with `/` are commands:
//!
//! - `/join <room>`: leave the current room and join another one
//! - `/exit`: leave the current room but keep the connection open
//! - `/quit`: close the connection and exit the client
//! - `/help`: show the command list

use hiroba_server::infrastructure::dto::websocket::{
    ChatPayload, ClientMessage, ExitPayload, JoinPayload,
};
use thiserror::Error;

/// What the user asked for on one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputCommand {
    Chat(String),
    Join(String),
    Exit,
    Quit,
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Usage: /join <room>")]
    MissingRoom,

    #[error("Unknown command '{0}'. Type /help for the command list")]
    Unknown(String),
}

/// Parse one (already trimmed) input line
pub fn parse_input(line: &str) -> Result<InputCommand, CommandError> {
    let Some(rest) = line.strip_prefix('/') else {
        return Ok(InputCommand::Chat(line.to_string()));
    };

    let mut parts = rest.splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or_default();
    let arg = parts.next().map(str::trim).unwrap_or_default();

    match name {
        "join" if arg.is_empty() => Err(CommandError::MissingRoom),
        "join" => Ok(InputCommand::Join(arg.to_string())),
        "exit" => Ok(InputCommand::Exit),
        "quit" => Ok(InputCommand::Quit),
        "help" => Ok(InputCommand::Help),
        other => Err(CommandError::Unknown(format!("/{}", other))),
    }
}

pub fn join_message(room_id: &str, username: &str) -> ClientMessage {
    ClientMessage::Join(JoinPayload {
        room_id: room_id.to_string(),
        username: username.to_string(),
    })
}

pub fn chat_message(text: String) -> ClientMessage {
    ClientMessage::Chat(ChatPayload { message: text })
}

pub fn exit_message(room_id: &str, username: &str) -> ClientMessage {
    ClientMessage::Exit(ExitPayload {
        room_id: Some(room_id.to_string()),
        username: Some(username.to_string()),
    })
}

//! Room-based chat relay server.
//!
//! Clients open a WebSocket, join a named room, exchange text messages with
//! everyone in that room and receive presence notifications.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;

#[cfg(test)]
pub(crate) mod test_support;

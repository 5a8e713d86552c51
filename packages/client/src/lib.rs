//! Hiroba CLI client.
//!
//! Connects to a Hiroba server over WebSocket, joins a room and relays
//! everything typed on stdin as chat messages.

pub mod command;
pub mod error;
pub mod formatter;
mod runner;
mod session;
mod ui;

pub use runner::run_client;

//! Data Transfer Objects (DTOs).
//!
//! DTOs are organized by protocol:
//! - `websocket`: WebSocket envelopes `{type, payload}`
//! - `http`: HTTP API response DTOs

pub mod conversion;
pub mod http;
pub mod websocket;

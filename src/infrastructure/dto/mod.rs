//! Data Transfer Objects (DTOs) for the relay server.
//!
//! DTOs are organized by protocol:
//! - `websocket`: WebSocket message DTOs (wire-compatible with the legacy clients)
//! - `http`: HTTP API request/response DTOs

pub mod conversion;
pub mod http;
pub mod websocket;

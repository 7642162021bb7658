//! Error types for the relay's infrastructure seams.

use thiserror::Error;

/// Errors raised while pushing a message toward a single connection
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MessagePushError {
    /// No live session with this id
    #[error("session '{0}' not found")]
    SessionNotFound(String),

    /// The session's channel is gone (connection already closing)
    #[error("failed to push message: {0}")]
    PushFailed(String),
}

/// Errors raised by the durable history store.
///
/// Store failures never affect the live relay: callers log them and answer
/// the HTTP request with a 5xx, nothing more.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HistoryStoreError {
    #[error("waypoint {0} not found")]
    WaypointNotFound(u64),

    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
}

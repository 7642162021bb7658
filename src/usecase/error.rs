//! Error types for the use case layer.
//!
//! Each WebSocket-facing error renders to the human-readable text that goes
//! out in the `error` reply, so `Display` output is part of the wire surface.

use thiserror::Error;

use crate::domain::{SampleError, ValueObjectError};

/// Errors from [`super::RegisterMemberUseCase`]
#[derive(Debug, Error, PartialEq)]
pub enum RegisterError {
    #[error("userId is required")]
    MissingMemberId,

    #[error("invalid identifier: {0}")]
    InvalidIdentifier(#[from] ValueObjectError),
}

/// Errors from [`super::JoinViewerUseCase`]
#[derive(Debug, Error, PartialEq)]
pub enum JoinError {
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(#[from] ValueObjectError),
}

/// Errors from [`super::UpdateSpeedUseCase`]
#[derive(Debug, Error, PartialEq)]
pub enum SpeedUpdateError {
    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error("invalid identifier: {0}")]
    InvalidIdentifier(#[from] ValueObjectError),

    #[error(transparent)]
    InvalidSample(#[from] SampleError),
}

/// Errors from [`super::TriggerHornUseCase`]
#[derive(Debug, Error, PartialEq)]
pub enum HornError {
    /// The target group has no live members; logged and dropped without an
    /// error reply.
    #[error("group '{0}' does not exist")]
    UnknownGroup(String),

    /// The member is still inside its cooldown window
    #[error("horn is cooling down, retry in {retry_after_secs}s")]
    Throttled { retry_after_secs: i64 },
}

//! MessagePusher trait: the seam between group state changes and the
//! per-connection WebSocket channels.
//!
//! Sessions are identified by an opaque [`SessionId`] rather than a member
//! id, because viewer sessions receive broadcasts without ever owning a
//! member state.

use std::fmt;

use async_trait::async_trait;
use tokio::sync::mpsc;
use uuid::Uuid;

use super::error::MessagePushError;
use super::value_object::GroupName;

/// Channel used to hand a serialized message to a connection's writer task
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// Opaque identifier of one live transport connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Delivery of serialized payloads to live connections.
///
/// The use case layer depends on this trait; the WebSocket-backed
/// implementation lives in the infrastructure layer.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// Track a newly opened connection.
    async fn register_session(&self, session: SessionId, sender: PusherChannel);

    /// Tag a connection with its group; broadcasts to that group will reach
    /// it from now on. Rebinding overwrites the previous tag.
    async fn bind_group(&self, session: &SessionId, group: GroupName);

    /// Forget a closed connection.
    async fn unregister_session(&self, session: &SessionId);

    /// Deliver to exactly one connection (error replies, pongs).
    async fn push_to(&self, session: &SessionId, content: &str) -> Result<(), MessagePushError>;

    /// Deliver to every open connection bound to `group`, viewers included.
    /// Best-effort: a failed send to one connection is logged and skipped,
    /// it never aborts delivery to the rest and never surfaces to the caller.
    async fn broadcast_to_group(&self, group: &GroupName, content: &str);
}

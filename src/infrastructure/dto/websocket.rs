//! WebSocket message DTOs.
//!
//! The wire format keeps compatibility with the deployed mobile/wearable
//! clients: a JSON object tagged by a `type` field with camelCase payload
//! fields. Inbound frames decode once into the closed [`ClientMessage`] sum
//! type; tags this server does not know fall into the explicit `Unknown`
//! arm instead of failing the frame.
//!
//! Required-but-missing scalar fields deserialize as `None` so validation
//! (and the resulting error reply) stays in one place in the session
//! handler, rather than surfacing as an opaque decode error.

use serde::{Deserialize, Serialize};

/// Inbound client messages
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// Bind this connection to a group as a tracked member
    #[serde(rename = "register", rename_all = "camelCase")]
    Register {
        #[serde(default)]
        user_id: Option<String>,
        #[serde(default)]
        user_name: Option<String>,
        #[serde(default)]
        group_name: Option<String>,
    },

    /// Bind this connection to a group as a read-only viewer
    #[serde(rename = "join", rename_all = "camelCase")]
    Join {
        #[serde(default)]
        group_name: Option<String>,
    },

    /// Periodic speed/position sample
    #[serde(rename = "speed", rename_all = "camelCase")]
    Speed {
        #[serde(default)]
        user_id: Option<String>,
        #[serde(default)]
        user_name: Option<String>,
        #[serde(default)]
        group_name: Option<String>,
        #[serde(default)]
        lat: Option<f64>,
        #[serde(default)]
        lon: Option<f64>,
        #[serde(default)]
        speed: Option<f64>,
        #[serde(default)]
        max_speed: Option<f64>,
        #[serde(default)]
        bearing: Option<f64>,
        #[serde(default)]
        timestamp: Option<i64>,
    },

    /// Keep-alive; answered with a pong on the same connection
    #[serde(rename = "ping")]
    Ping,

    /// Rate-limited group-wide alert
    #[serde(rename = "group-horn", rename_all = "camelCase")]
    GroupHorn {
        #[serde(default)]
        user_id: Option<String>,
        #[serde(default)]
        user_name: Option<String>,
        #[serde(default)]
        group_name: Option<String>,
        #[serde(default)]
        timestamp: Option<i64>,
    },

    /// Unrecognized tag; logged and ignored without closing the connection
    #[serde(other)]
    Unknown,
}

/// Tags of outbound server messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MessageType {
    #[serde(rename = "users")]
    Users,
    #[serde(rename = "pong")]
    Pong,
    #[serde(rename = "error")]
    Error,
    #[serde(rename = "group-horn")]
    GroupHorn,
}

/// One member's state as serialized inside a snapshot broadcast
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberStateDto {
    pub user_id: String,
    pub user_name: String,
    pub speed: f64,
    pub max_speed: f64,
    pub lat: f64,
    pub lon: f64,
    pub bearing: f64,
    pub timestamp: i64,
}

/// Full-group snapshot, sent wholesale on every state change
#[derive(Debug, Clone, Serialize)]
pub struct UsersSnapshotMessage {
    pub r#type: MessageType,
    pub users: Vec<MemberStateDto>,
}

/// Keep-alive reply
#[derive(Debug, Clone, Serialize)]
pub struct PongMessage {
    pub r#type: MessageType,
}

/// Error reply delivered to the originating connection only
#[derive(Debug, Clone, Serialize)]
pub struct ErrorMessage {
    pub r#type: MessageType,
    pub message: String,
}

/// Accepted group horn, broadcast to the whole group including the caller
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupHornMessage {
    pub r#type: MessageType,
    pub user_id: String,
    pub user_name: String,
    pub group_name: String,
    pub timestamp: i64,
}

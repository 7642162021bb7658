//! WebSocket connection handlers.
//!
//! One `handle_socket` task per connection owns the session's binding state;
//! everything shared lives behind the use cases. Malformed or rejected
//! messages produce an `error` reply on the same connection and never close
//! it.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use thiserror::Error;
use tokio::sync::mpsc;

use crate::{
    domain::{DisplayName, GroupName, MemberId, MemberState, MessagePusher, SessionId},
    infrastructure::dto::websocket::{
        ClientMessage, ErrorMessage, GroupHornMessage, MemberStateDto, MessageType, PongMessage,
        UsersSnapshotMessage,
    },
    ui::state::AppState,
    usecase::{HornError, SpeedSampleInput},
};

/// What a connection currently is to the relay
#[derive(Debug, Clone, PartialEq)]
enum SessionBinding {
    /// Fresh connection, no group yet
    Unbound,
    /// Tracked member publishing samples into its group
    Member {
        group: GroupName,
        member: MemberId,
        display_name: DisplayName,
    },
    /// Read-only viewer of a group
    Viewer { group: GroupName },
}

/// Rejected binding transitions
#[derive(Debug, Error, PartialEq)]
enum BindingError {
    #[error("viewer connections cannot register as a member")]
    ViewerCannotRegister,

    #[error("tracked members cannot switch to viewing")]
    MemberCannotView,
}

/// Per-connection session state, owned by the connection task.
///
/// Transitions: a member may re-register (new group or identity), a viewer
/// may re-join another group, but the member/viewer roles never cross.
struct ConnectionSession {
    id: SessionId,
    binding: SessionBinding,
}

impl ConnectionSession {
    fn new(id: SessionId) -> Self {
        Self {
            id,
            binding: SessionBinding::Unbound,
        }
    }

    fn bind_member(
        &mut self,
        group: GroupName,
        member: MemberId,
        display_name: DisplayName,
    ) -> Result<(), BindingError> {
        if matches!(self.binding, SessionBinding::Viewer { .. }) {
            return Err(BindingError::ViewerCannotRegister);
        }
        self.binding = SessionBinding::Member {
            group,
            member,
            display_name,
        };
        Ok(())
    }

    fn bind_viewer(&mut self, group: GroupName) -> Result<(), BindingError> {
        if matches!(self.binding, SessionBinding::Member { .. }) {
            return Err(BindingError::MemberCannotView);
        }
        self.binding = SessionBinding::Viewer { group };
        Ok(())
    }

    fn as_member(&self) -> Option<(&GroupName, &MemberId, &DisplayName)> {
        match &self.binding {
            SessionBinding::Member {
                group,
                member,
                display_name,
            } => Some((group, member, display_name)),
            _ => None,
        }
    }

    fn is_viewer(&self) -> bool {
        matches!(self.binding, SessionBinding::Viewer { .. })
    }

    /// Membership facts for disconnect cleanup
    fn membership(&self) -> Option<(GroupName, MemberId)> {
        match &self.binding {
            SessionBinding::Member { group, member, .. } => {
                Some((group.clone(), member.clone()))
            }
            _ => None,
        }
    }
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that receives serialized messages from the rx channel and
/// pushes them to the WebSocket sender.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

/// Serialize the group snapshot and deliver it to every connection bound to
/// the group, viewers included.
pub async fn broadcast_snapshot(
    pusher: &dyn MessagePusher,
    group: &GroupName,
    snapshot: Vec<MemberState>,
) {
    let msg = UsersSnapshotMessage {
        r#type: MessageType::Users,
        users: snapshot.into_iter().map(MemberStateDto::from).collect(),
    };
    let json = serde_json::to_string(&msg).unwrap();
    pusher.broadcast_to_group(group, &json).await;
}

async fn send_error(state: &AppState, session: &SessionId, message: String) {
    let reply = ErrorMessage {
        r#type: MessageType::Error,
        message,
    };
    let json = serde_json::to_string(&reply).unwrap();
    if let Err(e) = state.message_pusher.push_to(session, &json).await {
        tracing::warn!("Failed to send error reply to session '{}': {}", session, e);
    }
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let session_id = SessionId::generate();
    let (tx, rx) = mpsc::unbounded_channel();
    state.message_pusher.register_session(session_id, tx).await;
    tracing::info!("WebSocket session '{}' opened", session_id);

    let (sender, mut receiver) = socket.split();
    let mut send_task = pusher_loop(rx, sender);

    let mut session = ConnectionSession::new(session_id);

    loop {
        tokio::select! {
            // The writer half died (client gone); stop reading
            _ = &mut send_task => break,
            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        handle_text_message(&state, &mut session, &text).await;
                    }
                    Some(Ok(Message::Close(_))) => {
                        tracing::info!("Session '{}' requested close", session_id);
                        break;
                    }
                    Some(Ok(_)) => {
                        // Binary and protocol-level ping/pong frames are ignored
                    }
                    Some(Err(e)) => {
                        tracing::warn!("WebSocket error on session '{}': {}", session_id, e);
                        break;
                    }
                    None => break,
                }
            }
        }
    }
    send_task.abort();

    // Full cleanup, then tell the remaining connections who is left
    let membership = session.membership();
    if let Some((group, snapshot)) = state
        .disconnect_member_usecase
        .execute(&session_id, membership)
        .await
    {
        broadcast_snapshot(&*state.message_pusher, &group, snapshot).await;
    }
    tracing::info!("WebSocket session '{}' closed", session_id);
}

async fn handle_text_message(state: &Arc<AppState>, session: &mut ConnectionSession, text: &str) {
    let msg = match serde_json::from_str::<ClientMessage>(text) {
        Ok(msg) => msg,
        Err(e) => {
            // Undecodable frames never close or answer the connection
            tracing::warn!("Undecodable frame on session '{}': {}", session.id, e);
            return;
        }
    };

    match msg {
        ClientMessage::Register {
            user_id,
            user_name,
            group_name,
        } => handle_register(state, session, user_id, user_name, group_name).await,
        ClientMessage::Join { group_name } => handle_join(state, session, group_name).await,
        ClientMessage::Speed {
            user_id,
            user_name,
            group_name,
            lat,
            lon,
            speed,
            max_speed,
            bearing,
            timestamp,
        } => {
            handle_speed(
                state, session, user_id, user_name, group_name, lat, lon, speed, max_speed,
                bearing, timestamp,
            )
            .await
        }
        ClientMessage::Ping => {
            let pong = PongMessage {
                r#type: MessageType::Pong,
            };
            let json = serde_json::to_string(&pong).unwrap();
            if let Err(e) = state.message_pusher.push_to(&session.id, &json).await {
                tracing::warn!("Failed to send pong to session '{}': {}", session.id, e);
            }
        }
        ClientMessage::GroupHorn {
            user_id,
            user_name,
            group_name,
            timestamp,
        } => handle_horn(state, session, user_id, user_name, group_name, timestamp).await,
        ClientMessage::Unknown => {
            tracing::warn!("Unknown message type on session '{}', ignoring", session.id);
        }
    }
}

async fn handle_register(
    state: &Arc<AppState>,
    session: &mut ConnectionSession,
    user_id: Option<String>,
    user_name: Option<String>,
    group_name: Option<String>,
) {
    if session.is_viewer() {
        send_error(
            state,
            &session.id,
            BindingError::ViewerCannotRegister.to_string(),
        )
        .await;
        return;
    }

    match state
        .register_member_usecase
        .execute(&session.id, user_id, user_name, group_name)
        .await
    {
        Ok(registration) => {
            // Unbound or re-registering member, never a viewer here
            let _ = session.bind_member(
                registration.group.clone(),
                registration.member,
                registration.display_name,
            );
            broadcast_snapshot(
                &*state.message_pusher,
                &registration.group,
                registration.snapshot,
            )
            .await;
        }
        Err(e) => send_error(state, &session.id, e.to_string()).await,
    }
}

async fn handle_join(
    state: &Arc<AppState>,
    session: &mut ConnectionSession,
    group_name: Option<String>,
) {
    if session.as_member().is_some() {
        send_error(state, &session.id, BindingError::MemberCannotView.to_string()).await;
        return;
    }

    match state
        .join_viewer_usecase
        .execute(&session.id, group_name)
        .await
    {
        Ok((group, snapshot)) => {
            let _ = session.bind_viewer(group);
            // Initial snapshot goes to the joining viewer only
            let msg = UsersSnapshotMessage {
                r#type: MessageType::Users,
                users: snapshot.into_iter().map(MemberStateDto::from).collect(),
            };
            let json = serde_json::to_string(&msg).unwrap();
            if let Err(e) = state.message_pusher.push_to(&session.id, &json).await {
                tracing::warn!("Failed to send snapshot to session '{}': {}", session.id, e);
            }
        }
        Err(e) => send_error(state, &session.id, e.to_string()).await,
    }
}

#[allow(clippy::too_many_arguments)]
async fn handle_speed(
    state: &Arc<AppState>,
    session: &mut ConnectionSession,
    user_id: Option<String>,
    user_name: Option<String>,
    group_name: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    speed: Option<f64>,
    max_speed: Option<f64>,
    bearing: Option<f64>,
    timestamp: Option<i64>,
) {
    if session.is_viewer() {
        send_error(
            state,
            &session.id,
            "viewer connections cannot publish speed".to_string(),
        )
        .await;
        return;
    }

    // Resolve group and identity from the binding; an unbound session gets
    // implicitly registered from the sample's own fields first.
    let (group, member, display_name) = match session.as_member() {
        Some((group, member, display_name)) => {
            if let Some(claimed) = &user_id {
                if claimed != member.as_str() {
                    send_error(
                        state,
                        &session.id,
                        "userId does not match this connection's member".to_string(),
                    )
                    .await;
                    return;
                }
            }
            (group.clone(), member.clone(), display_name.clone())
        }
        None => {
            match state
                .register_member_usecase
                .execute(&session.id, user_id, user_name, group_name)
                .await
            {
                Ok(registration) => {
                    let _ = session.bind_member(
                        registration.group.clone(),
                        registration.member.clone(),
                        registration.display_name.clone(),
                    );
                    tracing::info!(
                        "Session '{}' implicitly registered member '{}' via speed message",
                        session.id,
                        registration.member.as_str(),
                    );
                    (
                        registration.group,
                        registration.member,
                        registration.display_name,
                    )
                }
                Err(e) => {
                    send_error(state, &session.id, e.to_string()).await;
                    return;
                }
            }
        }
    };

    let input = SpeedSampleInput {
        member_id: member,
        display_name,
        lat,
        lon,
        speed,
        max_speed,
        bearing,
        timestamp,
    };

    match state.update_speed_usecase.execute(&group, input).await {
        Ok(snapshot) => broadcast_snapshot(&*state.message_pusher, &group, snapshot).await,
        // The rejected sample is the sender's problem, not the group's
        Err(e) => send_error(state, &session.id, e.to_string()).await,
    }
}

async fn handle_horn(
    state: &Arc<AppState>,
    session: &mut ConnectionSession,
    user_id: Option<String>,
    user_name: Option<String>,
    group_name: Option<String>,
    timestamp: Option<i64>,
) {
    // A bound member horns as itself; other sessions must name themselves
    let (group, member, display_name) = match session.as_member() {
        Some((group, member, display_name)) => {
            (group.clone(), member.clone(), display_name.clone())
        }
        None => {
            let member = match user_id {
                Some(id) => match MemberId::new(id) {
                    Ok(member) => member,
                    Err(e) => {
                        send_error(state, &session.id, format!("invalid identifier: {}", e))
                            .await;
                        return;
                    }
                },
                None => {
                    send_error(state, &session.id, "userId is required".to_string()).await;
                    return;
                }
            };
            let group = match GroupName::new_or_default(group_name) {
                Ok(group) => group,
                Err(e) => {
                    send_error(state, &session.id, format!("invalid identifier: {}", e)).await;
                    return;
                }
            };
            (group, member, DisplayName::from_optional(user_name))
        }
    };

    // The client's own clock wins when it sent one
    let timestamp = timestamp
        .filter(|ts| *ts > 0)
        .unwrap_or_else(|| state.clock.now_millis());

    let horn = GroupHornMessage {
        r#type: MessageType::GroupHorn,
        user_id: member.as_str().to_string(),
        user_name: display_name.into_string(),
        group_name: group.as_str().to_string(),
        timestamp,
    };
    let json = serde_json::to_string(&horn).unwrap();

    match state
        .trigger_horn_usecase
        .execute(&group, &member, json)
        .await
    {
        Ok(()) => {}
        Err(HornError::UnknownGroup(name)) => {
            // Group dissolved between sample and horn; nothing to alert
            tracing::warn!(
                "Dropping horn from session '{}' for unknown group '{}'",
                session.id,
                name,
            );
        }
        Err(e @ HornError::Throttled { .. }) => {
            send_error(state, &session.id, e.to_string()).await;
        }
    }
}

//! WebSocket-backed MessagePusher implementation.
//!
//! The WebSocket itself is accepted in the UI layer, which hands this pusher
//! the write half's `UnboundedSender`. Sending through the channel never
//! blocks, so fan-out to a group is non-blocking per recipient: a slow or
//! closed connection cannot delay delivery to the others.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{GroupName, MessagePushError, MessagePusher, PusherChannel, SessionId};

struct SessionEntry {
    group: Option<GroupName>,
    sender: PusherChannel,
}

/// Live connection table: session id -> (optional group tag, sender)
#[derive(Default)]
pub struct WebSocketMessagePusher {
    sessions: Mutex<HashMap<SessionId, SessionEntry>>,
}

impl WebSocketMessagePusher {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    async fn session_count(&self) -> usize {
        self.sessions.lock().await.len()
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_session(&self, session: SessionId, sender: PusherChannel) {
        let mut sessions = self.sessions.lock().await;
        sessions.insert(
            session,
            SessionEntry {
                group: None,
                sender,
            },
        );
        tracing::debug!("Session '{}' registered to MessagePusher", session);
    }

    async fn bind_group(&self, session: &SessionId, group: GroupName) {
        let mut sessions = self.sessions.lock().await;
        if let Some(entry) = sessions.get_mut(session) {
            entry.group = Some(group);
        } else {
            tracing::warn!("Cannot bind unknown session '{}' to a group", session);
        }
    }

    async fn unregister_session(&self, session: &SessionId) {
        let mut sessions = self.sessions.lock().await;
        sessions.remove(session);
        tracing::debug!("Session '{}' unregistered from MessagePusher", session);
    }

    async fn push_to(&self, session: &SessionId, content: &str) -> Result<(), MessagePushError> {
        let sessions = self.sessions.lock().await;

        if let Some(entry) = sessions.get(session) {
            entry
                .sender
                .send(content.to_string())
                .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
            Ok(())
        } else {
            Err(MessagePushError::SessionNotFound(session.to_string()))
        }
    }

    async fn broadcast_to_group(&self, group: &GroupName, content: &str) {
        let sessions = self.sessions.lock().await;

        for (session_id, entry) in sessions.iter() {
            if entry.group.as_ref() != Some(group) {
                continue;
            }
            // A failed send to one recipient must not abort the rest
            if let Err(e) = entry.sender.send(content.to_string()) {
                tracing::warn!(
                    "Failed to push broadcast to session '{}': {}",
                    session_id,
                    e
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn group(name: &str) -> GroupName {
        GroupName::new(name.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_push_to_registered_session() {
        // given:
        let pusher = WebSocketMessagePusher::new();
        let session = SessionId::generate();
        let (tx, mut rx) = mpsc::unbounded_channel();
        pusher.register_session(session, tx).await;

        // when:
        let result = pusher.push_to(&session, "hello").await;

        // then:
        assert!(result.is_ok());
        assert_eq!(rx.recv().await, Some("hello".to_string()));
    }

    #[tokio::test]
    async fn test_push_to_unknown_session_fails() {
        // given:
        let pusher = WebSocketMessagePusher::new();
        let session = SessionId::generate();

        // when:
        let result = pusher.push_to(&session, "hello").await;

        // then:
        assert!(matches!(
            result,
            Err(MessagePushError::SessionNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_broadcast_reaches_only_bound_group() {
        // given: two sessions in ride1, one in ride2, one unbound
        let pusher = WebSocketMessagePusher::new();

        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let s1 = SessionId::generate();
        pusher.register_session(s1, tx1).await;
        pusher.bind_group(&s1, group("ride1")).await;

        let (tx2, mut rx2) = mpsc::unbounded_channel();
        let s2 = SessionId::generate();
        pusher.register_session(s2, tx2).await;
        pusher.bind_group(&s2, group("ride1")).await;

        let (tx3, mut rx3) = mpsc::unbounded_channel();
        let s3 = SessionId::generate();
        pusher.register_session(s3, tx3).await;
        pusher.bind_group(&s3, group("ride2")).await;

        let (tx4, mut rx4) = mpsc::unbounded_channel();
        pusher.register_session(SessionId::generate(), tx4).await;

        // when:
        pusher.broadcast_to_group(&group("ride1"), "snapshot").await;

        // then:
        assert_eq!(rx1.recv().await, Some("snapshot".to_string()));
        assert_eq!(rx2.recv().await, Some("snapshot".to_string()));
        assert!(rx3.try_recv().is_err());
        assert!(rx4.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_broadcast_tolerates_closed_recipient() {
        // given: one closed receiver next to a healthy one
        let pusher = WebSocketMessagePusher::new();

        let (tx1, rx1) = mpsc::unbounded_channel();
        let s1 = SessionId::generate();
        pusher.register_session(s1, tx1).await;
        pusher.bind_group(&s1, group("ride1")).await;
        drop(rx1);

        let (tx2, mut rx2) = mpsc::unbounded_channel();
        let s2 = SessionId::generate();
        pusher.register_session(s2, tx2).await;
        pusher.bind_group(&s2, group("ride1")).await;

        // when:
        pusher.broadcast_to_group(&group("ride1"), "snapshot").await;

        // then: the healthy recipient still got the payload
        assert_eq!(rx2.recv().await, Some("snapshot".to_string()));
    }

    #[tokio::test]
    async fn test_rebinding_moves_session_between_groups() {
        // given:
        let pusher = WebSocketMessagePusher::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let session = SessionId::generate();
        pusher.register_session(session, tx).await;
        pusher.bind_group(&session, group("ride1")).await;

        // when:
        pusher.bind_group(&session, group("ride2")).await;
        pusher.broadcast_to_group(&group("ride1"), "old").await;
        pusher.broadcast_to_group(&group("ride2"), "new").await;

        // then:
        assert_eq!(rx.recv().await, Some("new".to_string()));
    }

    #[tokio::test]
    async fn test_unregister_removes_session() {
        // given:
        let pusher = WebSocketMessagePusher::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        let session = SessionId::generate();
        pusher.register_session(session, tx).await;

        // when:
        pusher.unregister_session(&session).await;

        // then:
        assert_eq!(pusher.session_count().await, 0);
        assert!(pusher.push_to(&session, "hello").await.is_err());
    }
}

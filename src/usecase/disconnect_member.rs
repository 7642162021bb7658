//! UseCase: tear down a closed connection.
//!
//! Cleanup covers all three session facts: member state in the registry,
//! the horn cooldown entry and the pusher channel. Viewers and never-bound
//! sessions only need the last one.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::{
    CooldownTracker, GroupName, GroupRegistry, MemberId, MemberState, MessagePusher, SessionId,
};

pub struct DisconnectMemberUseCase {
    registry: Arc<dyn GroupRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
    cooldowns: Arc<Mutex<CooldownTracker>>,
}

impl DisconnectMemberUseCase {
    pub fn new(
        registry: Arc<dyn GroupRegistry>,
        message_pusher: Arc<dyn MessagePusher>,
        cooldowns: Arc<Mutex<CooldownTracker>>,
    ) -> Self {
        Self {
            registry,
            message_pusher,
            cooldowns,
        }
    }

    /// Remove everything the session owned. When the session was a tracked
    /// member, returns the group and its post-removal snapshot (possibly
    /// empty) so the caller can notify remaining connections; viewers get
    /// `None`.
    pub async fn execute(
        &self,
        session: &SessionId,
        membership: Option<(GroupName, MemberId)>,
    ) -> Option<(GroupName, Vec<MemberState>)> {
        self.message_pusher.unregister_session(session).await;

        let (group, member) = membership?;

        self.registry.remove_member(&group, &member).await;
        // Reconnecting members start with a fresh horn window
        self.cooldowns.lock().await.release(&member);

        tracing::info!(
            "Member '{}' disconnected from group '{}' (session '{}')",
            member.as_str(),
            group.as_str(),
            session,
        );

        let snapshot = self.registry.snapshot(&group).await;
        Some((group, snapshot))
    }
}

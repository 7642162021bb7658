//! UseCase: bind a connection to a group as a tracked member.
//!
//! Registration creates the group if absent and tags the session so group
//! broadcasts reach it. The member itself stays invisible to co-members
//! until its first accepted speed sample; registration carries no position.

use std::sync::Arc;

use crate::domain::{
    DisplayName, GroupName, GroupRegistry, MemberId, MemberState, MessagePusher, SessionId,
};

use super::error::RegisterError;

/// Result of a successful registration
#[derive(Debug, Clone, PartialEq)]
pub struct Registration {
    pub group: GroupName,
    pub member: MemberId,
    pub display_name: DisplayName,
    /// Current group snapshot, for the broadcast that announces the join
    pub snapshot: Vec<MemberState>,
}

pub struct RegisterMemberUseCase {
    registry: Arc<dyn GroupRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl RegisterMemberUseCase {
    pub fn new(registry: Arc<dyn GroupRegistry>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            registry,
            message_pusher,
        }
    }

    pub async fn execute(
        &self,
        session: &SessionId,
        user_id: Option<String>,
        user_name: Option<String>,
        group_name: Option<String>,
    ) -> Result<Registration, RegisterError> {
        let member = MemberId::new(user_id.ok_or(RegisterError::MissingMemberId)?)?;
        let display_name = DisplayName::from_optional(user_name);
        let group = GroupName::new_or_default(group_name)?;

        // 1. Create the group if this is its first member
        self.registry.ensure_group(&group).await;

        // 2. Route subsequent group broadcasts to this connection
        self.message_pusher.bind_group(session, group.clone()).await;

        // 3. Snapshot for the join announcement
        let snapshot = self.registry.snapshot(&group).await;

        tracing::info!(
            "Member '{}' registered to group '{}' (session '{}')",
            member.as_str(),
            group.as_str(),
            session,
        );

        Ok(Registration {
            group,
            member,
            display_name,
            snapshot,
        })
    }
}

//! UseCase: bind a connection to a group as a read-only viewer.
//!
//! Viewers receive the same broadcasts as members but never appear in a
//! snapshot, and their join does not create the group.

use std::sync::Arc;

use crate::domain::{GroupName, GroupRegistry, MemberState, MessagePusher, SessionId};

use super::error::JoinError;

pub struct JoinViewerUseCase {
    registry: Arc<dyn GroupRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl JoinViewerUseCase {
    pub fn new(registry: Arc<dyn GroupRegistry>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            registry,
            message_pusher,
        }
    }

    /// Tag the session with the group and return the current snapshot for
    /// the initial `users` reply. An absent group yields an empty snapshot,
    /// not an error, so viewers can watch a group that has not formed yet.
    pub async fn execute(
        &self,
        session: &SessionId,
        group_name: Option<String>,
    ) -> Result<(GroupName, Vec<MemberState>), JoinError> {
        let group = GroupName::new_or_default(group_name)?;

        self.message_pusher.bind_group(session, group.clone()).await;
        let snapshot = self.registry.snapshot(&group).await;

        tracing::info!(
            "Viewer session '{}' joined group '{}' ({} members visible)",
            session,
            group.as_str(),
            snapshot.len(),
        );

        Ok((group, snapshot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::time::FixedClock;
    use crate::domain::MockMessagePusher;
    use crate::infrastructure::InMemoryGroupRegistry;
    use crate::usecase::update_speed::{SpeedSampleInput, UpdateSpeedUseCase};

    fn pusher_expecting_bind() -> Arc<MockMessagePusher> {
        let mut pusher = MockMessagePusher::new();
        pusher.expect_bind_group().times(1).return_const(());
        Arc::new(pusher)
    }

    #[tokio::test]
    async fn test_join_does_not_create_group() {
        // given:
        let registry = Arc::new(InMemoryGroupRegistry::new());
        let usecase = JoinViewerUseCase::new(registry.clone(), pusher_expecting_bind());
        let session = SessionId::generate();

        // when:
        let (group, snapshot) = usecase
            .execute(&session, Some("ride1".to_string()))
            .await
            .unwrap();

        // then:
        assert_eq!(group.as_str(), "ride1");
        assert!(snapshot.is_empty());
        assert!(!registry.group_exists(&group).await);
    }

    #[tokio::test]
    async fn test_join_returns_current_members() {
        // given: alice already tracked in ride1
        let registry = Arc::new(InMemoryGroupRegistry::new());
        let update = UpdateSpeedUseCase::new(registry.clone(), Arc::new(FixedClock::new(1_000)));
        let group = GroupName::new("ride1".to_string()).unwrap();
        update
            .execute(&group, SpeedSampleInput::test_sample("alice", 10.0))
            .await
            .unwrap();

        let usecase = JoinViewerUseCase::new(registry, pusher_expecting_bind());
        let session = SessionId::generate();

        // when:
        let (_, snapshot) = usecase
            .execute(&session, Some("ride1".to_string()))
            .await
            .unwrap();

        // then:
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].member_id.as_str(), "alice");
    }
}

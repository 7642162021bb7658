//! UseCase: broadcast a rate-limited group horn.
//!
//! Exactly one horn per member per cooldown window; the payload is serialized
//! by the caller so this layer never touches wire formats.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::common::time::Clock;
use crate::domain::{CooldownDecision, CooldownTracker, GroupName, GroupRegistry, MemberId, MessagePusher};

use super::error::HornError;

pub struct TriggerHornUseCase {
    registry: Arc<dyn GroupRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
    cooldowns: Arc<Mutex<CooldownTracker>>,
    clock: Arc<dyn Clock>,
    cooldown_ms: i64,
}

impl TriggerHornUseCase {
    pub fn new(
        registry: Arc<dyn GroupRegistry>,
        message_pusher: Arc<dyn MessagePusher>,
        cooldowns: Arc<Mutex<CooldownTracker>>,
        clock: Arc<dyn Clock>,
        cooldown_ms: i64,
    ) -> Self {
        Self {
            registry,
            message_pusher,
            cooldowns,
            clock,
            cooldown_ms,
        }
    }

    pub async fn execute(
        &self,
        group: &GroupName,
        member: &MemberId,
        json_message: String,
    ) -> Result<(), HornError> {
        // 1. Horns target live groups only
        if !self.registry.group_exists(group).await {
            return Err(HornError::UnknownGroup(group.as_str().to_string()));
        }

        // 2. One accepted horn per member per window
        let now = self.clock.now_millis();
        let decision = self
            .cooldowns
            .lock()
            .await
            .try_acquire(member, now, self.cooldown_ms);
        if let CooldownDecision::Throttled { retry_after_secs } = decision {
            return Err(HornError::Throttled { retry_after_secs });
        }

        // 3. Everyone in the group hears it, the caller included
        self.message_pusher
            .broadcast_to_group(group, &json_message)
            .await;

        tracing::info!(
            "Horn from member '{}' broadcast to group '{}'",
            member.as_str(),
            group.as_str(),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::time::FixedClock;
    use crate::domain::MockMessagePusher;
    use crate::infrastructure::InMemoryGroupRegistry;

    fn group(name: &str) -> GroupName {
        GroupName::new(name.to_string()).unwrap()
    }

    fn member(id: &str) -> MemberId {
        MemberId::new(id.to_string()).unwrap()
    }

    fn usecase_with(
        registry: Arc<InMemoryGroupRegistry>,
        pusher: MockMessagePusher,
        now: i64,
    ) -> TriggerHornUseCase {
        TriggerHornUseCase::new(
            registry,
            Arc::new(pusher),
            Arc::new(Mutex::new(CooldownTracker::new())),
            Arc::new(FixedClock::new(now)),
            5_000,
        )
    }

    #[tokio::test]
    async fn test_horn_broadcasts_to_existing_group() {
        // given:
        let registry = Arc::new(InMemoryGroupRegistry::new());
        registry.ensure_group(&group("ride1")).await;

        let mut pusher = MockMessagePusher::new();
        pusher
            .expect_broadcast_to_group()
            .times(1)
            .withf(|g, content| g.as_str() == "ride1" && content.contains("group-horn"))
            .return_const(());

        let usecase = usecase_with(registry, pusher, 10_000);

        // when:
        let result = usecase
            .execute(
                &group("ride1"),
                &member("alice"),
                r#"{"type":"group-horn"}"#.to_string(),
            )
            .await;

        // then:
        assert_eq!(result, Ok(()));
    }

    #[tokio::test]
    async fn test_horn_to_unknown_group_is_rejected_without_broadcast() {
        // given: no groups exist; any broadcast would fail the mock
        let registry = Arc::new(InMemoryGroupRegistry::new());
        let usecase = usecase_with(registry, MockMessagePusher::new(), 10_000);

        // when:
        let result = usecase
            .execute(&group("ghost"), &member("alice"), "{}".to_string())
            .await;

        // then:
        assert_eq!(result, Err(HornError::UnknownGroup("ghost".to_string())));
    }

    #[tokio::test]
    async fn test_second_horn_within_cooldown_is_throttled() {
        // given: one accepted horn at t=10s
        let registry = Arc::new(InMemoryGroupRegistry::new());
        registry.ensure_group(&group("ride1")).await;

        let mut pusher = MockMessagePusher::new();
        pusher.expect_broadcast_to_group().times(1).return_const(());

        let cooldowns = Arc::new(Mutex::new(CooldownTracker::new()));
        let usecase = TriggerHornUseCase::new(
            registry,
            Arc::new(pusher),
            cooldowns,
            Arc::new(FixedClock::new(10_000)),
            5_000,
        );
        usecase
            .execute(&group("ride1"), &member("alice"), "{}".to_string())
            .await
            .unwrap();

        // when: immediate retry at the same instant
        let result = usecase
            .execute(&group("ride1"), &member("alice"), "{}".to_string())
            .await;

        // then: full window remains
        assert_eq!(
            result,
            Err(HornError::Throttled {
                retry_after_secs: 5
            })
        );
    }

    #[tokio::test]
    async fn test_cooldowns_are_per_member() {
        // given: alice has just horned
        let registry = Arc::new(InMemoryGroupRegistry::new());
        registry.ensure_group(&group("ride1")).await;

        let mut pusher = MockMessagePusher::new();
        pusher.expect_broadcast_to_group().times(2).return_const(());

        let usecase = usecase_with(registry, pusher, 10_000);
        usecase
            .execute(&group("ride1"), &member("alice"), "{}".to_string())
            .await
            .unwrap();

        // when:
        let result = usecase
            .execute(&group("ride1"), &member("bob"), "{}".to_string())
            .await;

        // then:
        assert_eq!(result, Ok(()));
    }
}

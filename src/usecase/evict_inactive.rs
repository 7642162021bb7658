//! UseCase: periodic janitor sweeps.
//!
//! Members that stop sending samples without an orderly close are evicted
//! once their last timestamp falls behind the inactivity window; affected
//! groups get a fresh snapshot broadcast so every remaining connection sees
//! the departure. A second, slower sweep bounds the cooldown table.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::common::time::Clock;
use crate::domain::{CooldownTracker, GroupName, GroupRegistry, MemberState};

pub struct EvictInactiveUseCase {
    registry: Arc<dyn GroupRegistry>,
    cooldowns: Arc<Mutex<CooldownTracker>>,
    clock: Arc<dyn Clock>,
    inactivity_timeout_ms: i64,
    cooldown_max_age_ms: i64,
}

impl EvictInactiveUseCase {
    pub fn new(
        registry: Arc<dyn GroupRegistry>,
        cooldowns: Arc<Mutex<CooldownTracker>>,
        clock: Arc<dyn Clock>,
        inactivity_timeout_ms: i64,
        cooldown_max_age_ms: i64,
    ) -> Self {
        Self {
            registry,
            cooldowns,
            clock,
            inactivity_timeout_ms,
            cooldown_max_age_ms,
        }
    }

    /// Evict members whose last sample is older than the inactivity window.
    /// Returns the post-eviction snapshot of each changed group; an empty
    /// snapshot means the group itself was dissolved.
    pub async fn sweep_members(&self) -> Vec<(GroupName, Vec<MemberState>)> {
        let cutoff = self.clock.now_millis() - self.inactivity_timeout_ms;
        let changed = self.registry.evict_inactive(cutoff).await;

        for (group, snapshot) in &changed {
            tracing::info!(
                "Evicted inactive members from group '{}' ({} remaining)",
                group.as_str(),
                snapshot.len(),
            );
        }
        changed
    }

    /// Drop cooldown entries old enough to be useless. Returns the number
    /// of entries removed.
    pub async fn sweep_cooldowns(&self) -> usize {
        let now = self.clock.now_millis();
        let removed = self
            .cooldowns
            .lock()
            .await
            .sweep(now, self.cooldown_max_age_ms);
        if removed > 0 {
            tracing::debug!("Swept {} stale horn cooldown entries", removed);
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::time::FixedClock;
    use crate::domain::MemberId;
    use crate::infrastructure::InMemoryGroupRegistry;
    use crate::usecase::update_speed::{SpeedSampleInput, UpdateSpeedUseCase};

    fn member(id: &str) -> MemberId {
        MemberId::new(id.to_string()).unwrap()
    }

    async fn track_at(registry: &Arc<InMemoryGroupRegistry>, group: &str, id: &str, at: i64) {
        let update = UpdateSpeedUseCase::new(registry.clone(), Arc::new(FixedClock::new(at)));
        let mut input = SpeedSampleInput::test_sample(id, 10.0);
        input.timestamp = Some(at);
        update
            .execute(&GroupName::new(group.to_string()).unwrap(), input)
            .await
            .unwrap();
    }

    fn usecase_at(registry: Arc<InMemoryGroupRegistry>, now: i64) -> EvictInactiveUseCase {
        EvictInactiveUseCase::new(
            registry,
            Arc::new(Mutex::new(CooldownTracker::new())),
            Arc::new(FixedClock::new(now)),
            10_000,
            60_000,
        )
    }

    #[tokio::test]
    async fn test_sweep_evicts_only_stale_members() {
        // given: alice last seen at t=1s, bob at t=8s, now t=12s, window 10s
        let registry = Arc::new(InMemoryGroupRegistry::new());
        track_at(&registry, "ride1", "alice", 1_000).await;
        track_at(&registry, "ride1", "bob", 8_000).await;

        let usecase = usecase_at(registry.clone(), 12_000);

        // when:
        let changed = usecase.sweep_members().await;

        // then: ride1 changed, only bob remains
        assert_eq!(changed.len(), 1);
        let (group, snapshot) = &changed[0];
        assert_eq!(group.as_str(), "ride1");
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].member_id.as_str(), "bob");
    }

    #[tokio::test]
    async fn test_sweep_reports_dissolved_group_with_empty_snapshot() {
        // given: the group's only member is stale
        let registry = Arc::new(InMemoryGroupRegistry::new());
        track_at(&registry, "ride1", "alice", 1_000).await;

        let usecase = usecase_at(registry.clone(), 20_000);

        // when:
        let changed = usecase.sweep_members().await;

        // then:
        assert_eq!(changed.len(), 1);
        assert!(changed[0].1.is_empty());
        assert!(
            !registry
                .group_exists(&GroupName::new("ride1".to_string()).unwrap())
                .await
        );
    }

    #[tokio::test]
    async fn test_sweep_with_nothing_stale_reports_no_changes() {
        // given:
        let registry = Arc::new(InMemoryGroupRegistry::new());
        track_at(&registry, "ride1", "alice", 11_000).await;

        let usecase = usecase_at(registry, 12_000);

        // when:
        let changed = usecase.sweep_members().await;

        // then:
        assert!(changed.is_empty());
    }

    #[tokio::test]
    async fn test_cooldown_sweep_removes_stale_entries() {
        // given:
        let registry = Arc::new(InMemoryGroupRegistry::new());
        let cooldowns = Arc::new(Mutex::new(CooldownTracker::new()));
        cooldowns
            .lock()
            .await
            .try_acquire(&member("alice"), 1_000, 5_000);
        cooldowns
            .lock()
            .await
            .try_acquire(&member("bob"), 70_000, 5_000);

        let usecase = EvictInactiveUseCase::new(
            registry,
            cooldowns.clone(),
            Arc::new(FixedClock::new(80_000)),
            10_000,
            60_000,
        );

        // when:
        let removed = usecase.sweep_cooldowns().await;

        // then:
        assert_eq!(removed, 1);
        assert_eq!(cooldowns.lock().await.len(), 1);
    }
}

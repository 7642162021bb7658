//! UseCase: read-only group queries for the HTTP surface.

use std::sync::Arc;

use crate::domain::{GroupName, GroupRegistry, MemberState, RegistryCounts};

pub struct GroupQueriesUseCase {
    registry: Arc<dyn GroupRegistry>,
}

impl GroupQueriesUseCase {
    pub fn new(registry: Arc<dyn GroupRegistry>) -> Self {
        Self { registry }
    }

    pub async fn counts(&self) -> RegistryCounts {
        self.registry.counts().await
    }

    pub async fn overview(&self) -> Vec<(GroupName, Vec<MemberState>)> {
        self.registry.overview().await
    }

    /// Snapshot of one group, `None` when it does not exist. A live group
    /// without tracked members yields `Some` with an empty list.
    pub async fn group_detail(&self, group: &GroupName) -> Option<Vec<MemberState>> {
        if !self.registry.group_exists(group).await {
            return None;
        }
        Some(self.registry.snapshot(group).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::time::FixedClock;
    use crate::infrastructure::InMemoryGroupRegistry;
    use crate::usecase::update_speed::{SpeedSampleInput, UpdateSpeedUseCase};

    fn group(name: &str) -> GroupName {
        GroupName::new(name.to_string()).unwrap()
    }

    async fn track(registry: &Arc<InMemoryGroupRegistry>, group_name: &str, id: &str) {
        let update = UpdateSpeedUseCase::new(registry.clone(), Arc::new(FixedClock::new(1_000)));
        update
            .execute(&group(group_name), SpeedSampleInput::test_sample(id, 10.0))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_counts_cover_all_groups() {
        // given:
        let registry = Arc::new(InMemoryGroupRegistry::new());
        track(&registry, "ride1", "alice").await;
        track(&registry, "ride1", "bob").await;
        track(&registry, "ride2", "carol").await;

        let usecase = GroupQueriesUseCase::new(registry);

        // when:
        let counts = usecase.counts().await;

        // then:
        assert_eq!(counts.groups, 2);
        assert_eq!(counts.members, 3);
    }

    #[tokio::test]
    async fn test_detail_of_unknown_group_is_none() {
        // given:
        let registry = Arc::new(InMemoryGroupRegistry::new());
        let usecase = GroupQueriesUseCase::new(registry);

        // when:
        let detail = usecase.group_detail(&group("ghost")).await;

        // then:
        assert!(detail.is_none());
    }

    #[tokio::test]
    async fn test_detail_of_empty_registered_group_is_some() {
        // given: a group created by registration, no samples yet
        let registry = Arc::new(InMemoryGroupRegistry::new());
        registry.ensure_group(&group("ride1")).await;

        let usecase = GroupQueriesUseCase::new(registry);

        // when:
        let detail = usecase.group_detail(&group("ride1")).await;

        // then:
        assert_eq!(detail, Some(vec![]));
    }
}

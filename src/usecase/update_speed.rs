//! UseCase: fold one speed/position sample into group state.
//!
//! A rejected sample leaves the member's previous state untouched; the
//! caller reports the error to the sender only and broadcasts nothing.

use std::sync::Arc;

use crate::common::time::Clock;
use crate::domain::{
    DisplayName, GroupName, GroupRegistry, MemberId, MemberState, SpeedSample,
};

use super::error::SpeedUpdateError;

/// Raw sample fields as they arrived on the wire.
///
/// Scalar fields stay optional here; which of them are required is this use
/// case's decision, not the codec's.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeedSampleInput {
    pub member_id: MemberId,
    pub display_name: DisplayName,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub speed: Option<f64>,
    pub max_speed: Option<f64>,
    pub bearing: Option<f64>,
    pub timestamp: Option<i64>,
}

impl SpeedSampleInput {
    /// Minimal valid sample for use case tests.
    #[cfg(test)]
    pub fn test_sample(member_id: &str, speed: f64) -> Self {
        Self {
            member_id: MemberId::new(member_id.to_string()).unwrap(),
            display_name: DisplayName::from_optional(None),
            lat: Some(40.0),
            lon: Some(-3.0),
            speed: Some(speed),
            max_speed: None,
            bearing: None,
            timestamp: None,
        }
    }
}

pub struct UpdateSpeedUseCase {
    registry: Arc<dyn GroupRegistry>,
    clock: Arc<dyn Clock>,
}

impl UpdateSpeedUseCase {
    pub fn new(registry: Arc<dyn GroupRegistry>, clock: Arc<dyn Clock>) -> Self {
        Self { registry, clock }
    }

    /// Validate the sample, merge it with the member's running max and store
    /// the result. Returns the post-update group snapshot for broadcasting.
    pub async fn execute(
        &self,
        group: &GroupName,
        input: SpeedSampleInput,
    ) -> Result<Vec<MemberState>, SpeedUpdateError> {
        let lat = input.lat.ok_or(SpeedUpdateError::MissingField("lat"))?;
        let lon = input.lon.ok_or(SpeedUpdateError::MissingField("lon"))?;
        let speed = input.speed.ok_or(SpeedUpdateError::MissingField("speed"))?;

        let sample = SpeedSample::new(
            input.member_id,
            input.display_name,
            lat,
            lon,
            speed,
            input.max_speed,
            input.bearing,
            input.timestamp,
        )?;

        // 1. Prior running max, if the member already has state
        let prior_max = self
            .registry
            .get_member(group, sample.member_id())
            .await
            .map(|state| state.max_speed);

        // 2. Fold and store
        let state = sample.into_state(prior_max, self.clock.now_millis());
        self.registry.upsert_member(group, state).await;

        // 3. Snapshot for the group broadcast
        Ok(self.registry.snapshot(group).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::time::FixedClock;
    use crate::domain::SampleError;
    use crate::infrastructure::InMemoryGroupRegistry;

    fn group(name: &str) -> GroupName {
        GroupName::new(name.to_string()).unwrap()
    }

    fn usecase_at(now: i64) -> (Arc<InMemoryGroupRegistry>, UpdateSpeedUseCase) {
        let registry = Arc::new(InMemoryGroupRegistry::new());
        let usecase = UpdateSpeedUseCase::new(registry.clone(), Arc::new(FixedClock::new(now)));
        (registry, usecase)
    }

    #[tokio::test]
    async fn test_first_sample_creates_member_state() {
        // given:
        let (_, usecase) = usecase_at(1_000);

        // when:
        let snapshot = usecase
            .execute(&group("ride1"), SpeedSampleInput::test_sample("alice", 10.0))
            .await
            .unwrap();

        // then:
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].speed, 10.0);
        assert_eq!(snapshot[0].max_speed, 10.0);
        assert_eq!(snapshot[0].timestamp, 1_000);
    }

    #[tokio::test]
    async fn test_running_max_survives_slower_samples() {
        // given: samples at 10, 30 then 20 km/h
        let (_, usecase) = usecase_at(1_000);
        let ride = group("ride1");
        for speed in [10.0, 30.0, 20.0] {
            usecase
                .execute(&ride, SpeedSampleInput::test_sample("alice", speed))
                .await
                .unwrap();
        }

        // when:
        let snapshot = usecase
            .execute(&ride, SpeedSampleInput::test_sample("alice", 5.0))
            .await
            .unwrap();

        // then: current speed tracks the sample, max stays at the peak
        assert_eq!(snapshot[0].speed, 5.0);
        assert_eq!(snapshot[0].max_speed, 30.0);
    }

    #[tokio::test]
    async fn test_rejected_sample_keeps_previous_state() {
        // given: alice has valid state
        let (registry, usecase) = usecase_at(1_000);
        let ride = group("ride1");
        usecase
            .execute(&ride, SpeedSampleInput::test_sample("alice", 10.0))
            .await
            .unwrap();

        // when: a sample with latitude 91
        let mut bad = SpeedSampleInput::test_sample("alice", 20.0);
        bad.lat = Some(91.0);
        let result = usecase.execute(&ride, bad).await;

        // then: error surfaced, stored state untouched
        assert_eq!(
            result,
            Err(SpeedUpdateError::InvalidSample(
                SampleError::LatitudeOutOfRange(91.0)
            ))
        );
        let snapshot = registry.snapshot(&ride).await;
        assert_eq!(snapshot[0].speed, 10.0);
    }

    #[tokio::test]
    async fn test_missing_coordinates_are_rejected() {
        // given:
        let (registry, usecase) = usecase_at(1_000);
        let mut input = SpeedSampleInput::test_sample("alice", 10.0);
        input.lon = None;

        // when:
        let result = usecase.execute(&group("ride1"), input).await;

        // then:
        assert_eq!(result, Err(SpeedUpdateError::MissingField("lon")));
        assert_eq!(registry.counts().await.members, 0);
    }

    #[tokio::test]
    async fn test_snapshot_covers_whole_group() {
        // given:
        let (_, usecase) = usecase_at(1_000);
        let ride = group("ride1");
        usecase
            .execute(&ride, SpeedSampleInput::test_sample("alice", 10.0))
            .await
            .unwrap();

        // when:
        let snapshot = usecase
            .execute(&ride, SpeedSampleInput::test_sample("bob", 20.0))
            .await
            .unwrap();

        // then:
        assert_eq!(snapshot.len(), 2);
    }
}

//! Member state entity and speed-sample validation.

use thiserror::Error;

use super::value_object::{DisplayName, MemberId};

/// Plausibility cap for a single speed sample, in km/h. Samples above this
/// are rejected as malformed rather than clamped.
pub const SPEED_CAP_KMH: f64 = 2000.0;

/// Validation errors for inbound speed samples
#[derive(Debug, Error, PartialEq)]
pub enum SampleError {
    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),

    #[error("speed {0} is outside [0, {SPEED_CAP_KMH}]")]
    SpeedOutOfRange(f64),
}

/// Last-known state of a tracked member, as broadcast to its group.
///
/// `max_speed` is the running maximum of accepted samples since the member
/// registered; it is reset by disconnect, not by the janitor snapshot.
/// `max_speed >= speed` is not an invariant the server enforces.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberState {
    pub member_id: MemberId,
    pub display_name: DisplayName,
    pub speed: f64,
    pub max_speed: f64,
    pub lat: f64,
    pub lon: f64,
    pub bearing: f64,
    /// Wall-clock millis of the last accepted sample; drives janitor eviction
    pub timestamp: i64,
}

/// A speed/position sample accepted from the wire after range validation.
///
/// Construction fails on out-of-range coordinates or speed (NaN included).
/// Optional fields keep their raw value here; defaulting happens when the
/// sample is folded into a [`MemberState`].
#[derive(Debug, Clone, PartialEq)]
pub struct SpeedSample {
    member_id: MemberId,
    display_name: DisplayName,
    lat: f64,
    lon: f64,
    speed: f64,
    max_speed: Option<f64>,
    bearing: Option<f64>,
    timestamp: Option<i64>,
}

impl SpeedSample {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        member_id: MemberId,
        display_name: DisplayName,
        lat: f64,
        lon: f64,
        speed: f64,
        max_speed: Option<f64>,
        bearing: Option<f64>,
        timestamp: Option<i64>,
    ) -> Result<Self, SampleError> {
        // contains() is false for NaN, so non-finite input fails the checks
        if !(-90.0..=90.0).contains(&lat) {
            return Err(SampleError::LatitudeOutOfRange(lat));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(SampleError::LongitudeOutOfRange(lon));
        }
        if !(0.0..=SPEED_CAP_KMH).contains(&speed) {
            return Err(SampleError::SpeedOutOfRange(speed));
        }
        Ok(Self {
            member_id,
            display_name,
            lat,
            lon,
            speed,
            max_speed,
            bearing,
            timestamp,
        })
    }

    pub fn member_id(&self) -> &MemberId {
        &self.member_id
    }

    /// Fold the sample into a full member state.
    ///
    /// * `max_speed = max(prior_max, claimed_max_or_speed)`; an out-of-range
    ///   claimed max falls back to the sample speed.
    /// * Bearing outside [0, 360) or absent defaults to 0.
    /// * Non-positive or absent timestamps default to `now_millis`.
    pub fn into_state(self, prior_max: Option<f64>, now_millis: i64) -> MemberState {
        let claimed = self
            .max_speed
            .filter(|m| (0.0..=SPEED_CAP_KMH).contains(m))
            .unwrap_or(self.speed);
        let max_speed = match prior_max {
            Some(prior) => prior.max(claimed),
            None => claimed,
        };
        let bearing = self
            .bearing
            .filter(|b| (0.0..360.0).contains(b))
            .unwrap_or(0.0);
        let timestamp = self.timestamp.filter(|t| *t > 0).unwrap_or(now_millis);

        MemberState {
            member_id: self.member_id,
            display_name: self.display_name,
            speed: self.speed,
            max_speed,
            lat: self.lat,
            lon: self.lon,
            bearing,
            timestamp,
        }
    }
}

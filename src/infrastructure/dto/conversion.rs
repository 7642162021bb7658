//! Conversions between domain models and DTOs.

use crate::common::time::timestamp_to_rfc3339;
use crate::domain::{MemberState, SpeedHistoryRecord, SpeedStats, Waypoint};

use super::http::{SpeedRecordDto, SpeedStatsDto, WaypointDto};
use super::websocket::MemberStateDto;

impl From<MemberState> for MemberStateDto {
    fn from(state: MemberState) -> Self {
        Self {
            user_id: state.member_id.into_string(),
            user_name: state.display_name.into_string(),
            speed: state.speed,
            max_speed: state.max_speed,
            lat: state.lat,
            lon: state.lon,
            bearing: state.bearing,
            timestamp: state.timestamp,
        }
    }
}

impl From<SpeedHistoryRecord> for SpeedRecordDto {
    fn from(record: SpeedHistoryRecord) -> Self {
        let recorded_at = timestamp_to_rfc3339(record.recorded_at);
        Self {
            id: record.id,
            user_id: record.member_id.into_string(),
            user_name: record.display_name,
            group_name: record.group_name.into_string(),
            max_speed: record.max_speed,
            latitude: record.latitude,
            longitude: record.longitude,
            timestamp: record.recorded_at,
            recorded_at,
        }
    }
}

impl From<SpeedStats> for SpeedStatsDto {
    fn from(stats: SpeedStats) -> Self {
        Self {
            total_records: stats.total_records,
            best_speed: stats.best_speed,
            average_speed: stats.average_speed,
        }
    }
}

impl From<Waypoint> for WaypointDto {
    fn from(waypoint: Waypoint) -> Self {
        let created_at = timestamp_to_rfc3339(waypoint.created_at);
        Self {
            id: waypoint.id,
            group_name: waypoint.group_name.into_string(),
            name: waypoint.name,
            description: waypoint.description,
            latitude: waypoint.latitude,
            longitude: waypoint.longitude,
            created_by: waypoint.created_by,
            created_at,
        }
    }
}

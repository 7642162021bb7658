//! HistoryStore trait: durable speed-history and waypoint records.
//!
//! The live relay never depends on this store; it backs the HTTP side
//! channel only. The trait mirrors the CRUD surface of the original
//! relational store; the shipped implementation is in-memory.

use async_trait::async_trait;

use super::error::HistoryStoreError;
use super::value_object::{GroupName, MemberId};

/// A stored max-speed record for one finished tracking session
#[derive(Debug, Clone, PartialEq)]
pub struct SpeedHistoryRecord {
    pub id: u64,
    pub member_id: MemberId,
    pub display_name: String,
    pub group_name: GroupName,
    pub max_speed: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub recorded_at: i64,
}

/// Input for [`HistoryStore::insert_speed_record`]
#[derive(Debug, Clone, PartialEq)]
pub struct NewSpeedRecord {
    pub member_id: MemberId,
    pub display_name: String,
    pub group_name: GroupName,
    pub max_speed: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub recorded_at: i64,
}

/// Aggregate statistics over a member's speed records
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedStats {
    pub total_records: u64,
    pub best_speed: f64,
    pub average_speed: f64,
}

/// A named point of interest shared within a group
#[derive(Debug, Clone, PartialEq)]
pub struct Waypoint {
    pub id: u64,
    pub group_name: GroupName,
    pub name: String,
    pub description: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub created_by: Option<String>,
    pub created_at: i64,
}

/// Input for [`HistoryStore::create_waypoint`]
#[derive(Debug, Clone, PartialEq)]
pub struct NewWaypoint {
    pub group_name: GroupName,
    pub name: String,
    pub description: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub created_by: Option<String>,
    pub created_at: i64,
}

/// Mutable fields of a waypoint
#[derive(Debug, Clone, PartialEq)]
pub struct WaypointUpdate {
    pub name: String,
    pub description: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn insert_speed_record(
        &self,
        record: NewSpeedRecord,
    ) -> Result<SpeedHistoryRecord, HistoryStoreError>;

    /// Records for one member, newest first.
    async fn speed_records_for(
        &self,
        member: &MemberId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<SpeedHistoryRecord>, HistoryStoreError>;

    /// All records, newest first.
    async fn all_speed_records(
        &self,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<SpeedHistoryRecord>, HistoryStoreError>;

    async fn speed_stats_for(&self, member: &MemberId) -> Result<SpeedStats, HistoryStoreError>;

    async fn create_waypoint(&self, waypoint: NewWaypoint) -> Result<Waypoint, HistoryStoreError>;

    async fn waypoints_for_group(
        &self,
        group: &GroupName,
    ) -> Result<Vec<Waypoint>, HistoryStoreError>;

    async fn update_waypoint(
        &self,
        id: u64,
        update: WaypointUpdate,
    ) -> Result<Waypoint, HistoryStoreError>;

    async fn delete_waypoint(&self, id: u64) -> Result<Waypoint, HistoryStoreError>;
}

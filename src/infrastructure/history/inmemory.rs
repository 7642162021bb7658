//! In-memory HistoryStore implementation.
//!
//! Stands in for the relational store of the original deployment. Records
//! live in vectors behind one mutex; ids are handed out from a counter the
//! way an autoincrement column would.

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    GroupName, HistoryStore, HistoryStoreError, MemberId, NewSpeedRecord, NewWaypoint,
    SpeedHistoryRecord, SpeedStats, Waypoint, WaypointUpdate,
};

#[derive(Default)]
struct HistoryTables {
    speed_records: Vec<SpeedHistoryRecord>,
    waypoints: Vec<Waypoint>,
    next_speed_id: u64,
    next_waypoint_id: u64,
}

/// In-memory history store
#[derive(Default)]
pub struct InMemoryHistoryStore {
    tables: Mutex<HistoryTables>,
}

impl InMemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistoryStore {
    async fn insert_speed_record(
        &self,
        record: NewSpeedRecord,
    ) -> Result<SpeedHistoryRecord, HistoryStoreError> {
        let mut tables = self.tables.lock().await;
        tables.next_speed_id += 1;
        let stored = SpeedHistoryRecord {
            id: tables.next_speed_id,
            member_id: record.member_id,
            display_name: record.display_name,
            group_name: record.group_name,
            max_speed: record.max_speed,
            latitude: record.latitude,
            longitude: record.longitude,
            recorded_at: record.recorded_at,
        };
        tables.speed_records.push(stored.clone());
        Ok(stored)
    }

    async fn speed_records_for(
        &self,
        member: &MemberId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<SpeedHistoryRecord>, HistoryStoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .speed_records
            .iter()
            .rev()
            .filter(|r| &r.member_id == member)
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn all_speed_records(
        &self,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<SpeedHistoryRecord>, HistoryStoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .speed_records
            .iter()
            .rev()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn speed_stats_for(&self, member: &MemberId) -> Result<SpeedStats, HistoryStoreError> {
        let tables = self.tables.lock().await;
        let speeds: Vec<f64> = tables
            .speed_records
            .iter()
            .filter(|r| &r.member_id == member)
            .map(|r| r.max_speed)
            .collect();

        if speeds.is_empty() {
            return Ok(SpeedStats {
                total_records: 0,
                best_speed: 0.0,
                average_speed: 0.0,
            });
        }

        let total = speeds.len() as u64;
        let best = speeds.iter().cloned().fold(f64::MIN, f64::max);
        let average = speeds.iter().sum::<f64>() / speeds.len() as f64;
        Ok(SpeedStats {
            total_records: total,
            best_speed: best,
            average_speed: average,
        })
    }

    async fn create_waypoint(&self, waypoint: NewWaypoint) -> Result<Waypoint, HistoryStoreError> {
        let mut tables = self.tables.lock().await;
        tables.next_waypoint_id += 1;
        let stored = Waypoint {
            id: tables.next_waypoint_id,
            group_name: waypoint.group_name,
            name: waypoint.name,
            description: waypoint.description,
            latitude: waypoint.latitude,
            longitude: waypoint.longitude,
            created_by: waypoint.created_by,
            created_at: waypoint.created_at,
        };
        tables.waypoints.push(stored.clone());
        Ok(stored)
    }

    async fn waypoints_for_group(
        &self,
        group: &GroupName,
    ) -> Result<Vec<Waypoint>, HistoryStoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .waypoints
            .iter()
            .filter(|w| &w.group_name == group)
            .cloned()
            .collect())
    }

    async fn update_waypoint(
        &self,
        id: u64,
        update: WaypointUpdate,
    ) -> Result<Waypoint, HistoryStoreError> {
        let mut tables = self.tables.lock().await;
        let waypoint = tables
            .waypoints
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or(HistoryStoreError::WaypointNotFound(id))?;
        waypoint.name = update.name;
        waypoint.description = update.description;
        waypoint.latitude = update.latitude;
        waypoint.longitude = update.longitude;
        Ok(waypoint.clone())
    }

    async fn delete_waypoint(&self, id: u64) -> Result<Waypoint, HistoryStoreError> {
        let mut tables = self.tables.lock().await;
        let index = tables
            .waypoints
            .iter()
            .position(|w| w.id == id)
            .ok_or(HistoryStoreError::WaypointNotFound(id))?;
        Ok(tables.waypoints.remove(index))
    }
}

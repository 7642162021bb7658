//! HTTP API request/response DTOs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::websocket::MemberStateDto;

/// Health/liveness summary
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthDto {
    pub status: String,
    pub total_users: usize,
    pub total_groups: usize,
    pub timestamp: i64,
}

/// One group inside the overview response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupInfoDto {
    pub user_count: usize,
    pub users: Vec<MemberStateDto>,
}

/// `GET /groups` response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupsOverviewDto {
    /// BTreeMap for a stable key order in responses
    pub groups: BTreeMap<String, GroupInfoDto>,
    pub total_groups: usize,
}

/// `GET /groups/{groupName}` response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupDetailDto {
    pub group_name: String,
    pub users: Vec<MemberStateDto>,
    pub count: usize,
}

/// Pagination query parameters for the history endpoints
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageQuery {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

/// `POST /api/speed-history` request body
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSpeedRecordDto {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub group_name: Option<String>,
    #[serde(default)]
    pub max_speed: Option<f64>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub timestamp: Option<i64>,
}

/// A stored speed-history record as returned to clients
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeedRecordDto {
    pub id: u64,
    pub user_id: String,
    pub user_name: String,
    pub group_name: String,
    pub max_speed: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: i64,
    /// RFC 3339 rendering of `timestamp` for human consumers
    pub recorded_at: String,
}

/// `GET /api/speed-history/{userId}/stats` payload
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeedStatsDto {
    pub total_records: u64,
    pub best_speed: f64,
    pub average_speed: f64,
}

/// `POST /api/waypoints` request body
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWaypointDto {
    #[serde(default)]
    pub group_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub created_by: Option<String>,
}

/// `PUT /api/waypoints/{id}` request body
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaypointUpdateDto {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

/// A stored waypoint as returned to clients
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WaypointDto {
    pub id: u64,
    pub group_name: String,
    pub name: String,
    pub description: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub created_by: Option<String>,
    pub created_at: String,
}

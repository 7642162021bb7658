//! HTTP API endpoint handlers.
//!
//! The HTTP surface is read-mostly: live group state comes from the
//! registry, everything under `/api` talks to the history store. Store
//! failures answer with a 5xx and are logged; they never touch the relay.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::{
    domain::{GroupName, HistoryStoreError, MemberId, NewSpeedRecord, NewWaypoint, WaypointUpdate},
    infrastructure::dto::{
        http::{
            GroupDetailDto, GroupInfoDto, GroupsOverviewDto, HealthDto, NewSpeedRecordDto,
            NewWaypointDto, PageQuery, SpeedRecordDto, SpeedStatsDto, WaypointDto,
            WaypointUpdateDto,
        },
        websocket::MemberStateDto,
    },
    ui::state::AppState,
};

const DEFAULT_PAGE_LIMIT: usize = 100;

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthDto> {
    let counts = state.group_queries_usecase.counts().await;
    Json(HealthDto {
        status: "ok".to_string(),
        total_users: counts.members,
        total_groups: counts.groups,
        timestamp: state.clock.now_millis(),
    })
}

/// Get every live group with its members
pub async fn get_groups(State(state): State<Arc<AppState>>) -> Json<GroupsOverviewDto> {
    let overview = state.group_queries_usecase.overview().await;

    let groups: BTreeMap<String, GroupInfoDto> = overview
        .into_iter()
        .map(|(group, members)| {
            (
                group.into_string(),
                GroupInfoDto {
                    user_count: members.len(),
                    users: members.into_iter().map(MemberStateDto::from).collect(),
                },
            )
        })
        .collect();

    let total_groups = groups.len();
    Json(GroupsOverviewDto {
        groups,
        total_groups,
    })
}

/// Get one group's member list
pub async fn get_group_detail(
    State(state): State<Arc<AppState>>,
    Path(group_name): Path<String>,
) -> Result<Json<GroupDetailDto>, StatusCode> {
    let group = GroupName::new(group_name).map_err(|_| StatusCode::BAD_REQUEST)?;

    match state.group_queries_usecase.group_detail(&group).await {
        Some(members) => Ok(Json(GroupDetailDto {
            group_name: group.into_string(),
            count: members.len(),
            users: members.into_iter().map(MemberStateDto::from).collect(),
        })),
        None => Err(StatusCode::NOT_FOUND),
    }
}

/// Record a finished tracking session's max speed
pub async fn create_speed_record(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewSpeedRecordDto>,
) -> Result<(StatusCode, Json<SpeedRecordDto>), StatusCode> {
    let member_id = body
        .user_id
        .and_then(|id| MemberId::new(id).ok())
        .ok_or(StatusCode::BAD_REQUEST)?;
    let group_name =
        GroupName::new_or_default(body.group_name).map_err(|_| StatusCode::BAD_REQUEST)?;
    let max_speed = body.max_speed.ok_or(StatusCode::BAD_REQUEST)?;
    let latitude = body.latitude.ok_or(StatusCode::BAD_REQUEST)?;
    let longitude = body.longitude.ok_or(StatusCode::BAD_REQUEST)?;

    let recorded_at = body.timestamp.ok_or(StatusCode::BAD_REQUEST)?;

    let display_name = body
        .user_name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| member_id.as_str().to_string());

    let record = NewSpeedRecord {
        member_id,
        display_name,
        group_name,
        max_speed,
        latitude,
        longitude,
        recorded_at,
    };

    match state.history_store.insert_speed_record(record).await {
        Ok(stored) => Ok((StatusCode::CREATED, Json(SpeedRecordDto::from(stored)))),
        Err(e) => {
            tracing::error!("Failed to store speed record: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// List all speed records, newest first
pub async fn get_all_speed_records(
    State(state): State<Arc<AppState>>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Vec<SpeedRecordDto>>, StatusCode> {
    let limit = page.limit.unwrap_or(DEFAULT_PAGE_LIMIT);
    let offset = page.offset.unwrap_or(0);

    match state.history_store.all_speed_records(limit, offset).await {
        Ok(records) => Ok(Json(
            records.into_iter().map(SpeedRecordDto::from).collect(),
        )),
        Err(e) => {
            tracing::error!("Failed to list speed records: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// List one member's speed records, newest first
pub async fn get_speed_records(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Vec<SpeedRecordDto>>, StatusCode> {
    let member = MemberId::new(user_id).map_err(|_| StatusCode::BAD_REQUEST)?;
    let limit = page.limit.unwrap_or(DEFAULT_PAGE_LIMIT);
    let offset = page.offset.unwrap_or(0);

    match state
        .history_store
        .speed_records_for(&member, limit, offset)
        .await
    {
        Ok(records) => Ok(Json(
            records.into_iter().map(SpeedRecordDto::from).collect(),
        )),
        Err(e) => {
            tracing::error!("Failed to list speed records: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Aggregate statistics over one member's speed records
pub async fn get_speed_stats(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<SpeedStatsDto>, StatusCode> {
    let member = MemberId::new(user_id).map_err(|_| StatusCode::BAD_REQUEST)?;

    match state.history_store.speed_stats_for(&member).await {
        Ok(stats) => Ok(Json(SpeedStatsDto::from(stats))),
        Err(e) => {
            tracing::error!("Failed to compute speed stats: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Create a shared waypoint
pub async fn create_waypoint(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewWaypointDto>,
) -> Result<(StatusCode, Json<WaypointDto>), StatusCode> {
    let group_name = body
        .group_name
        .and_then(|g| GroupName::new(g).ok())
        .ok_or(StatusCode::BAD_REQUEST)?;
    let name = body
        .name
        .filter(|n| !n.trim().is_empty())
        .ok_or(StatusCode::BAD_REQUEST)?;
    let latitude = body.latitude.ok_or(StatusCode::BAD_REQUEST)?;
    let longitude = body.longitude.ok_or(StatusCode::BAD_REQUEST)?;

    let waypoint = NewWaypoint {
        group_name,
        name,
        description: body.description,
        latitude,
        longitude,
        created_by: body.created_by,
        created_at: state.clock.now_millis(),
    };

    match state.history_store.create_waypoint(waypoint).await {
        Ok(stored) => Ok((StatusCode::CREATED, Json(WaypointDto::from(stored)))),
        Err(e) => {
            tracing::error!("Failed to create waypoint: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// List a group's waypoints. The path key is the group name here; the PUT
/// and DELETE routes on the same path read it as a waypoint id.
pub async fn get_waypoints(
    State(state): State<Arc<AppState>>,
    Path(group_name): Path<String>,
) -> Result<Json<Vec<WaypointDto>>, StatusCode> {
    let group = GroupName::new(group_name).map_err(|_| StatusCode::BAD_REQUEST)?;

    match state.history_store.waypoints_for_group(&group).await {
        Ok(waypoints) => Ok(Json(
            waypoints.into_iter().map(WaypointDto::from).collect(),
        )),
        Err(e) => {
            tracing::error!("Failed to list waypoints: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Update a waypoint by id
pub async fn update_waypoint(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<WaypointUpdateDto>,
) -> Result<Json<WaypointDto>, StatusCode> {
    let id: u64 = id.parse().map_err(|_| StatusCode::BAD_REQUEST)?;
    let name = body
        .name
        .filter(|n| !n.trim().is_empty())
        .ok_or(StatusCode::BAD_REQUEST)?;
    let latitude = body.latitude.ok_or(StatusCode::BAD_REQUEST)?;
    let longitude = body.longitude.ok_or(StatusCode::BAD_REQUEST)?;

    let update = WaypointUpdate {
        name,
        description: body.description,
        latitude,
        longitude,
    };

    match state.history_store.update_waypoint(id, update).await {
        Ok(updated) => Ok(Json(WaypointDto::from(updated))),
        Err(HistoryStoreError::WaypointNotFound(_)) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            tracing::error!("Failed to update waypoint {}: {}", id, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Delete a waypoint by id
pub async fn delete_waypoint(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<WaypointDto>, StatusCode> {
    let id: u64 = id.parse().map_err(|_| StatusCode::BAD_REQUEST)?;

    match state.history_store.delete_waypoint(id).await {
        Ok(deleted) => Ok(Json(WaypointDto::from(deleted))),
        Err(HistoryStoreError::WaypointNotFound(_)) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            tracing::error!("Failed to delete waypoint {}: {}", id, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

//! HTTP and WebSocket endpoint handlers.

mod http;
mod websocket;

pub use http::{
    create_speed_record, create_waypoint, delete_waypoint, get_all_speed_records,
    get_group_detail, get_groups, get_speed_records, get_speed_stats, get_waypoints, health_check,
    update_waypoint,
};
pub use websocket::{broadcast_snapshot, websocket_handler};

//! Shared application state.

use std::sync::Arc;

use crate::common::time::Clock;
use crate::domain::{HistoryStore, MessagePusher};
use crate::usecase::{
    DisconnectMemberUseCase, GroupQueriesUseCase, JoinViewerUseCase, RegisterMemberUseCase,
    TriggerHornUseCase, UpdateSpeedUseCase,
};

/// Shared application state, one instance per server
pub struct AppState {
    pub register_member_usecase: Arc<RegisterMemberUseCase>,
    pub join_viewer_usecase: Arc<JoinViewerUseCase>,
    pub update_speed_usecase: Arc<UpdateSpeedUseCase>,
    pub trigger_horn_usecase: Arc<TriggerHornUseCase>,
    pub disconnect_member_usecase: Arc<DisconnectMemberUseCase>,
    pub group_queries_usecase: Arc<GroupQueriesUseCase>,
    /// MessagePusher (message delivery abstraction)
    pub message_pusher: Arc<dyn MessagePusher>,
    /// HistoryStore (durable storage abstraction, HTTP surface only)
    pub history_store: Arc<dyn HistoryStore>,
    pub clock: Arc<dyn Clock>,
}

//! Server execution logic.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::usecase::EvictInactiveUseCase;

use super::{
    handler::{
        broadcast_snapshot, create_speed_record, create_waypoint, delete_waypoint,
        get_all_speed_records, get_group_detail, get_groups, get_speed_records, get_speed_stats,
        get_waypoints, health_check, update_waypoint, websocket_handler,
    },
    signal::shutdown_signal,
    state::AppState,
};

/// Periods of the background sweep tasks
#[derive(Debug, Clone, Copy)]
pub struct JanitorConfig {
    /// How often stale members are evicted
    pub member_sweep_period_ms: u64,
    /// How often abandoned horn cooldown entries are dropped
    pub cooldown_sweep_period_ms: u64,
}

impl Default for JanitorConfig {
    fn default() -> Self {
        Self {
            member_sweep_period_ms: 5_000,
            cooldown_sweep_period_ms: 60_000,
        }
    }
}

/// WebSocket location relay server
pub struct Server {
    app_state: Arc<AppState>,
    evict_inactive_usecase: Arc<EvictInactiveUseCase>,
    janitor: JanitorConfig,
}

impl Server {
    pub fn new(
        app_state: Arc<AppState>,
        evict_inactive_usecase: Arc<EvictInactiveUseCase>,
        janitor: JanitorConfig,
    ) -> Self {
        Self {
            app_state,
            evict_inactive_usecase,
            janitor,
        }
    }

    /// Run the relay until a shutdown signal arrives.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address
    /// or if there's an error during server execution.
    pub async fn run(
        self,
        host: String,
        port: u16,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let app = Router::new()
            // WebSocket endpoint
            .route("/ws", get(websocket_handler))
            // Live state endpoints
            .route("/health", get(health_check))
            .route("/groups", get(get_groups))
            .route("/groups/{group_name}", get(get_group_detail))
            // History endpoints
            .route(
                "/api/speed-history",
                post(create_speed_record).get(get_all_speed_records),
            )
            .route("/api/speed-history/{user_id}", get(get_speed_records))
            .route("/api/speed-history/{user_id}/stats", get(get_speed_stats))
            .route("/api/waypoints", post(create_waypoint))
            // GET reads the key as a group name, PUT/DELETE as a waypoint id
            .route(
                "/api/waypoints/{key}",
                get(get_waypoints).put(update_waypoint).delete(delete_waypoint),
            )
            .layer(TraceLayer::new_for_http())
            .with_state(self.app_state.clone());

        // Background sweeps run for the whole server lifetime
        let member_sweep = {
            let state = self.app_state.clone();
            let evict = self.evict_inactive_usecase.clone();
            let period = Duration::from_millis(self.janitor.member_sweep_period_ms);
            tokio::spawn(async move {
                let mut ticker = tokio::time::interval(period);
                ticker.tick().await; // the first tick fires immediately
                loop {
                    ticker.tick().await;
                    let changed = evict.sweep_members().await;
                    for (group, snapshot) in changed {
                        broadcast_snapshot(&*state.message_pusher, &group, snapshot).await;
                    }
                }
            })
        };

        let cooldown_sweep = {
            let evict = self.evict_inactive_usecase.clone();
            let period = Duration::from_millis(self.janitor.cooldown_sweep_period_ms);
            tokio::spawn(async move {
                let mut ticker = tokio::time::interval(period);
                ticker.tick().await;
                loop {
                    ticker.tick().await;
                    evict.sweep_cooldowns().await;
                }
            })
        };

        // Bind the server to the host and port
        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        tracing::info!(
            "Location relay server listening on {}",
            listener.local_addr()?
        );
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        member_sweep.abort();
        cooldown_sweep.abort();
        tracing::info!("Server shutdown complete");

        Ok(())
    }
}

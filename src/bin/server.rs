//! Real-time GPS location relay server.
//!
//! Tracks group members' speed/position snapshots over WebSocket, fans each
//! update out to the whole group and evicts members that go quiet.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin server
//! cargo run --bin server -- --host 0.0.0.0 --port 3001
//! ```

use std::sync::Arc;

use clap::Parser;
use tokio::sync::Mutex;

use convoy_relay::{
    common::{logger::setup_logger, time::SystemClock},
    domain::CooldownTracker,
    infrastructure::{InMemoryGroupRegistry, InMemoryHistoryStore, WebSocketMessagePusher},
    ui::{JanitorConfig, Server, state::AppState},
    usecase::{
        DisconnectMemberUseCase, EvictInactiveUseCase, GroupQueriesUseCase, JoinViewerUseCase,
        RegisterMemberUseCase, TriggerHornUseCase, UpdateSpeedUseCase,
    },
};

#[derive(Parser, Debug)]
#[command(name = "server")]
#[command(about = "Real-time GPS location relay server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "3001")]
    port: u16,

    /// Horn cooldown per member, in milliseconds
    #[arg(long, default_value = "5000")]
    horn_cooldown_ms: i64,

    /// Members without a sample for this long are evicted, in milliseconds
    #[arg(long, default_value = "10000")]
    inactivity_timeout_ms: i64,

    /// How often the janitor looks for stale members, in milliseconds
    #[arg(long, default_value = "5000")]
    janitor_period_ms: u64,

    /// How often abandoned horn cooldowns are swept, in milliseconds
    #[arg(long, default_value = "60000")]
    cooldown_sweep_period_ms: u64,

    /// Horn cooldown entries older than this are dropped, in milliseconds
    #[arg(long, default_value = "60000")]
    cooldown_max_age_ms: i64,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Registry, pusher, cooldown tracker, history store, clock
    // 2. UseCases
    // 3. AppState
    // 4. Server

    // 1. Infrastructure
    let registry = Arc::new(InMemoryGroupRegistry::new());
    let message_pusher = Arc::new(WebSocketMessagePusher::new());
    let cooldowns = Arc::new(Mutex::new(CooldownTracker::new()));
    let history_store = Arc::new(InMemoryHistoryStore::new());
    let clock = Arc::new(SystemClock);

    // 2. UseCases
    let register_member_usecase = Arc::new(RegisterMemberUseCase::new(
        registry.clone(),
        message_pusher.clone(),
    ));
    let join_viewer_usecase = Arc::new(JoinViewerUseCase::new(
        registry.clone(),
        message_pusher.clone(),
    ));
    let update_speed_usecase = Arc::new(UpdateSpeedUseCase::new(registry.clone(), clock.clone()));
    let trigger_horn_usecase = Arc::new(TriggerHornUseCase::new(
        registry.clone(),
        message_pusher.clone(),
        cooldowns.clone(),
        clock.clone(),
        args.horn_cooldown_ms,
    ));
    let disconnect_member_usecase = Arc::new(DisconnectMemberUseCase::new(
        registry.clone(),
        message_pusher.clone(),
        cooldowns.clone(),
    ));
    let group_queries_usecase = Arc::new(GroupQueriesUseCase::new(registry.clone()));
    let evict_inactive_usecase = Arc::new(EvictInactiveUseCase::new(
        registry.clone(),
        cooldowns.clone(),
        clock.clone(),
        args.inactivity_timeout_ms,
        args.cooldown_max_age_ms,
    ));

    // 3. AppState
    let app_state = Arc::new(AppState {
        register_member_usecase,
        join_viewer_usecase,
        update_speed_usecase,
        trigger_horn_usecase,
        disconnect_member_usecase,
        group_queries_usecase,
        message_pusher,
        history_store,
        clock,
    });

    // 4. Create and run the server
    let server = Server::new(
        app_state,
        evict_inactive_usecase,
        JanitorConfig {
            member_sweep_period_ms: args.janitor_period_ms,
            cooldown_sweep_period_ms: args.cooldown_sweep_period_ms,
        },
    );
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

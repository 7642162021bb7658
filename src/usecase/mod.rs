//! Use case layer: one struct per operation, each holding only the trait
//! objects it needs. The UI layer owns wire formats; use cases own the
//! ordering of registry, cooldown and pusher effects.

pub mod disconnect_member;
pub mod error;
pub mod evict_inactive;
pub mod group_queries;
pub mod join_viewer;
pub mod register_member;
pub mod trigger_horn;
pub mod update_speed;

pub use disconnect_member::DisconnectMemberUseCase;
pub use error::{HornError, JoinError, RegisterError, SpeedUpdateError};
pub use evict_inactive::EvictInactiveUseCase;
pub use group_queries::GroupQueriesUseCase;
pub use join_viewer::JoinViewerUseCase;
pub use register_member::{RegisterMemberUseCase, Registration};
pub use trigger_horn::TriggerHornUseCase;
pub use update_speed::{SpeedSampleInput, UpdateSpeedUseCase};

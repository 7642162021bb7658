//! Domain layer: validated value objects, member state, cooldown logic and
//! the trait seams the use cases depend on.
//!
//! Concrete implementations of the traits live in the infrastructure layer
//! (dependency inversion): the registry and history store are in-memory
//! stores, the pusher is backed by per-connection WebSocket channels.

mod cooldown;
mod error;
mod history;
mod member;
mod pusher;
mod registry;
mod value_object;

pub use cooldown::{CooldownDecision, CooldownTracker};
pub use error::{HistoryStoreError, MessagePushError};
pub use history::{
    HistoryStore, NewSpeedRecord, NewWaypoint, SpeedHistoryRecord, SpeedStats, Waypoint,
    WaypointUpdate,
};
pub use member::{MemberState, SampleError, SpeedSample, SPEED_CAP_KMH};
pub use pusher::{MessagePusher, PusherChannel, SessionId};
pub use registry::{GroupRegistry, RegistryCounts};
pub use value_object::{DisplayName, GroupName, MemberId, ValueObjectError, MAX_IDENTIFIER_LEN};

#[cfg(test)]
pub use history::MockHistoryStore;
#[cfg(test)]
pub use pusher::MockMessagePusher;
#[cfg(test)]
pub use registry::MockGroupRegistry;

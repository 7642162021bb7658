//! Infrastructure layer: concrete implementations of the domain traits and
//! the DTOs spoken on the wire.

pub mod dto;
pub mod history;
pub mod pusher;
pub mod registry;

pub use history::InMemoryHistoryStore;
pub use pusher::WebSocketMessagePusher;
pub use registry::InMemoryGroupRegistry;

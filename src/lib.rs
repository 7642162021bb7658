//! Real-time location relay library.
//!
//! This library implements the server side of a group-scoped GPS tracker:
//! members push speed/position samples over a WebSocket and receive the
//! latest snapshot of every co-member of their group, with stale-member
//! eviction and a rate-limited group-wide alert ("group horn").

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// shared library
pub mod common;

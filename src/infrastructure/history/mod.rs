//! History store implementations.

mod inmemory;

pub use inmemory::InMemoryHistoryStore;

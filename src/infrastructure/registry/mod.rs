//! Group registry implementations.

mod inmemory;

pub use inmemory::InMemoryGroupRegistry;

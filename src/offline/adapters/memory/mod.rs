//! In-memory offline queue adapter.

mod queue;

pub use queue::InMemoryOfflineQueue;

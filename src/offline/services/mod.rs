//! Service layer for the offline delivery queue.

mod queue;

pub use queue::{OfflineQueue, OfflineQueueError, OfflineQueueResult};

//! Domain model for the offline delivery queue.

mod ids;
mod stanza;

pub use ids::PendingStanzaId;
pub use stanza::{
    DEFAULT_DRAIN_LIMIT, DeleteTarget, EnqueueOutcome, MAX_PENDING_STANZAS_PER_USER,
    PendingStanza, QueuePolicy,
};

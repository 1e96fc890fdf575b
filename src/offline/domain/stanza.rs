//! Queued stanzas and queue policy.

use super::PendingStanzaId;
use chrono::{DateTime, Utc};
use jid::BareJid;
use std::num::NonZeroUsize;

/// Queue length at which new stanzas for a user are dropped.
pub const MAX_PENDING_STANZAS_PER_USER: usize = 1000;

/// Number of stanzas returned by a drain when no limit is given.
pub const DEFAULT_DRAIN_LIMIT: usize = 50;

/// A stanza awaiting delivery to an offline user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingStanza {
    id: PendingStanzaId,
    xml: String,
    created_at: DateTime<Utc>,
}

impl PendingStanza {
    /// Creates a pending stanza with a fresh identifier.
    #[must_use]
    pub fn new(xml: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self::from_parts(PendingStanzaId::new(), xml, created_at)
    }

    /// Reconstructs a pending stanza from stored values.
    #[must_use]
    pub fn from_parts(
        id: PendingStanzaId,
        xml: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            xml: xml.into(),
            created_at,
        }
    }

    /// Returns the identifier.
    #[must_use]
    pub const fn id(&self) -> PendingStanzaId {
        self.id
    }

    /// Returns the serialized stanza.
    #[must_use]
    pub fn xml(&self) -> &str {
        &self.xml
    }

    /// Returns the enqueue timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Result of offering a stanza to a user's queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueOutcome {
    /// The stanza was stored.
    Queued(PendingStanzaId),
    /// The queue was full; the stanza was discarded.
    Dropped,
    /// No account exists for the recipient.
    UnknownUser,
}

impl EnqueueOutcome {
    /// Whether the stanza was stored.
    #[must_use]
    pub const fn is_queued(&self) -> bool {
        matches!(self, Self::Queued(_))
    }
}

/// Selects the stanzas removed by a delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteTarget {
    /// Exactly these stanzas.
    Ids(Vec<PendingStanzaId>),
    /// Every stanza queued for this user.
    User(BareJid),
}

/// Capacity and drain size for a queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueuePolicy {
    capacity: usize,
    drain_limit: NonZeroUsize,
}

impl QueuePolicy {
    /// Creates a policy.
    #[must_use]
    pub const fn new(capacity: usize, drain_limit: NonZeroUsize) -> Self {
        Self {
            capacity,
            drain_limit,
        }
    }

    /// Returns the per-user queue capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the default drain size.
    #[must_use]
    pub const fn drain_limit(&self) -> NonZeroUsize {
        self.drain_limit
    }
}

impl Default for QueuePolicy {
    fn default() -> Self {
        Self::new(
            MAX_PENDING_STANZAS_PER_USER,
            NonZeroUsize::new(DEFAULT_DRAIN_LIMIT).unwrap_or(NonZeroUsize::MIN),
        )
    }
}

//! Repository port for the offline delivery queue.

use crate::offline::domain::{DeleteTarget, EnqueueOutcome, PendingStanza};
use crate::storage::StorageResult;
use async_trait::async_trait;
use jid::BareJid;

/// Persistence contract for per-user stanza queues.
#[async_trait]
pub trait OfflineRepository: Send + Sync {
    /// Stores `stanza` for `jid` unless its queue already holds `capacity`
    /// stanzas.
    ///
    /// Never creates an account: an unknown `jid` yields
    /// [`EnqueueOutcome::UnknownUser`].
    ///
    /// # Errors
    ///
    /// Returns [`crate::storage::StorageError`] when the store fails.
    async fn enqueue(
        &self,
        jid: &BareJid,
        stanza: &PendingStanza,
        capacity: usize,
    ) -> StorageResult<EnqueueOutcome>;

    /// Returns up to `limit` stanzas for `jid`, oldest first, without
    /// removing them.
    ///
    /// # Errors
    ///
    /// Returns [`crate::storage::StorageError`] when the store fails.
    async fn drain(&self, jid: &BareJid, limit: usize) -> StorageResult<Vec<PendingStanza>>;

    /// Removes the selected stanzas, returning how many were removed.
    ///
    /// # Errors
    ///
    /// Returns [`crate::storage::StorageError`] when the store fails.
    async fn delete(&self, target: &DeleteTarget) -> StorageResult<u64>;

    /// Returns the number of stanzas queued for `jid`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::storage::StorageError`] when the store fails.
    async fn pending_count(&self, jid: &BareJid) -> StorageResult<u64>;
}

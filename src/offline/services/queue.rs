//! Offline queue orchestration over raw JIDs and stanza trees.

use crate::address::{InvalidJid, bare, require_bare};
use crate::document::{DocumentError, render};
use crate::offline::{
    domain::{DeleteTarget, EnqueueOutcome, PendingStanza, PendingStanzaId, QueuePolicy},
    ports::OfflineRepository,
};
use crate::storage::StorageError;
use crate::time::stored_now;
use minidom::Element;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, instrument, warn};

/// Service-level errors for offline queue operations.
#[derive(Debug, Error)]
pub enum OfflineQueueError {
    /// A JID argument of a write could not be normalized.
    #[error(transparent)]
    InvalidJid(#[from] InvalidJid),

    /// The stanza could not be serialized for storage.
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// Repository operation failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Result type for offline queue operations.
pub type OfflineQueueResult<T> = Result<T, OfflineQueueError>;

/// Bounded per-user queue of stanzas awaiting delivery.
#[derive(Clone)]
pub struct OfflineQueue<R, C>
where
    R: OfflineRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
    policy: QueuePolicy,
}

impl<R, C> OfflineQueue<R, C>
where
    R: OfflineRepository,
    C: Clock + Send + Sync,
{
    /// Creates a queue with the default [`QueuePolicy`].
    #[must_use]
    pub fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self {
            repository,
            clock,
            policy: QueuePolicy::default(),
        }
    }

    /// Replaces the capacity and drain size.
    #[must_use]
    pub const fn with_policy(mut self, policy: QueuePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Returns the active policy.
    #[must_use]
    pub const fn policy(&self) -> QueuePolicy {
        self.policy
    }

    /// Queues `stanza` for the account `jid`.
    ///
    /// Unknown accounts are left alone and a full queue drops the stanza;
    /// both are reported through the outcome rather than as errors.
    ///
    /// # Errors
    ///
    /// Returns [`OfflineQueueError::InvalidJid`] when `jid` is malformed,
    /// [`OfflineQueueError::Document`] when the stanza cannot be
    /// serialized, or [`OfflineQueueError::Storage`] when persistence fails.
    #[instrument(skip_all, fields(jid = %jid))]
    pub async fn enqueue(&self, jid: &str, stanza: &Element) -> OfflineQueueResult<EnqueueOutcome> {
        let owner = require_bare(jid)?;
        let pending = PendingStanza::new(render(stanza)?, stored_now(&*self.clock));
        let outcome = self
            .repository
            .enqueue(&owner, &pending, self.policy.capacity())
            .await?;
        match outcome {
            EnqueueOutcome::Queued(id) => debug!(stanza = %id, "stanza queued"),
            EnqueueOutcome::Dropped => {
                debug!(capacity = self.policy.capacity(), "queue full, stanza dropped");
            }
            EnqueueOutcome::UnknownUser => debug!("no such account, stanza ignored"),
        }
        Ok(outcome)
    }

    /// Returns the oldest queued stanzas, up to the policy's drain size.
    ///
    /// Nothing is removed; call [`Self::delete`] once they are delivered.
    ///
    /// # Errors
    ///
    /// Returns [`OfflineQueueError::Storage`] when persistence fails.
    pub async fn drain(&self, jid: &str) -> OfflineQueueResult<Vec<PendingStanza>> {
        self.drain_up_to(jid, self.policy.drain_limit().get()).await
    }

    /// Returns up to `limit` of the oldest queued stanzas.
    ///
    /// A malformed JID has nothing queued.
    ///
    /// # Errors
    ///
    /// Returns [`OfflineQueueError::Storage`] when persistence fails.
    #[instrument(skip_all, fields(jid = %jid, limit))]
    pub async fn drain_up_to(
        &self,
        jid: &str,
        limit: usize,
    ) -> OfflineQueueResult<Vec<PendingStanza>> {
        let Some(owner) = bare(jid) else {
            warn!("malformed jid in offline drain");
            return Ok(Vec::new());
        };
        Ok(self.repository.drain(&owner, limit).await?)
    }

    /// Removes exactly the given stanzas.
    ///
    /// # Errors
    ///
    /// Returns [`OfflineQueueError::Storage`] when persistence fails.
    pub async fn delete(&self, ids: &[PendingStanzaId]) -> OfflineQueueResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let removed = self
            .repository
            .delete(&DeleteTarget::Ids(ids.to_vec()))
            .await?;
        debug!(removed, "queued stanzas deleted");
        Ok(removed)
    }

    /// Removes every stanza queued for `jid`.
    ///
    /// # Errors
    ///
    /// Returns [`OfflineQueueError::InvalidJid`] when `jid` is malformed, or
    /// [`OfflineQueueError::Storage`] when persistence fails.
    #[instrument(skip_all, fields(jid = %jid))]
    pub async fn clear(&self, jid: &str) -> OfflineQueueResult<u64> {
        let owner = require_bare(jid)?;
        let removed = self.repository.delete(&DeleteTarget::User(owner)).await?;
        debug!(removed, "offline queue cleared");
        Ok(removed)
    }

    /// Returns the number of stanzas queued for `jid`.
    ///
    /// # Errors
    ///
    /// Returns [`OfflineQueueError::Storage`] when persistence fails.
    pub async fn pending_count(&self, jid: &str) -> OfflineQueueResult<u64> {
        let Some(owner) = bare(jid) else {
            return Ok(0);
        };
        Ok(self.repository.pending_count(&owner).await?)
    }
}

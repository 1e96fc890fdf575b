//! In-memory offline queue for tests and embedded use.

use async_trait::async_trait;
use jid::BareJid;
use std::collections::HashSet;

use crate::offline::{
    domain::{DeleteTarget, EnqueueOutcome, PendingStanza},
    ports::OfflineRepository,
};
use crate::storage::rows::row_count;
use crate::storage::{MemoryStore, StorageResult};

/// Offline queue repository over a [`MemoryStore`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryOfflineQueue {
    store: MemoryStore,
}

impl InMemoryOfflineQueue {
    /// Creates a queue over its own empty store.
    ///
    /// Stanzas are only accepted for accounts present in the store, so this
    /// is mostly useful together with [`Self::with_store`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a queue sharing `store` with other adapters.
    #[must_use]
    pub const fn with_store(store: MemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl OfflineRepository for InMemoryOfflineQueue {
    async fn enqueue(
        &self,
        jid: &BareJid,
        stanza: &PendingStanza,
        capacity: usize,
    ) -> StorageResult<EnqueueOutcome> {
        self.store.write(|tables| {
            let Some(account) = tables.accounts.get_mut(jid) else {
                return Ok(EnqueueOutcome::UnknownUser);
            };
            if account.pending.len() >= capacity {
                return Ok(EnqueueOutcome::Dropped);
            }
            account.pending.push(stanza.clone());
            Ok(EnqueueOutcome::Queued(stanza.id()))
        })
    }

    async fn drain(&self, jid: &BareJid, limit: usize) -> StorageResult<Vec<PendingStanza>> {
        self.store.read(|tables| {
            let mut pending = tables
                .accounts
                .get(jid)
                .map(|account| account.pending.clone())
                .unwrap_or_default();
            pending.sort_by_key(|stanza| (stanza.created_at(), stanza.id()));
            pending.truncate(limit);
            Ok(pending)
        })
    }

    async fn delete(&self, target: &DeleteTarget) -> StorageResult<u64> {
        self.store.write(|tables| {
            let removed = match target {
                DeleteTarget::Ids(ids) => {
                    let doomed: HashSet<_> = ids.iter().copied().collect();
                    let mut count = 0;
                    for account in tables.accounts.values_mut() {
                        let before = account.pending.len();
                        account
                            .pending
                            .retain(|stanza| !doomed.contains(&stanza.id()));
                        count += before - account.pending.len();
                    }
                    count
                }
                DeleteTarget::User(jid) => tables
                    .accounts
                    .get_mut(jid)
                    .map(|account| account.pending.drain(..).count())
                    .unwrap_or_default(),
            };
            Ok(row_count(removed))
        })
    }

    async fn pending_count(&self, jid: &BareJid) -> StorageResult<u64> {
        self.store.read(|tables| {
            Ok(tables
                .accounts
                .get(jid)
                .map_or(0, |account| row_count(account.pending.len())))
        })
    }
}

//! In-memory archive for tests and embedded use.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use jid::BareJid;
use std::num::NonZeroUsize;

use crate::archive::{
    domain::{
        ArchivedMessage, ArchivedMessageId, ChatMessage, Collection, CollectionId, CollectionQuery, ConversationKey,
        MessageQuery, Page, RenewedMessage,
    },
    ports::{ArchiveRepository, RenewalRepository},
};
use crate::storage::memory::MemoryTables;
use crate::storage::rows::row_count;
use crate::storage::{MemoryStore, StorageResult};

/// Archive repository over a [`MemoryStore`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryArchive {
    store: MemoryStore,
}

impl InMemoryArchive {
    /// Creates an archive over its own empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an archive sharing `store` with other adapters.
    #[must_use]
    pub const fn with_store(store: MemoryStore) -> Self {
        Self { store }
    }
}

fn find_collection<'a>(tables: &'a MemoryTables, key: &ConversationKey) -> Option<&'a Collection> {
    tables
        .collections
        .iter()
        .find(|collection| collection.key() == key)
}

fn resolve_collection(
    tables: &mut MemoryTables,
    from: &BareJid,
    with: &BareJid,
    created_at: DateTime<Utc>,
) -> Collection {
    let key = ConversationKey::for_pair(from, with);
    if let Some(existing) = find_collection(tables, &key) {
        return existing.clone();
    }
    let collection = Collection::new(CollectionId::new(), from.clone(), with.clone(), created_at);
    tables.collections.push(collection.clone());
    collection
}

fn into_page<T>(mut rows: Vec<T>, limit: usize) -> Page<T> {
    let total = row_count(rows.len());
    rows.truncate(limit);
    Page::new(rows, total)
}

#[async_trait]
impl ArchiveRepository for InMemoryArchive {
    async fn get_or_create_collection(
        &self,
        from: &BareJid,
        with: &BareJid,
        created_at: DateTime<Utc>,
    ) -> StorageResult<Collection> {
        self.store
            .write(|tables| Ok(resolve_collection(tables, from, with, created_at)))
    }

    async fn append_message(
        &self,
        message: &ChatMessage,
        created_at: DateTime<Utc>,
    ) -> StorageResult<ArchivedMessage> {
        self.store.write(|tables| {
            let collection = resolve_collection(tables, message.from(), message.to(), created_at);
            let archived = ArchivedMessage::new(
                collection.id(),
                message.from().clone(),
                message.body(),
                created_at,
            );
            tables.messages.push(archived.clone());
            Ok(archived)
        })
    }

    async fn find_collections(&self, query: &CollectionQuery) -> StorageResult<Page<Collection>> {
        let pair_key = query
            .with()
            .map(|with| ConversationKey::for_pair(query.jid(), with));
        self.store.read(|tables| {
            let mut rows: Vec<Collection> = tables
                .collections
                .iter()
                .filter(|collection| match &pair_key {
                    Some(key) => collection.key() == key,
                    None => collection.involves(query.jid()),
                })
                .filter(|collection| query.range().contains(collection.created_at()))
                .cloned()
                .collect();
            rows.sort_by_key(|collection| (collection.created_at(), collection.id()));
            Ok(into_page(rows, query.limit()))
        })
    }

    async fn find_messages(&self, query: &MessageQuery) -> StorageResult<Page<ArchivedMessage>> {
        let key = ConversationKey::for_pair(query.jid(), query.with());
        self.store.read(|tables| {
            let Some(collection) = find_collection(tables, &key) else {
                return Ok(Page::empty());
            };
            let mut rows: Vec<ArchivedMessage> = tables
                .messages
                .iter()
                .filter(|message| message.collection_id() == collection.id())
                .filter(|message| query.range().contains(message.created_at()))
                .cloned()
                .collect();
            rows.sort_by_key(|message| (message.created_at(), message.id()));
            Ok(into_page(rows, query.limit()))
        })
    }
}

/// Next keyset batch of renewed messages for `jid` after `cursor`, by id.
fn renewed_batch(
    tables: &MemoryTables,
    jid: &BareJid,
    cursor: Option<ArchivedMessageId>,
    batch_size: NonZeroUsize,
) -> Vec<(ArchivedMessageId, RenewedMessage)> {
    let mut candidates: Vec<_> = tables
        .messages
        .iter()
        .filter(|message| cursor.is_none_or(|after| message.id() > after))
        .filter(|message| message.renew_needed() && message.sender() != jid)
        .filter_map(|message| {
            tables
                .collections
                .iter()
                .find(|collection| collection.id() == message.collection_id())
                .filter(|collection| collection.involves(jid))
                .map(|collection| (message, collection))
        })
        .collect();
    candidates.sort_by_key(|(message, _)| message.id());
    candidates.truncate(batch_size.get());
    candidates
        .into_iter()
        .map(|(message, collection)| {
            (
                message.id(),
                RenewedMessage {
                    from: collection.peer_of(jid).clone(),
                    to: jid.clone(),
                    body: message.body().to_owned(),
                },
            )
        })
        .collect()
}

#[async_trait]
impl RenewalRepository for InMemoryArchive {
    fn fetch_renewed(
        &self,
        jid: &BareJid,
        batch_size: NonZeroUsize,
        visit: &mut dyn FnMut(RenewedMessage),
    ) -> StorageResult<u64> {
        let mut cursor = None;
        let mut visited = 0;
        loop {
            let batch = self
                .store
                .read(|tables| Ok(renewed_batch(tables, jid, cursor, batch_size)))?;
            let exhausted = batch.len() < batch_size.get();
            for (id, message) in batch {
                cursor = Some(id);
                visit(message);
                visited += 1;
            }
            if exhausted {
                return Ok(visited);
            }
        }
    }

    async fn unmark_renewed(&self, jid: &BareJid, with: &BareJid) -> StorageResult<u64> {
        let key = ConversationKey::for_pair(jid, with);
        self.store.write(|tables| {
            let Some(collection_id) = find_collection(tables, &key).map(Collection::id) else {
                return Ok(0);
            };
            let mut updated = 0;
            for message in tables.messages.iter_mut().filter(|message| {
                message.collection_id() == collection_id
                    && message.sender() != jid
                    && message.renew_needed()
            }) {
                message.clear_renewal();
                updated += 1;
            }
            Ok(updated)
        })
    }
}

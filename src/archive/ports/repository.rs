//! Repository ports for the conversation archive.

use crate::archive::domain::{
    ArchivedMessage, ChatMessage, Collection, CollectionQuery, MessageQuery, Page, RenewedMessage,
};
use crate::storage::StorageResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use jid::BareJid;
use std::num::NonZeroUsize;

/// Persistence contract for collections and their messages.
#[async_trait]
pub trait ArchiveRepository: Send + Sync {
    /// Returns the collection for the unordered pair, creating it when absent.
    ///
    /// A new collection records `from` as `jid_from` and `with` as
    /// `jid_with`. When a concurrent caller creates the same collection
    /// first, its row is returned instead.
    ///
    /// # Errors
    ///
    /// Returns [`crate::storage::StorageError`] when the store fails, or
    /// `Integrity` when an insert conflicts on something other than the
    /// conversation key.
    async fn get_or_create_collection(
        &self,
        from: &BareJid,
        with: &BareJid,
        created_at: DateTime<Utc>,
    ) -> StorageResult<Collection>;

    /// Appends a message to its conversation, creating the collection on
    /// first contact. Resolution and insert share one connection.
    ///
    /// # Errors
    ///
    /// Returns [`crate::storage::StorageError`] when the store fails.
    async fn append_message(
        &self,
        message: &ChatMessage,
        created_at: DateTime<Utc>,
    ) -> StorageResult<ArchivedMessage>;

    /// Lists collections in ascending `created_at` order.
    ///
    /// # Errors
    ///
    /// Returns [`crate::storage::StorageError`] when the store fails.
    async fn find_collections(&self, query: &CollectionQuery) -> StorageResult<Page<Collection>>;

    /// Lists one conversation's messages in ascending `created_at` order.
    ///
    /// An unknown conversation yields an empty page.
    ///
    /// # Errors
    ///
    /// Returns [`crate::storage::StorageError`] when the store fails.
    async fn find_messages(&self, query: &MessageQuery) -> StorageResult<Page<ArchivedMessage>>;
}

/// Persistence contract for the resynchronization flag.
#[async_trait]
pub trait RenewalRepository: Send + Sync {
    /// Visits every flagged message sent to `jid` by the other side of one
    /// of its conversations.
    ///
    /// Rows are read in pages of `batch_size`, ordered by message id, on the
    /// calling thread. Returns the number of visited messages.
    ///
    /// # Errors
    ///
    /// Returns [`crate::storage::StorageError`] when the store fails. Rows
    /// visited before the failure stay visited.
    fn fetch_renewed(
        &self,
        jid: &BareJid,
        batch_size: NonZeroUsize,
        visit: &mut dyn FnMut(RenewedMessage),
    ) -> StorageResult<u64>;

    /// Clears the flag on messages that `with` sent to `jid`.
    ///
    /// Messages authored by `jid` keep their flag. Returns the number of
    /// rows updated.
    ///
    /// # Errors
    ///
    /// Returns [`crate::storage::StorageError`] when the store fails.
    async fn unmark_renewed(&self, jid: &BareJid, with: &BareJid) -> StorageResult<u64>;
}

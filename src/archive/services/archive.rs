//! Archive orchestration over raw stanza and JID input.

use crate::address::{InvalidJid, bare, require_bare};
use crate::archive::{
    domain::{
        ArchivedMessage, ChatMessage, Collection, CollectionQuery, MessageQuery, Page,
        StanzaError, TimeRange,
    },
    ports::ArchiveRepository,
};
use crate::storage::StorageError;
use crate::time::stored_now;
use chrono::{DateTime, Utc};
use minidom::Element;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, instrument, warn};

/// Service-level errors for archive operations.
#[derive(Debug, Error)]
pub enum ArchiveServiceError {
    /// The stanza lacks usable addressing.
    #[error(transparent)]
    Stanza(#[from] StanzaError),

    /// A JID argument of a write could not be normalized.
    #[error(transparent)]
    InvalidJid(#[from] InvalidJid),

    /// Repository operation failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Result type for archive service operations.
pub type ArchiveServiceResult<T> = Result<T, ArchiveServiceError>;

/// Appends to and reads from the conversation archive.
#[derive(Clone)]
pub struct ArchiveService<R, C>
where
    R: ArchiveRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> ArchiveService<R, C>
where
    R: ArchiveRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new archive service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Archives a message stanza.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveServiceError::Stanza`] when `from` or `to` is missing
    /// or malformed, or [`ArchiveServiceError::Storage`] when persistence
    /// fails.
    pub async fn append_message(&self, stanza: &Element) -> ArchiveServiceResult<ArchivedMessage> {
        let message = ChatMessage::from_stanza(stanza)?;
        self.append(&message).await
    }

    /// Archives an already extracted chat message, stamped with the current
    /// time.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveServiceError::Storage`] when persistence fails.
    #[instrument(skip_all, fields(from = %message.from(), to = %message.to()))]
    pub async fn append(&self, message: &ChatMessage) -> ArchiveServiceResult<ArchivedMessage> {
        let archived = self
            .repository
            .append_message(message, stored_now(&*self.clock))
            .await?;
        debug!(message = %archived.id(), collection = %archived.collection_id(), "message archived");
        Ok(archived)
    }

    /// Returns the collection shared by two JIDs, creating it when absent.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveServiceError::InvalidJid`] when either JID is
    /// malformed, or [`ArchiveServiceError::Storage`] when persistence fails.
    pub async fn get_or_create_collection(
        &self,
        from: &str,
        with: &str,
    ) -> ArchiveServiceResult<Collection> {
        let from_jid = require_bare(from)?;
        let with_jid = require_bare(with)?;
        Ok(self
            .repository
            .get_or_create_collection(&from_jid, &with_jid, stored_now(&*self.clock))
            .await?)
    }

    /// Lists the collections `jid` takes part in, optionally only the one
    /// shared with `with`, ascending by creation time.
    ///
    /// Malformed JIDs match nothing.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveServiceError::Storage`] when persistence fails.
    #[instrument(skip_all, fields(jid = %jid, with = ?with))]
    pub async fn find_collections(
        &self,
        jid: &str,
        with: Option<&str>,
        range: TimeRange,
        limit: usize,
    ) -> ArchiveServiceResult<Page<Collection>> {
        let Some(owner) = bare(jid) else {
            warn!("malformed jid in collection lookup");
            return Ok(Page::empty());
        };
        let mut query = CollectionQuery::new(owner).with_limit(limit);
        if let Some(raw_with) = with {
            let Some(peer) = bare(raw_with) else {
                warn!("malformed peer jid in collection lookup");
                return Ok(Page::empty());
            };
            query = query.with_peer(peer);
        }
        if let Some(start) = range.start() {
            query = query.starting_at(start);
        }
        if let Some(end) = range.end() {
            query = query.ending_at(end);
        }
        Ok(self.repository.find_collections(&query).await?)
    }

    /// Lists messages exchanged between `jid` and `with` from `start`
    /// onwards, ascending by creation time.
    ///
    /// Malformed JIDs and unknown conversations yield an empty page.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveServiceError::Storage`] when persistence fails.
    #[instrument(skip_all, fields(jid = %jid, with = %with))]
    pub async fn find_messages(
        &self,
        jid: &str,
        with: &str,
        start: DateTime<Utc>,
        end: Option<DateTime<Utc>>,
        limit: usize,
    ) -> ArchiveServiceResult<Page<ArchivedMessage>> {
        let (Some(owner), Some(peer)) = (bare(jid), bare(with)) else {
            warn!("malformed jid in message lookup");
            return Ok(Page::empty());
        };
        let mut query = MessageQuery::new(owner, peer, start).with_limit(limit);
        if let Some(upper) = end {
            query = query.ending_at(upper);
        }
        Ok(self.repository.find_messages(&query).await?)
    }
}

//! Resynchronization of messages a peer has not yet seen.
//!
//! Every archived message starts flagged for renewal. When a user
//! reconnects, [`RenewalTracker::fetch_renewed`] replays the flagged
//! messages the other side sent to them, and once delivery is confirmed
//! [`RenewalTracker::unmark_renewed`] clears the flags for one peer.

use super::ArchiveServiceResult;
use crate::address::{bare, require_bare};
use crate::archive::{domain::RenewedMessage, ports::RenewalRepository};
use std::num::NonZeroUsize;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Rows fetched per renewal query when no batch size is configured.
pub const DEFAULT_RENEWAL_BATCH_SIZE: NonZeroUsize = match NonZeroUsize::new(50) {
    Some(size) => size,
    None => NonZeroUsize::MIN,
};

/// Streams and clears renewal flags.
#[derive(Clone)]
pub struct RenewalTracker<R>
where
    R: RenewalRepository,
{
    repository: Arc<R>,
    batch_size: NonZeroUsize,
}

impl<R> RenewalTracker<R>
where
    R: RenewalRepository,
{
    /// Creates a tracker using [`DEFAULT_RENEWAL_BATCH_SIZE`].
    #[must_use]
    pub const fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            batch_size: DEFAULT_RENEWAL_BATCH_SIZE,
        }
    }

    /// Sets the number of rows read per query.
    #[must_use]
    pub const fn with_batch_size(mut self, batch_size: NonZeroUsize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Visits every flagged message addressed to `jid` by the other side of
    /// one of its conversations. Blocks the calling thread.
    ///
    /// A malformed JID visits nothing. Returns the number of visited
    /// messages.
    ///
    /// # Errors
    ///
    /// Returns [`super::ArchiveServiceError::Storage`] when persistence
    /// fails.
    #[instrument(skip_all, fields(jid = %jid))]
    pub fn fetch_renewed(
        &self,
        jid: &str,
        mut visit: impl FnMut(RenewedMessage),
    ) -> ArchiveServiceResult<u64> {
        let Some(owner) = bare(jid) else {
            warn!("malformed jid in renewal fetch");
            return Ok(0);
        };
        let visited = self
            .repository
            .fetch_renewed(&owner, self.batch_size, &mut visit)?;
        debug!(visited, "renewal fetch complete");
        Ok(visited)
    }

    /// Clears the flag on every message `with` sent to `jid`.
    ///
    /// Messages authored by `jid` stay flagged. Returns the number of rows
    /// updated.
    ///
    /// # Errors
    ///
    /// Returns [`super::ArchiveServiceError::InvalidJid`] when either JID is
    /// malformed, or [`super::ArchiveServiceError::Storage`] when
    /// persistence fails.
    #[instrument(skip_all, fields(jid = %jid, with = %with))]
    pub async fn unmark_renewed(&self, jid: &str, with: &str) -> ArchiveServiceResult<u64> {
        let owner = require_bare(jid)?;
        let peer = require_bare(with)?;
        let updated = self.repository.unmark_renewed(&owner, &peer).await?;
        debug!(updated, "renewal flags cleared");
        Ok(updated)
    }
}

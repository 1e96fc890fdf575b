//! Account orchestration over raw JIDs and XML documents.

use crate::account::{
    domain::{Fragment, RosterChanges, User},
    ports::{FragmentRepository, UserRepository},
};
use crate::address::{InvalidJid, bare, require_bare};
use crate::document::{DocumentError, parse, render};
use crate::storage::StorageError;
use minidom::Element;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, instrument, warn};

/// Service-level errors for account operations.
#[derive(Debug, Error)]
pub enum AccountError {
    /// A JID argument of a write could not be normalized.
    #[error(transparent)]
    InvalidJid(#[from] InvalidJid),

    /// A document could not be serialized for storage.
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// Repository operation failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Result type for account operations.
pub type AccountResult<T> = Result<T, AccountError>;

/// Account, roster and private document access.
#[derive(Clone)]
pub struct AccountService<U, F>
where
    U: UserRepository,
    F: FragmentRepository,
{
    users: Arc<U>,
    fragments: Arc<F>,
}

impl<U, F> AccountService<U, F>
where
    U: UserRepository,
    F: FragmentRepository,
{
    /// Creates a new account service.
    #[must_use]
    pub const fn new(users: Arc<U>, fragments: Arc<F>) -> Self {
        Self { users, fragments }
    }

    /// Loads an account with its roster.
    ///
    /// Malformed or empty JIDs are reported as absent.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::Storage`] when persistence fails.
    #[instrument(skip_all, fields(jid = %jid))]
    pub async fn find_user(&self, jid: &str) -> AccountResult<Option<User>> {
        let Some(owner) = bare(jid) else {
            warn!("malformed jid in user lookup");
            return Ok(None);
        };
        Ok(self.users.find_user(&owner).await?)
    }

    /// Whether an account exists. Malformed JIDs never exist.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::Storage`] when persistence fails.
    pub async fn user_exists(&self, jid: &str) -> AccountResult<bool> {
        let Some(owner) = bare(jid) else {
            return Ok(false);
        };
        Ok(self.users.user_exists(&owner).await?)
    }

    /// Creates or overwrites an account and merges its roster.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::Storage`] when persistence fails.
    #[instrument(skip_all, fields(jid = %user.jid()))]
    pub async fn save_user(&self, user: &User) -> AccountResult<RosterChanges> {
        let changes = self.users.save_user(user).await?;
        debug!(
            removed = changes.removed,
            updated = changes.updated,
            inserted = changes.inserted,
            "user saved"
        );
        Ok(changes)
    }

    /// Removes an account and everything it owns.
    ///
    /// Returns `false` when no such account exists.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::InvalidJid`] when `jid` is malformed, or
    /// [`AccountError::Storage`] when persistence fails.
    #[instrument(skip_all, fields(jid = %jid))]
    pub async fn delete_user(&self, jid: &str) -> AccountResult<bool> {
        let owner = require_bare(jid)?;
        let deleted = self.users.delete_user(&owner).await?;
        debug!(deleted, "user removal finished");
        Ok(deleted)
    }

    /// Returns the account's vCard.
    ///
    /// Malformed JIDs and unparseable stored documents read as absent.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::Storage`] when persistence fails.
    #[instrument(skip_all, fields(jid = %jid))]
    pub async fn find_vcard(&self, jid: &str) -> AccountResult<Option<Element>> {
        let Some(owner) = bare(jid) else {
            warn!("malformed jid in vcard lookup");
            return Ok(None);
        };
        let stored = self.fragments.find_vcard(&owner).await?;
        Ok(stored.as_deref().and_then(parse_stored))
    }

    /// Replaces the account's vCard. Returns `false` for an unknown account.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::InvalidJid`] when `jid` is malformed,
    /// [`AccountError::Document`] when the card cannot be serialized, or
    /// [`AccountError::Storage`] when persistence fails.
    #[instrument(skip_all, fields(jid = %jid))]
    pub async fn save_vcard(&self, jid: &str, card: &Element) -> AccountResult<bool> {
        let owner = require_bare(jid)?;
        let xml = render(card)?;
        Ok(self.fragments.save_vcard(&owner, &xml).await?)
    }

    /// Returns the private fragment stored under `root` and `namespace`.
    ///
    /// Malformed JIDs and unparseable stored documents read as absent.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::Storage`] when persistence fails.
    #[instrument(skip_all, fields(jid = %jid, root, namespace))]
    pub async fn find_fragment(
        &self,
        jid: &str,
        root: &str,
        namespace: &str,
    ) -> AccountResult<Option<Element>> {
        let Some(owner) = bare(jid) else {
            warn!("malformed jid in fragment lookup");
            return Ok(None);
        };
        let stored = self.fragments.find_fragment(&owner, root, namespace).await?;
        Ok(stored.as_ref().map(Fragment::xml).and_then(parse_stored))
    }

    /// Stores `element` as a private fragment keyed by its name and
    /// namespace, replacing any previous one. Returns `false` for an
    /// unknown account.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::InvalidJid`] when `jid` is malformed,
    /// [`AccountError::Document`] when the element cannot be serialized, or
    /// [`AccountError::Storage`] when persistence fails.
    #[instrument(skip_all, fields(jid = %jid, root = %element.name()))]
    pub async fn save_fragment(&self, jid: &str, element: &Element) -> AccountResult<bool> {
        let owner = require_bare(jid)?;
        let fragment = Fragment::new(element.name(), element.ns(), render(element)?);
        Ok(self.fragments.save_fragment(&owner, &fragment).await?)
    }
}

fn parse_stored(xml: &str) -> Option<Element> {
    parse(xml)
        .inspect_err(|err| warn!(error = %err, "stored document is unreadable"))
        .ok()
}

//! Repository ports for accounts, rosters and private documents.

use crate::account::domain::{Fragment, RosterChanges, User};
use crate::storage::StorageResult;
use async_trait::async_trait;
use jid::BareJid;

/// Persistence contract for accounts and their rosters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Loads an account with its roster, ordered by contact JID.
    ///
    /// # Errors
    ///
    /// Returns [`crate::storage::StorageError`] when the store fails.
    async fn find_user(&self, jid: &BareJid) -> StorageResult<Option<User>>;

    /// Whether an account exists for `jid`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::storage::StorageError`] when the store fails.
    async fn user_exists(&self, jid: &BareJid) -> StorageResult<bool>;

    /// Creates or overwrites the account and merges its roster.
    ///
    /// Name and password are overwritten. The roster is merged through
    /// [`crate::account::domain::RosterDiff`] in one transaction.
    ///
    /// # Errors
    ///
    /// Returns [`crate::storage::StorageError`] when the store fails; no
    /// partial roster change is kept in that case.
    async fn save_user(&self, user: &User) -> StorageResult<RosterChanges>;

    /// Removes the account with its contacts, fragments and queued stanzas.
    ///
    /// Returns `false` when no account exists for `jid`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::storage::StorageError`] when the store fails.
    async fn delete_user(&self, jid: &BareJid) -> StorageResult<bool>;
}

/// Persistence contract for vCards and private extension fragments.
#[async_trait]
pub trait FragmentRepository: Send + Sync {
    /// Returns the stored vCard document.
    ///
    /// # Errors
    ///
    /// Returns [`crate::storage::StorageError`] when the store fails.
    async fn find_vcard(&self, jid: &BareJid) -> StorageResult<Option<String>>;

    /// Replaces the vCard document. Returns `false` for an unknown account.
    ///
    /// # Errors
    ///
    /// Returns [`crate::storage::StorageError`] when the store fails.
    async fn save_vcard(&self, jid: &BareJid, xml: &str) -> StorageResult<bool>;

    /// Returns the fragment stored under `root` and `namespace`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::storage::StorageError`] when the store fails.
    async fn find_fragment(
        &self,
        jid: &BareJid,
        root: &str,
        namespace: &str,
    ) -> StorageResult<Option<Fragment>>;

    /// Creates or replaces a fragment. Returns `false` for an unknown
    /// account.
    ///
    /// # Errors
    ///
    /// Returns [`crate::storage::StorageError`] when the store fails.
    async fn save_fragment(&self, jid: &BareJid, fragment: &Fragment) -> StorageResult<bool>;
}

//! Shared in-memory tables backing the `memory` adapters.
//!
//! The archive, offline and account adapters each wrap one [`MemoryStore`].
//! Handing the same store to all three gives them one data set, so removing
//! an account also discards its queued stanzas, as the relational schema
//! does through cascading foreign keys.

use crate::account::domain::User;
use crate::archive::domain::{ArchivedMessage, Collection};
use crate::offline::domain::PendingStanza;
use jid::BareJid;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

use super::error::{StorageError, StorageResult};

/// Thread-safe in-memory data set.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<MemoryTables>>,
}

/// Rows held by a [`MemoryStore`].
#[derive(Debug, Default)]
pub(crate) struct MemoryTables {
    pub(crate) accounts: HashMap<BareJid, AccountRecord>,
    pub(crate) collections: Vec<Collection>,
    pub(crate) messages: Vec<ArchivedMessage>,
}

/// An account and everything that cascades with it.
#[derive(Debug, Clone)]
pub(crate) struct AccountRecord {
    pub(crate) user: User,
    pub(crate) vcard: Option<String>,
    pub(crate) fragments: BTreeMap<(String, String), String>,
    pub(crate) pending: Vec<PendingStanza>,
}

impl AccountRecord {
    pub(crate) const fn new(user: User) -> Self {
        Self {
            user,
            vcard: None,
            fragments: BTreeMap::new(),
            pending: Vec::new(),
        }
    }
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn read<T>(
        &self,
        f: impl FnOnce(&MemoryTables) -> StorageResult<T>,
    ) -> StorageResult<T> {
        let tables = self
            .tables
            .read()
            .map_err(|err| StorageError::connection(err.to_string()))?;
        f(&tables)
    }

    pub(crate) fn write<T>(
        &self,
        f: impl FnOnce(&mut MemoryTables) -> StorageResult<T>,
    ) -> StorageResult<T> {
        let mut tables = self
            .tables
            .write()
            .map_err(|err| StorageError::connection(err.to_string()))?;
        f(&mut tables)
    }
}

//! In-memory accounts for tests and embedded use.

use async_trait::async_trait;
use jid::BareJid;

use crate::account::{
    domain::{Contact, Fragment, RosterChanges, RosterDiff, User},
    ports::{FragmentRepository, UserRepository},
};
use crate::storage::memory::AccountRecord;
use crate::storage::{MemoryStore, StorageResult};

/// Account repository over a [`MemoryStore`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryAccounts {
    store: MemoryStore,
}

impl InMemoryAccounts {
    /// Creates a repository over its own empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository sharing `store` with other adapters.
    #[must_use]
    pub const fn with_store(store: MemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl UserRepository for InMemoryAccounts {
    async fn find_user(&self, jid: &BareJid) -> StorageResult<Option<User>> {
        self.store
            .read(|tables| Ok(tables.accounts.get(jid).map(|record| record.user.clone())))
    }

    async fn user_exists(&self, jid: &BareJid) -> StorageResult<bool> {
        self.store
            .read(|tables| Ok(tables.accounts.contains_key(jid)))
    }

    async fn save_user(&self, user: &User) -> StorageResult<RosterChanges> {
        self.store.write(|tables| {
            let record = tables
                .accounts
                .entry(user.jid().clone())
                .or_insert_with(|| AccountRecord::new(User::new(user.jid().clone())));
            let diff = RosterDiff::between(record.user.roster(), user.roster());
            let mut roster: Vec<Contact> = diff
                .updated()
                .iter()
                .chain(diff.inserted())
                .cloned()
                .collect();
            roster.sort_by(|left, right| left.jid().cmp(right.jid()));
            record.user = user.clone().with_roster(roster);
            Ok(diff.changes())
        })
    }

    async fn delete_user(&self, jid: &BareJid) -> StorageResult<bool> {
        self.store
            .write(|tables| Ok(tables.accounts.remove(jid).is_some()))
    }
}

#[async_trait]
impl FragmentRepository for InMemoryAccounts {
    async fn find_vcard(&self, jid: &BareJid) -> StorageResult<Option<String>> {
        self.store.read(|tables| {
            Ok(tables
                .accounts
                .get(jid)
                .and_then(|record| record.vcard.clone()))
        })
    }

    async fn save_vcard(&self, jid: &BareJid, xml: &str) -> StorageResult<bool> {
        self.store.write(|tables| {
            Ok(tables.accounts.get_mut(jid).is_some_and(|record| {
                record.vcard = Some(xml.to_owned());
                true
            }))
        })
    }

    async fn find_fragment(
        &self,
        jid: &BareJid,
        root: &str,
        namespace: &str,
    ) -> StorageResult<Option<Fragment>> {
        let key = (root.to_owned(), namespace.to_owned());
        self.store.read(|tables| {
            Ok(tables
                .accounts
                .get(jid)
                .and_then(|record| record.fragments.get(&key))
                .map(|xml| Fragment::new(root, namespace, xml.as_str())))
        })
    }

    async fn save_fragment(&self, jid: &BareJid, fragment: &Fragment) -> StorageResult<bool> {
        self.store.write(|tables| {
            Ok(tables.accounts.get_mut(jid).is_some_and(|record| {
                record.fragments.insert(
                    (fragment.root().to_owned(), fragment.namespace().to_owned()),
                    fragment.xml().to_owned(),
                );
                true
            }))
        })
    }
}

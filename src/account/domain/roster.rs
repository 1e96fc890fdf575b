//! Three-way roster merge.
//!
//! Saving a roster never rewrites it wholesale. The persisted contacts are
//! compared with the submitted ones by bare JID and split into removals,
//! updates and insertions, which the adapters then apply in one
//! transaction.

use super::Contact;
use jid::BareJid;
use std::collections::{BTreeMap, BTreeSet};

/// Changes needed to turn a persisted roster into a submitted one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterDiff {
    removed: Vec<BareJid>,
    updated: Vec<Contact>,
    inserted: Vec<Contact>,
}

impl RosterDiff {
    /// Compares two rosters by contact JID.
    ///
    /// Persisted contacts missing from `submitted` are removed, contacts
    /// present in both are updated with the submitted values, and the rest
    /// of `submitted` is inserted. When `submitted` repeats a JID the last
    /// entry wins. Every list is ordered by JID.
    #[must_use]
    pub fn between(persisted: &[Contact], submitted: &[Contact]) -> Self {
        let existing: BTreeSet<&BareJid> = persisted.iter().map(Contact::jid).collect();
        let incoming: BTreeMap<&BareJid, &Contact> = submitted
            .iter()
            .map(|contact| (contact.jid(), contact))
            .collect();

        let removed = existing
            .iter()
            .filter(|jid| !incoming.contains_key(**jid))
            .map(|jid| (*jid).clone())
            .collect();
        let (updated, inserted): (Vec<&Contact>, Vec<&Contact>) = incoming
            .values()
            .copied()
            .partition(|contact| existing.contains(contact.jid()));

        Self {
            removed,
            updated: updated.into_iter().cloned().collect(),
            inserted: inserted.into_iter().cloned().collect(),
        }
    }

    /// Returns the JIDs of contacts to delete.
    #[must_use]
    pub fn removed(&self) -> &[BareJid] {
        &self.removed
    }

    /// Returns the contacts to overwrite.
    #[must_use]
    pub fn updated(&self) -> &[Contact] {
        &self.updated
    }

    /// Returns the contacts to create.
    #[must_use]
    pub fn inserted(&self) -> &[Contact] {
        &self.inserted
    }

    /// Summarizes the diff as counts.
    #[must_use]
    pub fn changes(&self) -> RosterChanges {
        RosterChanges {
            removed: self.removed.len(),
            updated: self.updated.len(),
            inserted: self.inserted.len(),
        }
    }
}

/// Number of contacts touched by a roster save.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RosterChanges {
    /// Contacts deleted.
    pub removed: usize,
    /// Contacts overwritten.
    pub updated: usize,
    /// Contacts created.
    pub inserted: usize,
}

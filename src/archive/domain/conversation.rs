//! Conversation identity.
//!
//! A conversation is the unordered pair of bare JIDs exchanging messages.
//! [`ConversationKey`] is its canonical, order-independent identity and
//! [`Collection`] is the persisted bucket holding the pair's messages.

use super::CollectionId;
use chrono::{DateTime, Utc};
use jid::BareJid;
use sha1::{Digest, Sha1};
use std::fmt;

/// Separator placed between the two sorted JIDs before hashing.
pub const KEY_DELIMITER: &str = "|";

/// Canonical digest of an unordered pair of bare JIDs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConversationKey(String);

impl ConversationKey {
    /// Computes the key for a pair of bare JIDs.
    ///
    /// Both JIDs are rendered in bare form, sorted lexicographically and
    /// joined with [`KEY_DELIMITER`]; the key is the lowercase hex SHA-1
    /// digest of the result. `for_pair(a, b) == for_pair(b, a)`.
    #[must_use]
    pub fn for_pair(first: &BareJid, second: &BareJid) -> Self {
        let mut pair = [first.to_string(), second.to_string()];
        pair.sort();
        let digest = Sha1::digest(pair.join(KEY_DELIMITER));
        Self(format!("{digest:x}"))
    }

    /// Returns the hex digest.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the key, returning the hex digest.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for ConversationKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ConversationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Archive bucket for one conversation.
///
/// `jid_from` and `jid_with` record the direction of the message that created
/// the collection. Later traffic never updates them, so they say nothing
/// about who started talking; use [`Collection::peer_of`] to find the other
/// side of the conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    id: CollectionId,
    key: ConversationKey,
    jid_from: BareJid,
    jid_with: BareJid,
    created_at: DateTime<Utc>,
}

impl Collection {
    /// Creates a collection for the pair, deriving its key.
    #[must_use]
    pub fn new(
        id: CollectionId,
        jid_from: BareJid,
        jid_with: BareJid,
        created_at: DateTime<Utc>,
    ) -> Self {
        let key = ConversationKey::for_pair(&jid_from, &jid_with);
        Self {
            id,
            key,
            jid_from,
            jid_with,
            created_at,
        }
    }

    /// Returns the collection identifier.
    #[must_use]
    pub const fn id(&self) -> CollectionId {
        self.id
    }

    /// Returns the canonical conversation key.
    #[must_use]
    pub const fn key(&self) -> &ConversationKey {
        &self.key
    }

    /// Returns the sender of the creating message.
    #[must_use]
    pub const fn jid_from(&self) -> &BareJid {
        &self.jid_from
    }

    /// Returns the recipient of the creating message.
    #[must_use]
    pub const fn jid_with(&self) -> &BareJid {
        &self.jid_with
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Whether `jid` is one side of the conversation.
    #[must_use]
    pub fn involves(&self, jid: &BareJid) -> bool {
        &self.jid_from == jid || &self.jid_with == jid
    }

    /// Returns the side of the conversation that is not `jid`.
    #[must_use]
    pub fn peer_of(&self, jid: &BareJid) -> &BareJid {
        if &self.jid_with == jid {
            &self.jid_from
        } else {
            &self.jid_with
        }
    }
}

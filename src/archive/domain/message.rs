//! Archived message types and stanza extraction.

use super::{ArchivedMessageId, CollectionId};
use crate::address::{InvalidJid, require_bare};
use chrono::{DateTime, Utc};
use jid::BareJid;
use minidom::Element;
use thiserror::Error;

/// Errors raised while extracting a chat message from a stanza.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StanzaError {
    /// A required addressing attribute is absent.
    #[error("stanza has no '{0}' attribute")]
    MissingAttribute(&'static str),

    /// An addressing attribute is not a valid JID.
    #[error(transparent)]
    InvalidJid(#[from] InvalidJid),
}

/// The parts of a message stanza that the archive keeps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    from: BareJid,
    to: BareJid,
    body: String,
}

impl ChatMessage {
    /// Creates a chat message from already-normalized parts.
    #[must_use]
    pub fn new(from: BareJid, to: BareJid, body: impl Into<String>) -> Self {
        Self {
            from,
            to,
            body: body.into(),
        }
    }

    /// Extracts sender, recipient and text body from a message stanza.
    ///
    /// Both addresses are reduced to bare form. The body is the text of every
    /// `<body/>` child concatenated in document order, or empty when the
    /// stanza has none.
    ///
    /// # Errors
    ///
    /// Returns [`StanzaError`] when `from` or `to` is missing or malformed.
    pub fn from_stanza(stanza: &Element) -> Result<Self, StanzaError> {
        let from = stanza
            .attr("from")
            .ok_or(StanzaError::MissingAttribute("from"))?;
        let to = stanza.attr("to").ok_or(StanzaError::MissingAttribute("to"))?;
        let body = stanza
            .children()
            .filter(|child| child.name() == "body")
            .map(Element::text)
            .collect();

        Ok(Self {
            from: require_bare(from)?,
            to: require_bare(to)?,
            body,
        })
    }

    /// Returns the bare sender JID.
    #[must_use]
    pub const fn from(&self) -> &BareJid {
        &self.from
    }

    /// Returns the bare recipient JID.
    #[must_use]
    pub const fn to(&self) -> &BareJid {
        &self.to
    }

    /// Returns the text body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }
}

/// Persisted field values used to reconstruct an [`ArchivedMessage`].
#[derive(Debug, Clone)]
pub struct PersistedMessageData {
    /// Message identifier.
    pub id: ArchivedMessageId,
    /// Owning collection.
    pub collection_id: CollectionId,
    /// Sender bare JID.
    pub sender: BareJid,
    /// Text body.
    pub body: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Renewal flag.
    pub renew_needed: bool,
}

/// A message stored in a collection.
///
/// Messages are immutable once stored except for the renewal flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivedMessage {
    id: ArchivedMessageId,
    collection_id: CollectionId,
    sender: BareJid,
    body: String,
    created_at: DateTime<Utc>,
    renew_needed: bool,
}

impl ArchivedMessage {
    /// Creates a freshly appended message, flagged for renewal.
    #[must_use]
    pub fn new(
        collection_id: CollectionId,
        sender: BareJid,
        body: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ArchivedMessageId::new(),
            collection_id,
            sender,
            body: body.into(),
            created_at,
            renew_needed: true,
        }
    }

    /// Reconstructs a message from persisted values.
    #[must_use]
    pub fn from_persisted(data: PersistedMessageData) -> Self {
        Self {
            id: data.id,
            collection_id: data.collection_id,
            sender: data.sender,
            body: data.body,
            created_at: data.created_at,
            renew_needed: data.renew_needed,
        }
    }

    /// Returns the message identifier.
    #[must_use]
    pub const fn id(&self) -> ArchivedMessageId {
        self.id
    }

    /// Returns the owning collection.
    #[must_use]
    pub const fn collection_id(&self) -> CollectionId {
        self.collection_id
    }

    /// Returns the sender bare JID.
    #[must_use]
    pub const fn sender(&self) -> &BareJid {
        &self.sender
    }

    /// Returns the text body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Whether the message still awaits renewal.
    #[must_use]
    pub const fn renew_needed(&self) -> bool {
        self.renew_needed
    }

    pub(crate) const fn clear_renewal(&mut self) {
        self.renew_needed = false;
    }
}

/// A message replayed to a reconnecting peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenewedMessage {
    /// The other side of the conversation, who sent the message.
    pub from: BareJid,
    /// The JID being resynchronized.
    pub to: BareJid,
    /// Text body.
    pub body: String,
}

//! Domain model for the conversation archive.
//!
//! Covers conversation identity, archived messages, renewal records and the
//! query types used for paginated retrieval. Nothing here touches storage.

mod conversation;
mod ids;
mod message;
mod query;

pub use conversation::{Collection, ConversationKey, KEY_DELIMITER};
pub use ids::{ArchivedMessageId, CollectionId};
pub use message::{ArchivedMessage, ChatMessage, PersistedMessageData, RenewedMessage, StanzaError};
pub use query::{CollectionQuery, DEFAULT_PAGE_LIMIT, MessageQuery, Page, TimeRange};

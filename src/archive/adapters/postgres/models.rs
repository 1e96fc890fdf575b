//! Diesel row models for collections and messages.

use crate::storage::schema::{collections, messages};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for collections.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = collections)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CollectionRow {
    /// Internal collection identifier.
    pub id: uuid::Uuid,
    /// Sender of the creating message.
    pub jid_from: String,
    /// Recipient of the creating message.
    pub jid_with: String,
    /// Conversation key digest.
    pub jids_hash: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert model for collections.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = collections)]
pub struct NewCollectionRow {
    /// Internal collection identifier.
    pub id: uuid::Uuid,
    /// Sender of the creating message.
    pub jid_from: String,
    /// Recipient of the creating message.
    pub jid_with: String,
    /// Conversation key digest.
    pub jids_hash: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Query result row for messages.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MessageRow {
    /// Internal message identifier.
    pub id: uuid::Uuid,
    /// Owning collection.
    pub collection_id: uuid::Uuid,
    /// Sender bare JID.
    pub jid: String,
    /// Text body.
    pub body: String,
    /// Renewal flag.
    pub renew_needed: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert model for messages.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = messages)]
pub struct NewMessageRow {
    /// Internal message identifier.
    pub id: uuid::Uuid,
    /// Owning collection.
    pub collection_id: uuid::Uuid,
    /// Sender bare JID.
    pub jid: String,
    /// Text body.
    pub body: String,
    /// Renewal flag.
    pub renew_needed: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// One page row of the renewal scan.
#[derive(Debug, Clone, QueryableByName)]
pub struct RenewedRow {
    /// Message identifier, used as the keyset cursor.
    #[diesel(sql_type = diesel::sql_types::Uuid)]
    pub id: uuid::Uuid,
    /// Text body.
    #[diesel(sql_type = diesel::sql_types::Text)]
    pub body: String,
    /// Collection `jid_from`.
    #[diesel(sql_type = diesel::sql_types::Varchar)]
    pub jid_from: String,
    /// Collection `jid_with`.
    #[diesel(sql_type = diesel::sql_types::Varchar)]
    pub jid_with: String,
}

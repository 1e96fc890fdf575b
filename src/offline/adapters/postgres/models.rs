//! Diesel row model for queued stanzas.

use crate::storage::schema::pending_stanzas;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for pending stanzas.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = pending_stanzas)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PendingStanzaRow {
    /// Internal stanza identifier.
    pub id: uuid::Uuid,
    /// Serialized stanza.
    pub xml: String,
    /// Enqueue timestamp.
    pub created_at: DateTime<Utc>,
}

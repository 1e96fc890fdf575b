//! Diesel row models for accounts, contacts and fragments.

use crate::storage::schema::{contacts, fragments, users};
use diesel::prelude::*;

/// Query result row for accounts.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    /// Internal user identifier.
    pub id: uuid::Uuid,
    /// Bare JID.
    pub jid: String,
    /// Display name.
    pub name: Option<String>,
    /// Stored credential.
    pub password: Option<String>,
}

/// Insert model for accounts.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub struct NewUserRow {
    /// Internal user identifier.
    pub id: uuid::Uuid,
    /// Bare JID.
    pub jid: String,
    /// Display name.
    pub name: Option<String>,
    /// Stored credential.
    pub password: Option<String>,
}

/// Query result row for contacts.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = contacts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ContactRow {
    /// Internal contact identifier.
    pub id: uuid::Uuid,
    /// Contact bare JID.
    pub jid: String,
    /// Display name.
    pub name: Option<String>,
    /// Pending ask state.
    pub ask: Option<String>,
    /// Subscription state.
    pub subscription: String,
}

/// Insert model for contacts.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = contacts)]
pub struct NewContactRow {
    /// Internal contact identifier.
    pub id: uuid::Uuid,
    /// Owning user.
    pub user_id: uuid::Uuid,
    /// Contact bare JID.
    pub jid: String,
    /// Display name.
    pub name: Option<String>,
    /// Pending ask state.
    pub ask: Option<String>,
    /// Subscription state.
    pub subscription: String,
}

/// Insert model for fragments.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = fragments)]
pub struct NewFragmentRow {
    /// Internal fragment identifier.
    pub id: uuid::Uuid,
    /// Owning user.
    pub user_id: uuid::Uuid,
    /// Root element name.
    pub root: String,
    /// Root element namespace.
    pub namespace: String,
    /// Serialized document.
    pub xml: String,
}

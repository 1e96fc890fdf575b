//! `PostgreSQL` repository implementation for accounts and rosters.
//!
//! Roster saves run in one transaction on one connection. Group names,
//! contacts and fragments are written with `INSERT … ON CONFLICT`, so
//! concurrent saves never surface a uniqueness error on those keys.

use super::models::{ContactRow, NewContactRow, NewFragmentRow, NewUserRow, UserRow};
use crate::account::{
    domain::{Ask, Contact, Fragment, RosterChanges, RosterDiff, Subscription, User},
    ports::{FragmentRepository, UserRepository},
};
use crate::storage::rows::decode_jid;
use crate::storage::schema::{contacts, contacts_groups, fragments, groups, users};
use crate::storage::{ConnectionGateway, StorageError, StorageResult};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::upsert::excluded;
use jid::BareJid;
use std::collections::{BTreeSet, HashMap};
use tracing::debug;
use uuid::Uuid;

/// `PostgreSQL`-backed account repository.
#[derive(Debug, Clone)]
pub struct PostgresAccounts {
    gateway: ConnectionGateway,
}

impl PostgresAccounts {
    /// Creates a repository on the shared gateway.
    #[must_use]
    pub const fn new(gateway: ConnectionGateway) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl UserRepository for PostgresAccounts {
    async fn find_user(&self, jid: &BareJid) -> StorageResult<Option<User>> {
        let jid_text = jid.to_string();
        self.gateway
            .dispatch(move |connection| {
                let Some(row) = users::table
                    .filter(users::jid.eq(&jid_text))
                    .select(UserRow::as_select())
                    .first::<UserRow>(connection)
                    .optional()?
                else {
                    return Ok(None);
                };
                let roster = load_roster(connection, row.id)?;
                let mut user = User::new(decode_jid(&row.jid)?).with_roster(roster);
                if let Some(name) = row.name {
                    user = user.with_name(name);
                }
                if let Some(password) = row.password {
                    user = user.with_password(password);
                }
                Ok(Some(user))
            })
            .await
    }

    async fn user_exists(&self, jid: &BareJid) -> StorageResult<bool> {
        let jid_text = jid.to_string();
        self.gateway
            .dispatch(move |connection| {
                Ok(diesel::select(diesel::dsl::exists(
                    users::table.filter(users::jid.eq(&jid_text)),
                ))
                .get_result::<bool>(connection)?)
            })
            .await
    }

    async fn save_user(&self, user: &User) -> StorageResult<RosterChanges> {
        let submitted = user.clone();
        self.gateway
            .dispatch(move |connection| {
                connection.transaction::<_, StorageError, _>(|tx| {
                    let user_id = upsert_user(tx, &submitted)?;
                    let persisted = load_roster(tx, user_id)?;
                    let diff = RosterDiff::between(&persisted, submitted.roster());

                    remove_contacts(tx, user_id, diff.removed())?;
                    for contact in diff.updated() {
                        let contact_id = update_contact(tx, user_id, contact)?;
                        replace_memberships(tx, contact_id, contact.groups())?;
                    }
                    for contact in diff.inserted() {
                        let contact_id = insert_contact(tx, user_id, contact)?;
                        replace_memberships(tx, contact_id, contact.groups())?;
                    }

                    let changes = diff.changes();
                    debug!(
                        jid = %submitted.jid(),
                        removed = changes.removed,
                        updated = changes.updated,
                        inserted = changes.inserted,
                        "roster merged"
                    );
                    Ok(changes)
                })
            })
            .await
    }

    async fn delete_user(&self, jid: &BareJid) -> StorageResult<bool> {
        let jid_text = jid.to_string();
        self.gateway
            .dispatch(move |connection| {
                let deleted =
                    diesel::delete(users::table.filter(users::jid.eq(&jid_text))).execute(connection)?;
                Ok(deleted > 0)
            })
            .await
    }
}

#[async_trait]
impl FragmentRepository for PostgresAccounts {
    async fn find_vcard(&self, jid: &BareJid) -> StorageResult<Option<String>> {
        let jid_text = jid.to_string();
        self.gateway
            .dispatch(move |connection| {
                let vcard = users::table
                    .filter(users::jid.eq(&jid_text))
                    .select(users::vcard)
                    .first::<Option<String>>(connection)
                    .optional()?;
                Ok(vcard.flatten())
            })
            .await
    }

    async fn save_vcard(&self, jid: &BareJid, xml: &str) -> StorageResult<bool> {
        let jid_text = jid.to_string();
        let document = xml.to_owned();
        self.gateway
            .dispatch(move |connection| {
                let updated = diesel::update(users::table.filter(users::jid.eq(&jid_text)))
                    .set(users::vcard.eq(Some(document)))
                    .execute(connection)?;
                Ok(updated > 0)
            })
            .await
    }

    async fn find_fragment(
        &self,
        jid: &BareJid,
        root: &str,
        namespace: &str,
    ) -> StorageResult<Option<Fragment>> {
        let jid_text = jid.to_string();
        let (root_name, namespace_uri) = (root.to_owned(), namespace.to_owned());
        self.gateway
            .dispatch(move |connection| {
                let xml = fragments::table
                    .inner_join(users::table)
                    .filter(users::jid.eq(&jid_text))
                    .filter(fragments::root.eq(&root_name))
                    .filter(fragments::namespace.eq(&namespace_uri))
                    .select(fragments::xml)
                    .first::<String>(connection)
                    .optional()?;
                Ok(xml.map(|document| Fragment::new(root_name, namespace_uri, document)))
            })
            .await
    }

    async fn save_fragment(&self, jid: &BareJid, fragment: &Fragment) -> StorageResult<bool> {
        let jid_text = jid.to_string();
        let stored = fragment.clone();
        self.gateway
            .dispatch(move |connection| {
                let Some(user_id) = find_user_id(connection, &jid_text)? else {
                    return Ok(false);
                };
                let new_row = NewFragmentRow {
                    id: Uuid::now_v7(),
                    user_id,
                    root: stored.root().to_owned(),
                    namespace: stored.namespace().to_owned(),
                    xml: stored.xml().to_owned(),
                };
                diesel::insert_into(fragments::table)
                    .values(&new_row)
                    .on_conflict((fragments::user_id, fragments::root, fragments::namespace))
                    .do_update()
                    .set(fragments::xml.eq(excluded(fragments::xml)))
                    .execute(connection)?;
                Ok(true)
            })
            .await
    }
}

fn find_user_id(connection: &mut PgConnection, jid: &str) -> StorageResult<Option<Uuid>> {
    Ok(users::table
        .filter(users::jid.eq(jid))
        .select(users::id)
        .first::<Uuid>(connection)
        .optional()?)
}

/// Creates the account row or overwrites its name and password.
fn upsert_user(connection: &mut PgConnection, user: &User) -> StorageResult<Uuid> {
    let new_row = NewUserRow {
        id: Uuid::now_v7(),
        jid: user.jid().to_string(),
        name: user.name().map(str::to_owned),
        password: user.password().map(str::to_owned),
    };
    Ok(diesel::insert_into(users::table)
        .values(&new_row)
        .on_conflict(users::jid)
        .do_update()
        .set((
            users::name.eq(excluded(users::name)),
            users::password.eq(excluded(users::password)),
        ))
        .returning(users::id)
        .get_result::<Uuid>(connection)?)
}

/// Loads a user's contacts with their group names, ordered by JID.
fn load_roster(connection: &mut PgConnection, user_id: Uuid) -> StorageResult<Vec<Contact>> {
    let rows = contacts::table
        .filter(contacts::user_id.eq(user_id))
        .order_by(contacts::jid.asc())
        .select(ContactRow::as_select())
        .load::<ContactRow>(connection)?;

    let contact_ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
    let memberships = contacts_groups::table
        .inner_join(groups::table)
        .filter(contacts_groups::contact_id.eq_any(contact_ids))
        .select((contacts_groups::contact_id, groups::name))
        .load::<(Uuid, String)>(connection)?;
    let mut groups_by_contact: HashMap<Uuid, Vec<String>> = HashMap::new();
    for (contact_id, name) in memberships {
        groups_by_contact.entry(contact_id).or_default().push(name);
    }

    rows.into_iter()
        .map(|row| {
            let names = groups_by_contact.remove(&row.id).unwrap_or_default();
            row_to_contact(row, names)
        })
        .collect()
}

fn remove_contacts(
    connection: &mut PgConnection,
    user_id: Uuid,
    removed: &[BareJid],
) -> StorageResult<()> {
    if removed.is_empty() {
        return Ok(());
    }
    let jids: Vec<String> = removed.iter().map(ToString::to_string).collect();
    diesel::delete(
        contacts::table
            .filter(contacts::user_id.eq(user_id))
            .filter(contacts::jid.eq_any(jids)),
    )
    .execute(connection)?;
    Ok(())
}

fn update_contact(
    connection: &mut PgConnection,
    user_id: Uuid,
    contact: &Contact,
) -> StorageResult<Uuid> {
    Ok(diesel::update(
        contacts::table
            .filter(contacts::user_id.eq(user_id))
            .filter(contacts::jid.eq(contact.jid().to_string())),
    )
    .set((
        contacts::name.eq(contact.name()),
        contacts::ask.eq(contact.ask().map(Ask::as_str)),
        contacts::subscription.eq(contact.subscription().as_str()),
    ))
    .returning(contacts::id)
    .get_result::<Uuid>(connection)?)
}

fn insert_contact(
    connection: &mut PgConnection,
    user_id: Uuid,
    contact: &Contact,
) -> StorageResult<Uuid> {
    let new_row = NewContactRow {
        id: Uuid::now_v7(),
        user_id,
        jid: contact.jid().to_string(),
        name: contact.name().map(str::to_owned),
        ask: contact.ask().map(|ask| ask.as_str().to_owned()),
        subscription: contact.subscription().as_str().to_owned(),
    };
    Ok(diesel::insert_into(contacts::table)
        .values(&new_row)
        .on_conflict((contacts::user_id, contacts::jid))
        .do_update()
        .set((
            contacts::name.eq(excluded(contacts::name)),
            contacts::ask.eq(excluded(contacts::ask)),
            contacts::subscription.eq(excluded(contacts::subscription)),
        ))
        .returning(contacts::id)
        .get_result::<Uuid>(connection)?)
}

/// Points the contact at exactly `names`, creating missing groups.
fn replace_memberships(
    connection: &mut PgConnection,
    contact_id: Uuid,
    names: &BTreeSet<String>,
) -> StorageResult<()> {
    diesel::delete(contacts_groups::table.filter(contacts_groups::contact_id.eq(contact_id)))
        .execute(connection)?;
    if names.is_empty() {
        return Ok(());
    }

    let new_groups: Vec<_> = names
        .iter()
        .map(|name| (groups::id.eq(Uuid::now_v7()), groups::name.eq(name.as_str())))
        .collect();
    diesel::insert_into(groups::table)
        .values(new_groups)
        .on_conflict(groups::name)
        .do_nothing()
        .execute(connection)?;

    let group_ids = groups::table
        .filter(groups::name.eq_any(names.iter().map(String::as_str).collect::<Vec<_>>()))
        .select(groups::id)
        .load::<Uuid>(connection)?;
    let memberships: Vec<_> = group_ids
        .into_iter()
        .map(|group_id| {
            (
                contacts_groups::contact_id.eq(contact_id),
                contacts_groups::group_id.eq(group_id),
            )
        })
        .collect();
    diesel::insert_into(contacts_groups::table)
        .values(memberships)
        .on_conflict_do_nothing()
        .execute(connection)?;
    Ok(())
}

fn row_to_contact(row: ContactRow, group_names: Vec<String>) -> StorageResult<Contact> {
    let subscription = Subscription::try_from(row.subscription.as_str())
        .map_err(|err| StorageError::serialization(err.to_string()))?;
    let ask = row
        .ask
        .as_deref()
        .map(Ask::try_from)
        .transpose()
        .map_err(|err| StorageError::serialization(err.to_string()))?;
    let mut contact = Contact::new(decode_jid(&row.jid)?)
        .with_subscription(subscription)
        .with_ask(ask)
        .with_groups(group_names);
    if let Some(name) = row.name {
        contact = contact.with_name(name);
    }
    Ok(contact)
}

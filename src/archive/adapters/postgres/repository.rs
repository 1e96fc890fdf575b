//! `PostgreSQL` repository implementation for the conversation archive.

use super::models::{CollectionRow, MessageRow, NewCollectionRow, NewMessageRow, RenewedRow};
use crate::archive::{
    domain::{
        ArchivedMessage, ArchivedMessageId, ChatMessage, Collection, CollectionId,
        CollectionQuery, ConversationKey, MessageQuery, Page, PersistedMessageData,
        RenewedMessage, TimeRange,
    },
    ports::{ArchiveRepository, RenewalRepository},
};
use crate::storage::rows::{decode_jid, row_count, sql_count, sql_limit};
use crate::storage::schema::{collections, messages};
use crate::storage::{ConnectionGateway, StorageError, StorageResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sql_types::{BigInt, Varchar};
use jid::BareJid;
use std::num::NonZeroUsize;
use tracing::debug;
use uuid::Uuid;

/// Keyset page of flagged messages addressed to `$1`, after cursor `$2`.
const RENEWED_BATCH_SQL: &str = "\
    SELECT m.id, m.body, c.jid_from, c.jid_with \
    FROM messages m \
    JOIN collections c ON c.id = m.collection_id \
    WHERE m.renew_needed = TRUE \
      AND m.jid <> $1 \
      AND (c.jid_from = $1 OR c.jid_with = $1) \
      AND m.id > $2 \
    ORDER BY m.id \
    LIMIT $3";

/// `PostgreSQL`-backed archive repository.
#[derive(Debug, Clone)]
pub struct PostgresArchive {
    gateway: ConnectionGateway,
}

impl PostgresArchive {
    /// Creates a repository on the shared gateway.
    #[must_use]
    pub const fn new(gateway: ConnectionGateway) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl ArchiveRepository for PostgresArchive {
    async fn get_or_create_collection(
        &self,
        from: &BareJid,
        with: &BareJid,
        created_at: DateTime<Utc>,
    ) -> StorageResult<Collection> {
        let (from_jid, with_jid) = (from.clone(), with.clone());
        self.gateway
            .dispatch(move |connection| {
                let row = resolve_collection(connection, &from_jid, &with_jid, created_at)?;
                row_to_collection(&row)
            })
            .await
    }

    async fn append_message(
        &self,
        message: &ChatMessage,
        created_at: DateTime<Utc>,
    ) -> StorageResult<ArchivedMessage> {
        let owned = message.clone();
        self.gateway
            .dispatch(move |connection| {
                let collection =
                    resolve_collection(connection, owned.from(), owned.to(), created_at)?;
                let new_row = NewMessageRow {
                    id: ArchivedMessageId::new().into_inner(),
                    collection_id: collection.id,
                    jid: owned.from().to_string(),
                    body: owned.body().to_owned(),
                    renew_needed: true,
                    created_at,
                };
                let row = diesel::insert_into(messages::table)
                    .values(&new_row)
                    .returning(MessageRow::as_returning())
                    .get_result(connection)?;
                row_to_message(row)
            })
            .await
    }

    async fn find_collections(&self, query: &CollectionQuery) -> StorageResult<Page<Collection>> {
        let criteria = query.clone();
        self.gateway
            .dispatch(move |connection| {
                let rows = filtered_collections(&criteria)
                    .select(CollectionRow::as_select())
                    .order_by((collections::created_at.asc(), collections::id.asc()))
                    .limit(sql_limit(criteria.limit()))
                    .load::<CollectionRow>(connection)?;
                let total: i64 = filtered_collections(&criteria)
                    .count()
                    .get_result(connection)?;
                let items = rows
                    .iter()
                    .map(row_to_collection)
                    .collect::<StorageResult<Vec<_>>>()?;
                Ok(Page::new(items, sql_count(total)))
            })
            .await
    }

    async fn find_messages(&self, query: &MessageQuery) -> StorageResult<Page<ArchivedMessage>> {
        let key = ConversationKey::for_pair(query.jid(), query.with()).into_inner();
        let range = query.range();
        let limit = sql_limit(query.limit());
        self.gateway
            .dispatch(move |connection| {
                let rows = filtered_messages(&key, range)
                    .select(MessageRow::as_select())
                    .order_by((messages::created_at.asc(), messages::id.asc()))
                    .limit(limit)
                    .load::<MessageRow>(connection)?;
                let total: i64 = filtered_messages(&key, range)
                    .count()
                    .get_result(connection)?;
                let items = rows
                    .into_iter()
                    .map(row_to_message)
                    .collect::<StorageResult<Vec<_>>>()?;
                Ok(Page::new(items, sql_count(total)))
            })
            .await
    }
}

#[async_trait]
impl RenewalRepository for PostgresArchive {
    fn fetch_renewed(
        &self,
        jid: &BareJid,
        batch_size: NonZeroUsize,
        visit: &mut dyn FnMut(RenewedMessage),
    ) -> StorageResult<u64> {
        let jid_text = jid.to_string();
        let limit = sql_limit(batch_size.get());
        self.gateway.with_connection(|connection| {
            let mut cursor = Uuid::nil();
            let mut visited = 0_u64;
            loop {
                let rows: Vec<RenewedRow> = diesel::sql_query(RENEWED_BATCH_SQL)
                    .bind::<Varchar, _>(jid_text.as_str())
                    .bind::<diesel::sql_types::Uuid, _>(cursor)
                    .bind::<BigInt, _>(limit)
                    .load(connection)?;
                let Some(last) = rows.last() else {
                    break;
                };
                cursor = last.id;
                let exhausted = rows.len() < batch_size.get();

                for row in rows {
                    let peer = if row.jid_with == jid_text {
                        row.jid_from
                    } else {
                        row.jid_with
                    };
                    visit(RenewedMessage {
                        from: decode_jid(&peer)?,
                        to: jid.clone(),
                        body: row.body,
                    });
                    visited += 1;
                }
                if exhausted {
                    break;
                }
            }
            Ok(visited)
        })
    }

    async fn unmark_renewed(&self, jid: &BareJid, with: &BareJid) -> StorageResult<u64> {
        let key = ConversationKey::for_pair(jid, with).into_inner();
        let author = jid.to_string();
        self.gateway
            .dispatch(move |connection| {
                let updated = diesel::update(
                    messages::table
                        .filter(
                            messages::collection_id.eq_any(
                                collections::table
                                    .filter(collections::jids_hash.eq(key))
                                    .select(collections::id),
                            ),
                        )
                        .filter(messages::jid.ne(author))
                        .filter(messages::renew_needed.eq(true)),
                )
                .set(messages::renew_needed.eq(false))
                .execute(connection)?;
                Ok(row_count(updated))
            })
            .await
    }
}

/// Finds a collection by conversation key, inserting it when absent.
///
/// A unique violation on insert means a concurrent caller won the race; the
/// winner's row is returned. If no row carries the key afterwards the
/// conflict was on another constraint and is reported as an integrity error.
fn resolve_collection(
    connection: &mut PgConnection,
    from: &BareJid,
    with: &BareJid,
    created_at: DateTime<Utc>,
) -> StorageResult<CollectionRow> {
    let key = ConversationKey::for_pair(from, with);
    if let Some(existing) = find_by_key(connection, key.as_str())? {
        return Ok(existing);
    }

    let new_row = NewCollectionRow {
        id: CollectionId::new().into_inner(),
        jid_from: from.to_string(),
        jid_with: with.to_string(),
        jids_hash: key.as_str().to_owned(),
        created_at,
    };
    let inserted = diesel::insert_into(collections::table)
        .values(&new_row)
        .returning(CollectionRow::as_returning())
        .get_result(connection);

    match inserted {
        Ok(row) => {
            debug!(collection = %row.id, key = %key, "collection created");
            Ok(row)
        }
        Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info)) => {
            debug!(key = %key, "collection created concurrently, re-reading");
            find_by_key(connection, key.as_str())?.ok_or_else(|| {
                StorageError::integrity(format!(
                    "collection insert conflicted on {}: {}",
                    info.constraint_name().unwrap_or("unknown constraint"),
                    info.message()
                ))
            })
        }
        Err(err) => Err(err.into()),
    }
}

fn find_by_key(connection: &mut PgConnection, key: &str) -> StorageResult<Option<CollectionRow>> {
    Ok(collections::table
        .filter(collections::jids_hash.eq(key))
        .select(CollectionRow::as_select())
        .first::<CollectionRow>(connection)
        .optional()?)
}

fn filtered_collections(query: &CollectionQuery) -> collections::BoxedQuery<'static, Pg> {
    let jid = query.jid().to_string();
    let mut statement = match query.with() {
        Some(with) => collections::table
            .filter(
                collections::jids_hash.eq(ConversationKey::for_pair(query.jid(), with).into_inner()),
            )
            .into_boxed(),
        None => collections::table
            .filter(
                collections::jid_from
                    .eq(jid.clone())
                    .or(collections::jid_with.eq(jid)),
            )
            .into_boxed(),
    };
    if let Some(start) = query.range().start() {
        statement = statement.filter(collections::created_at.ge(start));
    }
    if let Some(end) = query.range().end() {
        statement = statement.filter(collections::created_at.le(end));
    }
    statement
}

fn filtered_messages(key: &str, range: TimeRange) -> messages::BoxedQuery<'static, Pg> {
    let mut statement = messages::table
        .filter(
            messages::collection_id.eq_any(
                collections::table
                    .filter(collections::jids_hash.eq(key.to_owned()))
                    .select(collections::id),
            ),
        )
        .into_boxed();
    if let Some(start) = range.start() {
        statement = statement.filter(messages::created_at.ge(start));
    }
    if let Some(end) = range.end() {
        statement = statement.filter(messages::created_at.le(end));
    }
    statement
}

fn row_to_collection(row: &CollectionRow) -> StorageResult<Collection> {
    let collection = Collection::new(
        CollectionId::from_uuid(row.id),
        decode_jid(&row.jid_from)?,
        decode_jid(&row.jid_with)?,
        row.created_at,
    );
    if collection.key().as_str() != row.jids_hash {
        return Err(StorageError::serialization(format!(
            "collection {} has key {} but its jids hash to {}",
            row.id,
            row.jids_hash,
            collection.key()
        )));
    }
    Ok(collection)
}

fn row_to_message(row: MessageRow) -> StorageResult<ArchivedMessage> {
    Ok(ArchivedMessage::from_persisted(PersistedMessageData {
        id: ArchivedMessageId::from_uuid(row.id),
        collection_id: CollectionId::from_uuid(row.collection_id),
        sender: decode_jid(&row.jid)?,
        body: row.body,
        created_at: row.created_at,
        renew_needed: row.renew_needed,
    }))
}

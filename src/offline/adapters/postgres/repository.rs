//! `PostgreSQL` repository implementation for the offline delivery queue.

use super::models::PendingStanzaRow;
use crate::offline::{
    domain::{DeleteTarget, EnqueueOutcome, PendingStanza, PendingStanzaId},
    ports::OfflineRepository,
};
use crate::storage::rows::{row_count, sql_count, sql_limit};
use crate::storage::schema::{pending_stanzas, users};
use crate::storage::{ConnectionGateway, StorageResult};
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Text, Timestamptz};
use jid::BareJid;
use tracing::debug;
use uuid::Uuid;

/// Inserts `$1..$4` for user `$2` only while the user's queue holds fewer
/// than `$5` rows. The check and insert are one statement.
const BOUNDED_INSERT_SQL: &str = "\
    INSERT INTO pending_stanzas (id, user_id, xml, created_at) \
    SELECT $1, $2, $3, $4 \
    WHERE (SELECT COUNT(*) FROM pending_stanzas WHERE user_id = $2) < $5";

/// `PostgreSQL`-backed offline queue repository.
#[derive(Debug, Clone)]
pub struct PostgresOfflineQueue {
    gateway: ConnectionGateway,
}

impl PostgresOfflineQueue {
    /// Creates a repository on the shared gateway.
    #[must_use]
    pub const fn new(gateway: ConnectionGateway) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl OfflineRepository for PostgresOfflineQueue {
    async fn enqueue(
        &self,
        jid: &BareJid,
        stanza: &PendingStanza,
        capacity: usize,
    ) -> StorageResult<EnqueueOutcome> {
        let jid_text = jid.to_string();
        let pending = stanza.clone();
        self.gateway
            .dispatch(move |connection| {
                let Some(user_id) = users::table
                    .filter(users::jid.eq(&jid_text))
                    .select(users::id)
                    .first::<Uuid>(connection)
                    .optional()?
                else {
                    return Ok(EnqueueOutcome::UnknownUser);
                };

                let inserted = diesel::sql_query(BOUNDED_INSERT_SQL)
                    .bind::<diesel::sql_types::Uuid, _>(pending.id().into_inner())
                    .bind::<diesel::sql_types::Uuid, _>(user_id)
                    .bind::<Text, _>(pending.xml())
                    .bind::<Timestamptz, _>(pending.created_at())
                    .bind::<BigInt, _>(sql_limit(capacity))
                    .execute(connection)?;
                if inserted == 0 {
                    debug!(jid = %jid_text, capacity, "offline queue full, stanza dropped");
                    return Ok(EnqueueOutcome::Dropped);
                }
                Ok(EnqueueOutcome::Queued(pending.id()))
            })
            .await
    }

    async fn drain(&self, jid: &BareJid, limit: usize) -> StorageResult<Vec<PendingStanza>> {
        let jid_text = jid.to_string();
        self.gateway
            .dispatch(move |connection| {
                let rows = pending_stanzas::table
                    .inner_join(users::table)
                    .filter(users::jid.eq(&jid_text))
                    .order_by((pending_stanzas::created_at.asc(), pending_stanzas::id.asc()))
                    .limit(sql_limit(limit))
                    .select(PendingStanzaRow::as_select())
                    .load::<PendingStanzaRow>(connection)?;
                Ok(rows.into_iter().map(row_to_stanza).collect())
            })
            .await
    }

    async fn delete(&self, target: &DeleteTarget) -> StorageResult<u64> {
        let selection = target.clone();
        self.gateway
            .dispatch(move |connection| {
                let removed = match selection {
                    DeleteTarget::Ids(ids) => {
                        if ids.is_empty() {
                            return Ok(0);
                        }
                        let uuids: Vec<Uuid> =
                            ids.into_iter().map(PendingStanzaId::into_inner).collect();
                        diesel::delete(
                            pending_stanzas::table.filter(pending_stanzas::id.eq_any(uuids)),
                        )
                        .execute(connection)?
                    }
                    DeleteTarget::User(jid) => diesel::delete(
                        pending_stanzas::table.filter(
                            pending_stanzas::user_id.eq_any(
                                users::table
                                    .filter(users::jid.eq(jid.to_string()))
                                    .select(users::id),
                            ),
                        ),
                    )
                    .execute(connection)?,
                };
                Ok(row_count(removed))
            })
            .await
    }

    async fn pending_count(&self, jid: &BareJid) -> StorageResult<u64> {
        let jid_text = jid.to_string();
        self.gateway
            .dispatch(move |connection| {
                let count: i64 = pending_stanzas::table
                    .inner_join(users::table)
                    .filter(users::jid.eq(&jid_text))
                    .count()
                    .get_result(connection)?;
                Ok(sql_count(count))
            })
            .await
    }
}

fn row_to_stanza(row: PendingStanzaRow) -> PendingStanza {
    PendingStanza::from_parts(PendingStanzaId::from_uuid(row.id), row.xml, row.created_at)
}

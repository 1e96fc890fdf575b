//! Schema setup bundled with the crate.
//!
//! The SQL lives under `migrations/` in Diesel's directory layout so the
//! Diesel CLI can apply it as well. Applied steps are recorded by name in
//! [`VERSIONS_TABLE`] so later runs only apply what is new.

use std::collections::HashSet;

use diesel::PgConnection;
use diesel::QueryableByName;
use diesel::RunQueryDsl;
use diesel::connection::{Connection, SimpleConnection};
use diesel::sql_types::Text;
use tracing::{debug, info, instrument};

use super::error::{StorageError, StorageResult};
use super::gateway::ConnectionGateway;

/// Table recording the name of every applied migration.
pub const VERSIONS_TABLE: &str = "parley_schema_migrations";

const CREATE_VERSIONS_TABLE: &str = "CREATE TABLE IF NOT EXISTS parley_schema_migrations (
    version VARCHAR(255) PRIMARY KEY,
    applied_at TIMESTAMPTZ NOT NULL DEFAULT now()
)";

const DROP_VERSIONS_TABLE: &str = "DROP TABLE IF EXISTS parley_schema_migrations";

/// A named schema step with its forward and reverse SQL.
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    /// Directory name of the migration; doubles as its recorded version.
    pub name: &'static str,
    /// SQL applied when creating the schema.
    pub up: &'static str,
    /// SQL applied when dropping the schema.
    pub down: &'static str,
}

/// Every schema step, in application order.
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        name: "2026-10-01-000000_create_account_tables",
        up: include_str!("../../migrations/2026-10-01-000000_create_account_tables/up.sql"),
        down: include_str!("../../migrations/2026-10-01-000000_create_account_tables/down.sql"),
    },
    Migration {
        name: "2026-10-01-000001_create_archive_tables",
        up: include_str!("../../migrations/2026-10-01-000001_create_archive_tables/up.sql"),
        down: include_str!("../../migrations/2026-10-01-000001_create_archive_tables/down.sql"),
    },
    Migration {
        name: "2026-10-01-000002_create_pending_stanzas",
        up: include_str!("../../migrations/2026-10-01-000002_create_pending_stanzas/up.sql"),
        down: include_str!("../../migrations/2026-10-01-000002_create_pending_stanzas/down.sql"),
    },
    Migration {
        name: "2026-10-01-000003_track_message_renewal",
        up: include_str!("../../migrations/2026-10-01-000003_track_message_renewal/up.sql"),
        down: include_str!("../../migrations/2026-10-01-000003_track_message_renewal/down.sql"),
    },
];

#[derive(QueryableByName)]
struct AppliedVersion {
    #[diesel(sql_type = Text)]
    version: String,
}

impl ConnectionGateway {
    /// Creates the tables and indexes on the current thread.
    ///
    /// Existing tables are kept unless `force` is set, in which case they are
    /// dropped, together with the version ledger, and recreated.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when a connection cannot be obtained or any
    /// statement fails; the whole setup is rolled back in that case.
    #[instrument(skip(self))]
    pub fn create_schema(&self, force: bool) -> StorageResult<()> {
        self.with_connection(|connection| apply_schema(connection, force).map(|_| ()))
    }

    /// Applies the bundled migrations that have not been recorded yet.
    ///
    /// Returns the names of the migrations applied by this call, in order.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when a connection cannot be obtained or any
    /// statement fails; nothing is recorded in that case.
    #[instrument(skip(self))]
    pub fn migrate(&self) -> StorageResult<Vec<&'static str>> {
        self.with_connection(|connection| apply_schema(connection, false))
    }
}

/// Applies pending migrations inside one transaction.
///
/// With `force`, every migration is reverted and the version ledger dropped
/// first, so every migration is applied again.
///
/// # Errors
///
/// Returns [`StorageError`] when any statement fails.
pub fn apply_schema(
    connection: &mut PgConnection,
    force: bool,
) -> StorageResult<Vec<&'static str>> {
    connection.transaction::<_, StorageError, _>(|tx| {
        if force {
            for migration in MIGRATIONS.iter().rev() {
                tx.batch_execute(migration.down)?;
            }
            tx.batch_execute(DROP_VERSIONS_TABLE)?;
        }
        tx.batch_execute(CREATE_VERSIONS_TABLE)?;

        let applied: HashSet<String> = diesel::sql_query(format!(
            "SELECT version FROM {VERSIONS_TABLE}"
        ))
        .load::<AppliedVersion>(tx)?
        .into_iter()
        .map(|row| row.version)
        .collect();

        let mut newly_applied = Vec::new();
        for migration in pending(MIGRATIONS, &applied) {
            tx.batch_execute(migration.up)?;
            diesel::sql_query(format!(
                "INSERT INTO {VERSIONS_TABLE} (version) VALUES ($1)"
            ))
            .bind::<Text, _>(migration.name)
            .execute(tx)?;
            info!(migration = migration.name, "schema step applied");
            newly_applied.push(migration.name);
        }
        if newly_applied.is_empty() {
            debug!("schema up to date");
        }
        Ok(newly_applied)
    })
}

/// Migrations whose names are absent from `applied`, in bundle order.
fn pending<'a>(
    migrations: &'a [Migration],
    applied: &HashSet<String>,
) -> impl Iterator<Item = &'a Migration> {
    migrations
        .iter()
        .filter(|migration| !applied.contains(migration.name))
}

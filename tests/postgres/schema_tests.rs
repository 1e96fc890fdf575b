//! Schema creation and migration tests.

use super::helpers::{BoxError, TemporaryDatabase};
use diesel::prelude::*;
use parley::storage::MIGRATIONS;
use rstest::rstest;

const TABLES: &str =
    "SELECT COUNT(*) FROM information_schema.tables WHERE table_schema = 'public'";
const RECORDED_VERSIONS: &str = "SELECT COUNT(*) FROM parley_schema_migrations";
const RENEWAL_COLUMN: &str = "SELECT COUNT(*) FROM information_schema.columns \
    WHERE table_name = 'messages' AND column_name = 'renew_needed'";

const RENEWAL_MIGRATION: &str = "2026-10-01-000003_track_message_renewal";

fn execute(database: &TemporaryDatabase, statement: &'static str) -> Result<(), BoxError> {
    database.gateway().with_connection(|connection| {
        diesel::sql_query(statement)
            .execute(connection)
            .map(|_| ())
            .map_err(Into::into)
    })?;
    Ok(())
}

#[rstest]
#[ignore = "requires PARLEY_TEST_DATABASE_URL"]
fn repeated_setup_keeps_tables() -> Result<(), BoxError> {
    let database = TemporaryDatabase::provision()?;
    let before = database.count(TABLES)?;

    database.gateway().create_schema(false)?;

    assert_eq!(before, 9);
    assert_eq!(database.count(TABLES)?, before);
    Ok(())
}

#[rstest]
#[ignore = "requires PARLEY_TEST_DATABASE_URL"]
fn forced_setup_discards_rows() -> Result<(), BoxError> {
    let database = TemporaryDatabase::provision()?;
    execute(
        &database,
        "INSERT INTO users (id, jid) VALUES (gen_random_uuid(), 'a@example.com')",
    )?;

    database.gateway().create_schema(true)?;

    assert_eq!(database.count("SELECT COUNT(*) FROM users")?, 0);
    assert_eq!(
        database.count(RECORDED_VERSIONS)?,
        i64::try_from(MIGRATIONS.len())?
    );
    Ok(())
}

#[rstest]
#[ignore = "requires PARLEY_TEST_DATABASE_URL"]
fn migrating_a_current_schema_applies_nothing() -> Result<(), BoxError> {
    let database = TemporaryDatabase::provision()?;

    let first = database.gateway().migrate()?;
    let second = database.gateway().migrate()?;

    assert!(first.is_empty());
    assert!(second.is_empty());
    assert_eq!(
        database.count(RECORDED_VERSIONS)?,
        i64::try_from(MIGRATIONS.len())?
    );
    Ok(())
}

#[rstest]
#[ignore = "requires PARLEY_TEST_DATABASE_URL"]
fn migrating_applies_only_unrecorded_steps() -> Result<(), BoxError> {
    let database = TemporaryDatabase::provision()?;
    execute(
        &database,
        "ALTER TABLE messages DROP COLUMN renew_needed",
    )?;
    execute(
        &database,
        "DELETE FROM parley_schema_migrations \
         WHERE version = '2026-10-01-000003_track_message_renewal'",
    )?;
    assert_eq!(database.count(RENEWAL_COLUMN)?, 0);

    let applied = database.gateway().migrate()?;

    assert_eq!(applied, [RENEWAL_MIGRATION]);
    assert_eq!(database.count(RENEWAL_COLUMN)?, 1);
    assert!(database.gateway().migrate()?.is_empty());
    Ok(())
}

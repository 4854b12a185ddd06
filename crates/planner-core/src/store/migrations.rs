//! Embedded schema migrations.
//!
//! Migrations are applied in order at open time. SQLite records the applied
//! version in `PRAGMA user_version`; PostgreSQL keeps a `schema_migrations`
//! table.

use jiff::Timestamp;
use log::info;
use rusqlite::Connection;

use crate::error::{DatabaseResultExt, PostgresResultExt, Result};

/// One schema step, with the SQL for each backend.
pub struct Migration {
    pub version: i32,
    pub name: &'static str,
    pub sqlite: &'static str,
    pub postgres: &'static str,
}

/// All migrations, oldest first.
pub const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "init",
    sqlite: include_str!("../../assets/sqlite/0001_init.sql"),
    postgres: include_str!("../../assets/postgres/0001_init.sql"),
}];

/// Latest schema version known to this build.
pub fn latest_version() -> i32 {
    MIGRATIONS.last().map_or(0, |m| m.version)
}

pub(crate) fn apply_sqlite(connection: &mut Connection) -> Result<()> {
    let current: i32 = connection
        .query_row("PRAGMA user_version", [], |row| row.get(0))
        .db_context("Failed to read schema version")?;

    for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
        let tx = connection
            .transaction()
            .db_context("Failed to begin transaction")?;
        tx.execute_batch(migration.sqlite)
            .db_context("Failed to apply migration")?;
        tx.execute_batch(&format!("PRAGMA user_version = {}", migration.version))
            .db_context("Failed to record schema version")?;
        tx.commit().db_context("Failed to commit transaction")?;
        info!(
            "Applied migration {:04}_{} (sqlite)",
            migration.version, migration.name
        );
    }

    Ok(())
}

const CREATE_MIGRATIONS_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS schema_migrations (version INTEGER PRIMARY KEY, name TEXT NOT NULL, applied_at TEXT NOT NULL)";
const CURRENT_VERSION_SQL: &str = "SELECT COALESCE(MAX(version), 0) FROM schema_migrations";
const RECORD_MIGRATION_SQL: &str =
    "INSERT INTO schema_migrations (version, name, applied_at) VALUES ($1, $2, $3)";

pub(crate) async fn apply_postgres(client: &mut tokio_postgres::Client) -> Result<()> {
    client
        .batch_execute(CREATE_MIGRATIONS_TABLE_SQL)
        .await
        .pg_context("Failed to create migrations table")?;
    let current: i32 = client
        .query_one(CURRENT_VERSION_SQL, &[])
        .await
        .pg_context("Failed to read schema version")?
        .try_get(0)
        .pg_context("Failed to read schema version")?;

    for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
        let tx = client
            .transaction()
            .await
            .pg_context("Failed to begin transaction")?;
        tx.batch_execute(migration.postgres)
            .await
            .pg_context("Failed to apply migration")?;
        tx.execute(
            RECORD_MIGRATION_SQL,
            &[
                &migration.version,
                &migration.name,
                &Timestamp::now().to_string(),
            ],
        )
        .await
        .pg_context("Failed to record schema version")?;
        tx.commit()
            .await
            .pg_context("Failed to commit transaction")?;
        info!(
            "Applied migration {:04}_{} (postgres)",
            migration.version, migration.name
        );
    }

    Ok(())
}

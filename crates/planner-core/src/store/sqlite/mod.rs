//! SQLite backend.
//!
//! One connection guarded by a mutex; every statement runs on tokio's
//! blocking pool so the async callers never stall the runtime.

use std::{
    path::Path,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use jiff::Timestamp;
use log::debug;
use rusqlite::{Connection, OptionalExtension, Row, ToSql, types::Type};
use tokio::{
    sync::oneshot::{self, error::TryRecvError},
    task,
};

use super::{EntityStore, Table, child_column, migrations};
use crate::{
    error::{DatabaseResultExt, PlannerError, Result},
    models::{Area, Kind, Project, Task},
};

mod area_queries;
mod project_queries;
mod task_queries;

/// Embedded store backed by a single SQLite database.
pub struct SqliteStore {
    connection: Arc<Mutex<Option<Connection>>>,
}

impl SqliteStore {
    /// Opens (creating if needed) the database file and applies migrations.
    ///
    /// This is blocking; async callers should wrap it in `spawn_blocking`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = Connection::open(path).db_context("Failed to open database connection")?;
        Self::from_connection(connection)
    }

    /// Opens a private in-memory database, mainly for tests.
    pub fn open_in_memory() -> Result<Self> {
        let connection =
            Connection::open_in_memory().db_context("Failed to open in-memory database")?;
        Self::from_connection(connection)
    }

    fn from_connection(mut connection: Connection) -> Result<Self> {
        migrations::apply_sqlite(&mut connection)?;
        Ok(Self {
            connection: Arc::new(Mutex::new(Some(connection))),
        })
    }

    /// Runs `f` against the connection on the blocking pool.
    ///
    /// If the calling future is dropped (e.g. its deadline expired) before
    /// the connection is acquired, `f` never runs. A statement that already
    /// started runs to completion.
    pub(crate) async fn with_connection<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let connection = Arc::clone(&self.connection);
        // Dropped together with this future
        let (_caller, mut caller_gone) = oneshot::channel::<()>();
        task::spawn_blocking(move || {
            let mut guard = connection.lock().map_err(|_| PlannerError::LockPoisoned)?;
            if let Err(TryRecvError::Closed) = caller_gone.try_recv() {
                debug!("Skipping store call; caller went away");
                return Err(PlannerError::Cancelled);
            }
            let conn = guard.as_mut().ok_or(PlannerError::Closed)?;
            f(conn)
        })
        .await?
    }
}

#[async_trait]
impl EntityStore for SqliteStore {
    fn areas(&self) -> &dyn Table<Area> {
        self
    }

    fn projects(&self) -> &dyn Table<Project> {
        self
    }

    fn tasks(&self) -> &dyn Table<Task> {
        self
    }

    async fn count_children(&self, parent: Kind, id: &str) -> Result<usize> {
        let Some((child, column)) = child_column(parent) else {
            return Ok(0);
        };
        let id = id.to_string();
        self.with_connection(move |conn| {
            let sql = format!("SELECT COUNT(*) FROM {} WHERE {column} = ?1", child.table());
            let count: i64 = conn
                .query_row(&sql, [&id], |row| row.get(0))
                .db_context("Failed to count child rows")?;
            Ok(usize::try_from(count).unwrap_or_default())
        })
        .await
    }

    async fn close(&self) -> Result<()> {
        let connection = Arc::clone(&self.connection);
        task::spawn_blocking(move || {
            let mut guard = connection.lock().map_err(|_| PlannerError::LockPoisoned)?;
            if let Some(conn) = guard.take() {
                conn.close()
                    .map_err(|(_, e)| e)
                    .db_context("Failed to close database connection")?;
                debug!("SQLite store closed");
            }
            Ok(())
        })
        .await?
    }
}

/// Reads an RFC 3339 timestamp column.
pub(super) fn timestamp_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Timestamp> {
    row.get::<_, String>(idx)?
        .parse::<Timestamp>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Fetches the single row with `id` from `sql`, or `NotFound`.
pub(super) fn select_one<T>(
    conn: &Connection,
    sql: &str,
    kind: Kind,
    id: &str,
    map: fn(&Row<'_>) -> rusqlite::Result<T>,
) -> Result<T> {
    conn.query_row(sql, [id], map)
        .optional()
        .db_context("Failed to query row")?
        .ok_or_else(|| PlannerError::not_found(kind, id))
}

pub(super) fn row_exists(conn: &Connection, kind: Kind, id: &str) -> Result<bool> {
    let sql = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = ?1)", kind.table());
    conn.query_row(&sql, [id], |row| row.get(0))
        .db_context("Failed to check row existence")
}

pub(super) fn delete_row(conn: &Connection, kind: Kind, id: &str) -> Result<()> {
    let sql = format!("DELETE FROM {} WHERE id = ?1", kind.table());
    let deleted = conn.execute(&sql, [id]).db_context("Failed to delete row")?;
    if deleted == 0 {
        return Err(PlannerError::not_found(kind, id));
    }
    Ok(())
}

/// Writes `updated_at` plus the given column assignments to one row.
pub(super) fn update_row(
    conn: &Connection,
    kind: Kind,
    id: &str,
    updated_at: Timestamp,
    assignments: Vec<(&'static str, Box<dyn ToSql>)>,
) -> Result<()> {
    let mut columns = vec!["updated_at = ?"];
    let mut values: Vec<Box<dyn ToSql>> = vec![Box::new(updated_at.to_string())];
    for (column, value) in assignments {
        columns.push(column);
        values.push(value);
    }
    values.push(Box::new(id.to_string()));

    let sql = format!(
        "UPDATE {} SET {} WHERE id = ?",
        kind.table(),
        columns.join(", ")
    );
    let params_refs: Vec<&dyn ToSql> = values.iter().map(|b| &**b).collect();

    let changed = conn
        .execute(&sql, &params_refs[..])
        .db_context("Failed to update row")?;
    if changed == 0 {
        return Err(PlannerError::not_found(kind, id));
    }
    Ok(())
}

#[cfg(test)]
mod tests;

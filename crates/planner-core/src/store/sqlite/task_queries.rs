//! Task table queries.

use async_trait::async_trait;
use jiff::Timestamp;
use rusqlite::{Row, ToSql, params};

use super::{SqliteStore, delete_row, row_exists, select_one, timestamp_column, update_row};
use crate::{
    error::{DatabaseResultExt, Result},
    models::{FieldUpdate, Kind, Task, TaskPatch},
    store::Table,
};

const INSERT_TASK_SQL: &str = "INSERT INTO tasks (id, name, notes, project_id, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)";
const SELECT_TASK_SQL: &str =
    "SELECT id, name, notes, project_id, created_at, updated_at FROM tasks WHERE id = ?1";
const LIST_TASKS_SQL: &str = "SELECT id, name, notes, project_id, created_at, updated_at FROM tasks WHERE (?1 IS NULL OR project_id = ?1) ORDER BY rowid";

fn task_from_row(row: &Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        name: row.get(1)?,
        notes: row.get(2)?,
        project_id: row.get(3)?,
        created_at: timestamp_column(row, 4)?,
        updated_at: timestamp_column(row, 5)?,
    })
}

#[async_trait]
impl Table<Task> for SqliteStore {
    async fn insert(&self, row: Task) -> Result<Task> {
        self.with_connection(move |conn| {
            conn.execute(
                INSERT_TASK_SQL,
                params![
                    &row.id,
                    &row.name,
                    &row.notes,
                    &row.project_id,
                    row.created_at.to_string(),
                    row.updated_at.to_string()
                ],
            )
            .db_context("Failed to insert task")?;
            Ok(row)
        })
        .await
    }

    async fn get(&self, id: &str) -> Result<Task> {
        let id = id.to_string();
        self.with_connection(move |conn| {
            select_one(conn, SELECT_TASK_SQL, Kind::Task, &id, task_from_row)
        })
        .await
    }

    async fn list(&self, parent: Option<&str>) -> Result<Vec<Task>> {
        let project_id = parent.map(String::from);
        self.with_connection(move |conn| {
            let mut stmt = conn
                .prepare(LIST_TASKS_SQL)
                .db_context("Failed to prepare query")?;
            let tasks = stmt
                .query_map(params![project_id], task_from_row)
                .db_context("Failed to query tasks")?
                .collect::<rusqlite::Result<Vec<_>>>()
                .db_context("Failed to read tasks")?;
            Ok(tasks)
        })
        .await
    }

    async fn exists(&self, id: &str) -> Result<bool> {
        let id = id.to_string();
        self.with_connection(move |conn| row_exists(conn, Kind::Task, &id))
            .await
    }

    async fn update(&self, id: &str, patch: &TaskPatch, updated_at: Timestamp) -> Result<Task> {
        let id = id.to_string();
        let patch = patch.clone();
        self.with_connection(move |conn| {
            let mut assignments: Vec<(&'static str, Box<dyn ToSql>)> = Vec::new();
            if let FieldUpdate::Set(name) = patch.name {
                assignments.push(("name = ?", Box::new(name) as Box<dyn ToSql>));
            }
            if let FieldUpdate::Set(notes) = patch.notes {
                assignments.push(("notes = ?", Box::new(notes) as Box<dyn ToSql>));
            }
            update_row(conn, Kind::Task, &id, updated_at, assignments)?;
            select_one(conn, SELECT_TASK_SQL, Kind::Task, &id, task_from_row)
        })
        .await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let id = id.to_string();
        self.with_connection(move |conn| delete_row(conn, Kind::Task, &id))
            .await
    }
}

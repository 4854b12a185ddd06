//! PostgreSQL backend.
//!
//! A single `tokio_postgres::Client`; its connection future is driven by a
//! spawned task that `close()` aborts. Timestamps are stored as RFC 3339 text,
//! matching the SQLite layout, and `seq` gives insertion order.

use std::sync::Mutex;

use async_trait::async_trait;
use jiff::Timestamp;
use log::{debug, error};
use tokio::task::JoinHandle;
use tokio_postgres::{Client, NoTls, Row, types::ToSql};

use super::{EntityStore, Table, child_column, migrations};
use crate::{
    error::{PlannerError, PostgresResultExt, Result},
    models::{Area, AreaPatch, FieldUpdate, Kind, Project, ProjectPatch, Task, TaskPatch},
};

const AREA_COLUMNS: &str = "id, name, description, created_at, updated_at";
const PROJECT_COLUMNS: &str = "id, name, area_id, created_at, updated_at";
const TASK_COLUMNS: &str = "id, name, notes, project_id, created_at, updated_at";

/// Networked store backed by a PostgreSQL database.
pub struct PostgresStore {
    client: Client,
    connection: Mutex<Option<JoinHandle<()>>>,
}

impl PostgresStore {
    /// Connects with a libpq-style connection string and applies migrations.
    pub async fn connect(config: &str) -> Result<Self> {
        let (mut client, connection) = tokio_postgres::connect(config, NoTls)
            .await
            .pg_context("Failed to connect to PostgreSQL")?;

        let handle = tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!("PostgreSQL connection error: {e}");
            }
        });

        migrations::apply_postgres(&mut client).await?;

        Ok(Self {
            client,
            connection: Mutex::new(Some(handle)),
        })
    }

    async fn exists_row(&self, kind: Kind, id: &str) -> Result<bool> {
        let sql = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1)", kind.table());
        self.client
            .query_one(&sql, &[&id])
            .await
            .pg_context("Failed to check row existence")?
            .try_get(0)
            .pg_context("Failed to read row existence")
    }

    async fn select_row(&self, kind: Kind, columns: &str, id: &str) -> Result<Row> {
        let sql = format!("SELECT {columns} FROM {} WHERE id = $1", kind.table());
        self.client
            .query_opt(&sql, &[&id])
            .await
            .pg_context("Failed to query row")?
            .ok_or_else(|| PlannerError::not_found(kind, id))
    }

    async fn select_rows(
        &self,
        kind: Kind,
        columns: &str,
        parent_column: Option<&str>,
        parent: Option<&str>,
    ) -> Result<Vec<Row>> {
        let rows = match parent_column {
            Some(column) => {
                let sql = format!(
                    "SELECT {columns} FROM {} WHERE ($1::TEXT IS NULL OR {column} = $1) ORDER BY seq",
                    kind.table()
                );
                self.client.query(&sql, &[&parent]).await
            }
            None => {
                let sql = format!("SELECT {columns} FROM {} ORDER BY seq", kind.table());
                self.client.query(&sql, &[]).await
            }
        };
        rows.pg_context("Failed to list rows")
    }

    /// Writes `updated_at` plus the assignments and returns the updated row.
    async fn update_row(
        &self,
        kind: Kind,
        columns: &str,
        id: &str,
        updated_at: Timestamp,
        assignments: Vec<(&'static str, Option<String>)>,
    ) -> Result<Row> {
        let mut sets = vec!["updated_at = $1".to_string()];
        let mut values: Vec<Option<String>> = vec![Some(updated_at.to_string())];
        for (column, value) in assignments {
            values.push(value);
            sets.push(format!("{column} = ${}", values.len()));
        }
        values.push(Some(id.to_string()));

        let sql = format!(
            "UPDATE {} SET {} WHERE id = ${} RETURNING {columns}",
            kind.table(),
            sets.join(", "),
            values.len()
        );
        let params: Vec<&(dyn ToSql + Sync)> =
            values.iter().map(|v| v as &(dyn ToSql + Sync)).collect();

        self.client
            .query_opt(&sql, &params)
            .await
            .pg_context("Failed to update row")?
            .ok_or_else(|| PlannerError::not_found(kind, id))
    }

    async fn delete_row(&self, kind: Kind, id: &str) -> Result<()> {
        let sql = format!("DELETE FROM {} WHERE id = $1", kind.table());
        let deleted = self
            .client
            .execute(&sql, &[&id])
            .await
            .pg_context("Failed to delete row")?;
        if deleted == 0 {
            return Err(PlannerError::not_found(kind, id));
        }
        Ok(())
    }
}

fn timestamp(row: &Row, column: &'static str) -> Result<Timestamp> {
    let raw: String = row
        .try_get(column)
        .pg_context("Failed to read timestamp column")?;
    raw.parse().map_err(|e: jiff::Error| PlannerError::Decode {
        column,
        reason: e.to_string(),
    })
}

fn area_from_row(row: &Row) -> Result<Area> {
    Ok(Area {
        id: row.try_get("id").pg_context("Failed to read area")?,
        name: row.try_get("name").pg_context("Failed to read area")?,
        description: row.try_get("description").pg_context("Failed to read area")?,
        created_at: timestamp(row, "created_at")?,
        updated_at: timestamp(row, "updated_at")?,
    })
}

fn project_from_row(row: &Row) -> Result<Project> {
    Ok(Project {
        id: row.try_get("id").pg_context("Failed to read project")?,
        name: row.try_get("name").pg_context("Failed to read project")?,
        area_id: row.try_get("area_id").pg_context("Failed to read project")?,
        created_at: timestamp(row, "created_at")?,
        updated_at: timestamp(row, "updated_at")?,
    })
}

fn task_from_row(row: &Row) -> Result<Task> {
    Ok(Task {
        id: row.try_get("id").pg_context("Failed to read task")?,
        name: row.try_get("name").pg_context("Failed to read task")?,
        notes: row.try_get("notes").pg_context("Failed to read task")?,
        project_id: row.try_get("project_id").pg_context("Failed to read task")?,
        created_at: timestamp(row, "created_at")?,
        updated_at: timestamp(row, "updated_at")?,
    })
}

#[async_trait]
impl Table<Area> for PostgresStore {
    async fn insert(&self, row: Area) -> Result<Area> {
        self.client
            .execute(
                "INSERT INTO areas (id, name, description, created_at, updated_at) VALUES ($1, $2, $3, $4, $5)",
                &[
                    &row.id,
                    &row.name,
                    &row.description,
                    &row.created_at.to_string(),
                    &row.updated_at.to_string(),
                ],
            )
            .await
            .pg_context("Failed to insert area")?;
        Ok(row)
    }

    async fn get(&self, id: &str) -> Result<Area> {
        area_from_row(&self.select_row(Kind::Area, AREA_COLUMNS, id).await?)
    }

    async fn list(&self, _parent: Option<&str>) -> Result<Vec<Area>> {
        self.select_rows(Kind::Area, AREA_COLUMNS, None, None)
            .await?
            .iter()
            .map(area_from_row)
            .collect()
    }

    async fn exists(&self, id: &str) -> Result<bool> {
        self.exists_row(Kind::Area, id).await
    }

    async fn update(&self, id: &str, patch: &AreaPatch, updated_at: Timestamp) -> Result<Area> {
        let mut assignments = Vec::new();
        if let FieldUpdate::Set(name) = &patch.name {
            assignments.push(("name", Some(name.clone())));
        }
        if let FieldUpdate::Set(description) = &patch.description {
            let description = Some(description.clone()).filter(|d| !d.is_empty());
            assignments.push(("description", description));
        }
        let row = self
            .update_row(Kind::Area, AREA_COLUMNS, id, updated_at, assignments)
            .await?;
        area_from_row(&row)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.delete_row(Kind::Area, id).await
    }
}

#[async_trait]
impl Table<Project> for PostgresStore {
    async fn insert(&self, row: Project) -> Result<Project> {
        self.client
            .execute(
                "INSERT INTO projects (id, name, area_id, created_at, updated_at) VALUES ($1, $2, $3, $4, $5)",
                &[
                    &row.id,
                    &row.name,
                    &row.area_id,
                    &row.created_at.to_string(),
                    &row.updated_at.to_string(),
                ],
            )
            .await
            .pg_context("Failed to insert project")?;
        Ok(row)
    }

    async fn get(&self, id: &str) -> Result<Project> {
        project_from_row(&self.select_row(Kind::Project, PROJECT_COLUMNS, id).await?)
    }

    async fn list(&self, parent: Option<&str>) -> Result<Vec<Project>> {
        self.select_rows(Kind::Project, PROJECT_COLUMNS, Some("area_id"), parent)
            .await?
            .iter()
            .map(project_from_row)
            .collect()
    }

    async fn exists(&self, id: &str) -> Result<bool> {
        self.exists_row(Kind::Project, id).await
    }

    async fn update(
        &self,
        id: &str,
        patch: &ProjectPatch,
        updated_at: Timestamp,
    ) -> Result<Project> {
        let mut assignments = Vec::new();
        if let FieldUpdate::Set(name) = &patch.name {
            assignments.push(("name", Some(name.clone())));
        }
        let row = self
            .update_row(Kind::Project, PROJECT_COLUMNS, id, updated_at, assignments)
            .await?;
        project_from_row(&row)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.delete_row(Kind::Project, id).await
    }
}

#[async_trait]
impl Table<Task> for PostgresStore {
    async fn insert(&self, row: Task) -> Result<Task> {
        self.client
            .execute(
                "INSERT INTO tasks (id, name, notes, project_id, created_at, updated_at) VALUES ($1, $2, $3, $4, $5, $6)",
                &[
                    &row.id,
                    &row.name,
                    &row.notes,
                    &row.project_id,
                    &row.created_at.to_string(),
                    &row.updated_at.to_string(),
                ],
            )
            .await
            .pg_context("Failed to insert task")?;
        Ok(row)
    }

    async fn get(&self, id: &str) -> Result<Task> {
        task_from_row(&self.select_row(Kind::Task, TASK_COLUMNS, id).await?)
    }

    async fn list(&self, parent: Option<&str>) -> Result<Vec<Task>> {
        self.select_rows(Kind::Task, TASK_COLUMNS, Some("project_id"), parent)
            .await?
            .iter()
            .map(task_from_row)
            .collect()
    }

    async fn exists(&self, id: &str) -> Result<bool> {
        self.exists_row(Kind::Task, id).await
    }

    async fn update(&self, id: &str, patch: &TaskPatch, updated_at: Timestamp) -> Result<Task> {
        let mut assignments = Vec::new();
        if let FieldUpdate::Set(name) = &patch.name {
            assignments.push(("name", Some(name.clone())));
        }
        if let FieldUpdate::Set(notes) = &patch.notes {
            assignments.push(("notes", Some(notes.clone())));
        }
        let row = self
            .update_row(Kind::Task, TASK_COLUMNS, id, updated_at, assignments)
            .await?;
        task_from_row(&row)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.delete_row(Kind::Task, id).await
    }
}

#[async_trait]
impl EntityStore for PostgresStore {
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
        let sql = format!("SELECT COUNT(*) FROM {} WHERE {column} = $1", child.table());
        let count: i64 = self
            .client
            .query_one(&sql, &[&id])
            .await
            .pg_context("Failed to count child rows")?
            .try_get(0)
            .pg_context("Failed to read child count")?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    async fn close(&self) -> Result<()> {
        let handle = self
            .connection
            .lock()
            .map_err(|_| PlannerError::LockPoisoned)?
            .take();
        if let Some(handle) = handle {
            handle.abort();
            debug!("PostgreSQL store closed");
        }
        Ok(())
    }
}

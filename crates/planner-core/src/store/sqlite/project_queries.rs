//! Project table queries.

use async_trait::async_trait;
use jiff::Timestamp;
use rusqlite::{Row, ToSql, params};

use super::{SqliteStore, delete_row, row_exists, select_one, timestamp_column, update_row};
use crate::{
    error::{DatabaseResultExt, Result},
    models::{FieldUpdate, Kind, Project, ProjectPatch},
    store::Table,
};

const INSERT_PROJECT_SQL: &str = "INSERT INTO projects (id, name, area_id, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5)";
const SELECT_PROJECT_SQL: &str =
    "SELECT id, name, area_id, created_at, updated_at FROM projects WHERE id = ?1";
const LIST_PROJECTS_SQL: &str = "SELECT id, name, area_id, created_at, updated_at FROM projects WHERE (?1 IS NULL OR area_id = ?1) ORDER BY rowid";

fn project_from_row(row: &Row<'_>) -> rusqlite::Result<Project> {
    Ok(Project {
        id: row.get(0)?,
        name: row.get(1)?,
        area_id: row.get(2)?,
        created_at: timestamp_column(row, 3)?,
        updated_at: timestamp_column(row, 4)?,
    })
}

#[async_trait]
impl Table<Project> for SqliteStore {
    async fn insert(&self, row: Project) -> Result<Project> {
        self.with_connection(move |conn| {
            conn.execute(
                INSERT_PROJECT_SQL,
                params![
                    &row.id,
                    &row.name,
                    &row.area_id,
                    row.created_at.to_string(),
                    row.updated_at.to_string()
                ],
            )
            .db_context("Failed to insert project")?;
            Ok(row)
        })
        .await
    }

    async fn get(&self, id: &str) -> Result<Project> {
        let id = id.to_string();
        self.with_connection(move |conn| {
            select_one(conn, SELECT_PROJECT_SQL, Kind::Project, &id, project_from_row)
        })
        .await
    }

    async fn list(&self, parent: Option<&str>) -> Result<Vec<Project>> {
        let area_id = parent.map(String::from);
        self.with_connection(move |conn| {
            let mut stmt = conn
                .prepare(LIST_PROJECTS_SQL)
                .db_context("Failed to prepare query")?;
            let projects = stmt
                .query_map(params![area_id], project_from_row)
                .db_context("Failed to query projects")?
                .collect::<rusqlite::Result<Vec<_>>>()
                .db_context("Failed to read projects")?;
            Ok(projects)
        })
        .await
    }

    async fn exists(&self, id: &str) -> Result<bool> {
        let id = id.to_string();
        self.with_connection(move |conn| row_exists(conn, Kind::Project, &id))
            .await
    }

    async fn update(
        &self,
        id: &str,
        patch: &ProjectPatch,
        updated_at: Timestamp,
    ) -> Result<Project> {
        let id = id.to_string();
        let patch = patch.clone();
        self.with_connection(move |conn| {
            let mut assignments: Vec<(&'static str, Box<dyn ToSql>)> = Vec::new();
            if let FieldUpdate::Set(name) = patch.name {
                assignments.push(("name = ?", Box::new(name) as Box<dyn ToSql>));
            }
            update_row(conn, Kind::Project, &id, updated_at, assignments)?;
            select_one(conn, SELECT_PROJECT_SQL, Kind::Project, &id, project_from_row)
        })
        .await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let id = id.to_string();
        self.with_connection(move |conn| delete_row(conn, Kind::Project, &id))
            .await
    }
}

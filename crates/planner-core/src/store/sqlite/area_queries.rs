//! Area table queries.

use async_trait::async_trait;
use jiff::Timestamp;
use rusqlite::{Row, ToSql, params};

use super::{SqliteStore, delete_row, row_exists, select_one, timestamp_column, update_row};
use crate::{
    error::{DatabaseResultExt, Result},
    models::{Area, AreaPatch, FieldUpdate, Kind},
    store::Table,
};

const INSERT_AREA_SQL: &str = "INSERT INTO areas (id, name, description, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5)";
const SELECT_AREA_SQL: &str =
    "SELECT id, name, description, created_at, updated_at FROM areas WHERE id = ?1";
const LIST_AREAS_SQL: &str =
    "SELECT id, name, description, created_at, updated_at FROM areas ORDER BY rowid";

fn area_from_row(row: &Row<'_>) -> rusqlite::Result<Area> {
    Ok(Area {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        created_at: timestamp_column(row, 3)?,
        updated_at: timestamp_column(row, 4)?,
    })
}

#[async_trait]
impl Table<Area> for SqliteStore {
    async fn insert(&self, row: Area) -> Result<Area> {
        self.with_connection(move |conn| {
            conn.execute(
                INSERT_AREA_SQL,
                params![
                    &row.id,
                    &row.name,
                    row.description.as_deref(),
                    row.created_at.to_string(),
                    row.updated_at.to_string()
                ],
            )
            .db_context("Failed to insert area")?;
            Ok(row)
        })
        .await
    }

    async fn get(&self, id: &str) -> Result<Area> {
        let id = id.to_string();
        self.with_connection(move |conn| {
            select_one(conn, SELECT_AREA_SQL, Kind::Area, &id, area_from_row)
        })
        .await
    }

    async fn list(&self, _parent: Option<&str>) -> Result<Vec<Area>> {
        self.with_connection(|conn| {
            let mut stmt = conn
                .prepare(LIST_AREAS_SQL)
                .db_context("Failed to prepare query")?;
            let areas = stmt
                .query_map([], area_from_row)
                .db_context("Failed to query areas")?
                .collect::<rusqlite::Result<Vec<_>>>()
                .db_context("Failed to read areas")?;
            Ok(areas)
        })
        .await
    }

    async fn exists(&self, id: &str) -> Result<bool> {
        let id = id.to_string();
        self.with_connection(move |conn| row_exists(conn, Kind::Area, &id))
            .await
    }

    async fn update(&self, id: &str, patch: &AreaPatch, updated_at: Timestamp) -> Result<Area> {
        let id = id.to_string();
        let patch = patch.clone();
        self.with_connection(move |conn| {
            let mut assignments: Vec<(&'static str, Box<dyn ToSql>)> = Vec::new();
            if let FieldUpdate::Set(name) = patch.name {
                assignments.push(("name = ?", Box::new(name) as Box<dyn ToSql>));
            }
            if let FieldUpdate::Set(description) = patch.description {
                let description = Some(description).filter(|d| !d.is_empty());
                assignments.push(("description = ?", Box::new(description) as Box<dyn ToSql>));
            }
            update_row(conn, Kind::Area, &id, updated_at, assignments)?;
            select_one(conn, SELECT_AREA_SQL, Kind::Area, &id, area_from_row)
        })
        .await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let id = id.to_string();
        self.with_connection(move |conn| delete_row(conn, Kind::Area, &id))
            .await
    }
}

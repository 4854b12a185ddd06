//! Persistence boundary for the hierarchy.
//!
//! A [`Table`] is the raw CRUD surface for one entity kind; an
//! [`EntityStore`] bundles the three tables of one backend. Stores perform no
//! business validation: parent existence, empty names and the like are the
//! service layer's job.
//!
//! Two backends are provided:
//!
//! - [`SqliteStore`]: embedded single-file database (or in-memory for tests)
//! - [`PostgresStore`]: networked PostgreSQL server

use async_trait::async_trait;
use jiff::Timestamp;

use crate::{
    error::Result,
    models::{Area, EntityKind, Kind, Project, Task},
};

pub mod migrations;
pub mod postgres;
pub mod sqlite;

pub use postgres::PostgresStore;
pub use sqlite::SqliteStore;

/// CRUD operations for one entity kind.
#[async_trait]
pub trait Table<E: EntityKind>: Send + Sync {
    /// Persists a fully built row and returns it as stored.
    async fn insert(&self, row: E) -> Result<E>;

    /// Fetches a row, failing with `NotFound` if it is missing.
    async fn get(&self, id: &str) -> Result<E>;

    /// Returns rows in insertion order, optionally restricted to one parent.
    async fn list(&self, parent: Option<&str>) -> Result<Vec<E>>;

    async fn exists(&self, id: &str) -> Result<bool>;

    /// Applies the `Set` fields of `patch` and writes `updated_at`.
    async fn update(&self, id: &str, patch: &E::Patch, updated_at: Timestamp) -> Result<E>;

    /// Removes a single row. Children are never touched.
    async fn delete(&self, id: &str) -> Result<()>;
}

/// A backend holding all three tables.
#[async_trait]
pub trait EntityStore: Send + Sync {
    fn areas(&self) -> &dyn Table<Area>;

    fn projects(&self) -> &dyn Table<Project>;

    fn tasks(&self) -> &dyn Table<Task>;

    /// Existence check addressed by kind, used for parent validation.
    async fn exists_in(&self, kind: Kind, id: &str) -> Result<bool> {
        match kind {
            Kind::Area => self.areas().exists(id).await,
            Kind::Project => self.projects().exists(id).await,
            Kind::Task => self.tasks().exists(id).await,
        }
    }

    /// Number of rows whose parent reference is `id`.
    ///
    /// The default lists the children; both backends override it with a
    /// `COUNT(*)` query.
    async fn count_children(&self, parent: Kind, id: &str) -> Result<usize> {
        Ok(match parent {
            Kind::Area => self.projects().list(Some(id)).await?.len(),
            Kind::Project => self.tasks().list(Some(id)).await?.len(),
            Kind::Task => 0,
        })
    }

    /// Releases the underlying connection. Later calls fail.
    async fn close(&self) -> Result<()>;
}

/// Child kind and its parent column for rows of `parent`, if it has children.
pub(crate) fn child_column(parent: Kind) -> Option<(Kind, &'static str)> {
    let schema = match parent {
        Kind::Area => Project::SCHEMA,
        Kind::Project => Task::SCHEMA,
        Kind::Task => return None,
    };
    schema.parent.map(|link| (schema.kind, link.field))
}

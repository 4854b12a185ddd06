//! Builder for creating and configuring Planner instances.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use log::info;
use tokio::task;

use super::Planner;
use crate::{
    error::{PlannerError, Result},
    store::{EntityStore, PostgresStore, SqliteStore},
};

/// Which backend the planner should open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    /// SQLite file; `None` means the XDG default location
    Sqlite(Option<PathBuf>),
    /// Private in-memory SQLite database
    SqliteInMemory,
    /// PostgreSQL connection string, handed to the driver as is
    Postgres(String),
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::Sqlite(None)
    }
}

/// Builder for creating and configuring Planner instances.
#[derive(Default)]
pub struct PlannerBuilder {
    config: StoreConfig,
    store: Option<Arc<dyn EntityStore>>,
}

impl PlannerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom SQLite database file path.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/planner/planner.db` or `~/.local/share/planner/planner.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.config = StoreConfig::Sqlite(Some(path.as_ref().to_path_buf()));
        }
        self
    }

    /// Uses a private in-memory SQLite database.
    pub fn in_memory(mut self) -> Self {
        self.config = StoreConfig::SqliteInMemory;
        self
    }

    /// Uses a PostgreSQL server reached through `connection_string`.
    pub fn with_postgres(mut self, connection_string: impl Into<String>) -> Self {
        self.config = StoreConfig::Postgres(connection_string.into());
        self
    }

    pub fn with_config(mut self, config: StoreConfig) -> Self {
        self.config = config;
        self
    }

    /// Uses an already opened store, ignoring any backend configuration.
    pub fn with_store(mut self, store: Arc<dyn EntityStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Opens the configured store, applies migrations and builds the planner.
    ///
    /// # Errors
    ///
    /// Returns `PlannerError::FileSystem` if the database directory cannot be
    /// created, `PlannerError::XdgDirectory` if no default path is available,
    /// and `PlannerError::Database` / `PlannerError::Postgres` if opening or
    /// migrating the store fails.
    pub async fn build(self) -> Result<Planner> {
        if let Some(store) = self.store {
            return Ok(Planner::new(store));
        }

        let store: Arc<dyn EntityStore> = match self.config {
            StoreConfig::Sqlite(path) => {
                let db_path = match path {
                    Some(path) => path,
                    None => Self::default_database_path()?,
                };

                if let Some(parent) = db_path.parent()
                    && !parent.as_os_str().is_empty()
                {
                    std::fs::create_dir_all(parent).map_err(|e| PlannerError::FileSystem {
                        path: parent.to_path_buf(),
                        source: e,
                    })?;
                }

                info!("Opening SQLite store at {}", db_path.display());
                Arc::new(task::spawn_blocking(move || SqliteStore::open(&db_path)).await??)
            }
            StoreConfig::SqliteInMemory => {
                Arc::new(task::spawn_blocking(SqliteStore::open_in_memory).await??)
            }
            StoreConfig::Postgres(connection_string) => {
                info!("Connecting to PostgreSQL store");
                Arc::new(PostgresStore::connect(&connection_string).await?)
            }
        };

        Ok(Planner::new(store))
    }

    /// Returns the default database path following XDG Base Directory
    /// specification.
    pub fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("planner")
            .place_data_file("planner.db")
            .map_err(|e| PlannerError::XdgDirectory(e.to_string()))
    }
}

//! Core library for the planner: an Areas → Projects → Tasks hierarchy.
//!
//! This crate holds the domain models, the generic domain service that
//! enforces the hierarchy's rules, and the entity store with its SQLite and
//! PostgreSQL backends. Transports (the RPC host, the CLI, the MCP surface)
//! sit on top of [`Planner`].
//!
//! # Quick Start
//!
//! ```rust
//! use planner_core::{
//!     FieldUpdate, PlannerBuilder,
//!     models::TaskPatch,
//!     params::{CreateArea, CreateProject, CreateTask},
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let planner = PlannerBuilder::new().in_memory().build().await?;
//!
//! let home = planner
//!     .areas()
//!     .create(&CreateArea {
//!         name: "Home".to_string(),
//!         description: Some("House and garden".to_string()),
//!     })
//!     .await?;
//! let renovation = planner
//!     .projects()
//!     .create(&CreateProject {
//!         name: "Renovation".to_string(),
//!         area_id: home.id.clone(),
//!     })
//!     .await?;
//! let task = planner
//!     .tasks()
//!     .create(&CreateTask {
//!         name: "Buy paint".to_string(),
//!         notes: String::new(),
//!         project_id: renovation.id.clone(),
//!     })
//!     .await?;
//!
//! let patch = TaskPatch {
//!     notes: FieldUpdate::Set("Two coats".to_string()),
//!     ..Default::default()
//! };
//! let task = planner.tasks().update(&task.id, &patch).await?;
//! assert_eq!(task.notes, "Two coats");
//! # Ok(())
//! # }
//! ```

pub mod display;
pub mod error;
pub mod models;
pub mod params;
pub mod planner;
pub mod service;
pub mod store;

// Re-export commonly used types
pub use display::{Areas, CreateResult, DeleteResult, LocalDateTime, Projects, Tasks, UpdateResult};
pub use error::{ErrorKind, PlannerError, Result};
pub use models::{
    Area, AreaPatch, EntityKind, FieldUpdate, Kind, Project, ProjectPatch, Task, TaskPatch,
};
pub use params::{
    CreateArea, CreateProject, CreateTask, Id, ListAreas, ListProjects, ListTasks, UpdateArea,
    UpdateProject, UpdateTask,
};
pub use planner::{Planner, PlannerBuilder, StoreConfig};
pub use service::{AreaService, EntityService, ProjectService, TaskService};
pub use store::{EntityStore, PostgresStore, SqliteStore, Table};

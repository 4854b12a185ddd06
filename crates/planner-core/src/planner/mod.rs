//! High-level planner API.
//!
//! [`Planner`] ties one [`EntityStore`] to the three domain services. It is
//! cheap to clone and is what the transport host and the MCP surface hold.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │    Planner      │    │ EntityService<K>│    │   EntityStore   │
//! │ areas/projects/ │───▶│  validation +   │───▶│ SQLite/Postgres │
//! │     tasks       │    │  parent checks  │    │                 │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust
//! use planner_core::{PlannerBuilder, params::{CreateArea, CreateProject}};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let planner = PlannerBuilder::new().in_memory().build().await?;
//!
//! let home = planner
//!     .areas()
//!     .create(&CreateArea {
//!         name: "Home".to_string(),
//!         description: None,
//!     })
//!     .await?;
//!
//! let renovation = planner
//!     .projects()
//!     .create(&CreateProject {
//!         name: "Renovation".to_string(),
//!         area_id: home.id.clone(),
//!     })
//!     .await?;
//!
//! assert_eq!(renovation.area_id, home.id);
//! planner.close().await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use log::info;

use crate::{
    error::Result,
    service::{AreaService, ProjectService, TaskService},
    store::EntityStore,
};

pub mod builder;


pub use builder::{PlannerBuilder, StoreConfig};

/// Main planner interface: the store plus its three services.
#[derive(Clone)]
pub struct Planner {
    store: Arc<dyn EntityStore>,
    areas: AreaService,
    projects: ProjectService,
    tasks: TaskService,
}

impl Planner {
    /// Wraps an already opened store.
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self {
            areas: AreaService::new(Arc::clone(&store)),
            projects: ProjectService::new(Arc::clone(&store)),
            tasks: TaskService::new(Arc::clone(&store)),
            store,
        }
    }

    pub fn areas(&self) -> &AreaService {
        &self.areas
    }

    pub fn projects(&self) -> &ProjectService {
        &self.projects
    }

    pub fn tasks(&self) -> &TaskService {
        &self.tasks
    }

    /// Closes the underlying store. Services fail afterwards.
    pub async fn close(&self) -> Result<()> {
        self.store.close().await?;
        info!("Planner store closed");
        Ok(())
    }
}

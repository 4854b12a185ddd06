//! Parameter structures for planner operations.
//!
//! These are the request shapes shared by every interface: the RPC transport
//! sends them as JSON bodies, the CLI converts its clap arguments into them,
//! and the MCP surface wraps them with `#[serde(transparent)]`. JSON schema
//! derives are only compiled in with the `schema` feature.

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::models::{AreaPatch, ProjectPatch, TaskPatch};

/// Generic parameters for operations requiring just an ID.
///
/// Used by get and delete for every entity kind.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct Id {
    /// The ID of the resource to operate on
    pub id: String,
}

impl From<&str> for Id {
    fn from(id: &str) -> Self {
        Self { id: id.to_string() }
    }
}

/// Parameters for creating an area.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct CreateArea {
    /// Name of the area (required)
    pub name: String,
    /// Optional description
    #[serde(default)]
    pub description: Option<String>,
}

/// Parameters for creating a project inside an existing area.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct CreateProject {
    /// Name of the project (required)
    pub name: String,
    /// ID of the owning area (required, must exist)
    pub area_id: String,
}

/// Parameters for creating a task inside an existing project.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct CreateTask {
    /// Name of the task (required)
    pub name: String,
    /// Free-form notes
    #[serde(default)]
    pub notes: String,
    /// ID of the owning project (required, must exist)
    pub project_id: String,
}

/// Parameters for listing areas.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ListAreas {}

/// Parameters for listing projects, optionally within one area.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ListProjects {
    /// Only return projects of this area. Empty means all projects.
    #[serde(default)]
    pub area_id: Option<String>,
}

/// Parameters for listing tasks, optionally within one project.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ListTasks {
    /// Only return tasks of this project. Empty means all tasks.
    #[serde(default)]
    pub project_id: Option<String>,
}

/// Parameters for a sparse area update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct UpdateArea {
    /// The ID of the area to update
    pub id: String,
    #[serde(flatten)]
    pub changes: AreaPatch,
}

/// Parameters for a sparse project update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct UpdateProject {
    /// The ID of the project to update
    pub id: String,
    #[serde(flatten)]
    pub changes: ProjectPatch,
}

/// Parameters for a sparse task update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct UpdateTask {
    /// The ID of the task to update
    pub id: String,
    #[serde(flatten)]
    pub changes: TaskPatch,
}

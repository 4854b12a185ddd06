//! Task model definition.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{EntityKind, FieldUpdate, Kind, ParentLink, Schema};
use crate::{
    params::CreateTask,
    store::{EntityStore, Table},
};

/// A single actionable item inside a project.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    /// Unique identifier (UUID v4)
    pub id: String,

    pub name: String,

    /// Free-form notes, stored verbatim (may be empty)
    #[serde(default)]
    pub notes: String,

    /// Owning project. Checked only when the task is created.
    pub project_id: String,

    /// Timestamp when the task was created (UTC)
    pub created_at: Timestamp,

    /// Timestamp when the task was last modified (UTC)
    pub updated_at: Timestamp,
}

/// Field changes for a task update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct TaskPatch {
    /// New name for the task
    #[serde(default, skip_serializing_if = "FieldUpdate::is_unchanged")]
    pub name: FieldUpdate<String>,

    /// Replacement notes; an empty string clears them
    #[serde(default, skip_serializing_if = "FieldUpdate::is_unchanged")]
    pub notes: FieldUpdate<String>,
}

impl EntityKind for Task {
    const SCHEMA: Schema = Schema {
        kind: Kind::Task,
        parent: Some(ParentLink {
            kind: Kind::Project,
            field: "project_id",
        }),
        child: None,
    };

    type Create = CreateTask;
    type Patch = TaskPatch;

    fn table(store: &dyn EntityStore) -> &dyn Table<Self> {
        store.tasks()
    }

    fn name(params: &CreateTask) -> &str {
        &params.name
    }

    fn parent_id(params: &CreateTask) -> Option<&str> {
        Some(&params.project_id)
    }

    fn build(id: String, params: &CreateTask, now: Timestamp) -> Self {
        Self {
            id,
            name: params.name.clone(),
            notes: params.notes.clone(),
            project_id: params.project_id.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    fn patch_name(patch: &TaskPatch) -> &FieldUpdate<String> {
        &patch.name
    }

    fn id(&self) -> &str {
        &self.id
    }
}

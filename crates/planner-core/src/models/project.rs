//! Project model definition.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{EntityKind, FieldUpdate, Kind, ParentLink, Schema};
use crate::{
    params::CreateProject,
    store::{EntityStore, Table},
};

/// A finite outcome inside an area.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    /// Unique identifier (UUID v4)
    pub id: String,

    pub name: String,

    /// Owning area. Checked only when the project is created.
    pub area_id: String,

    /// Timestamp when the project was created (UTC)
    pub created_at: Timestamp,

    /// Timestamp when the project was last modified (UTC)
    pub updated_at: Timestamp,
}

/// Field changes for a project update. Only the name is mutable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct ProjectPatch {
    /// New name for the project
    #[serde(default, skip_serializing_if = "FieldUpdate::is_unchanged")]
    pub name: FieldUpdate<String>,
}

impl EntityKind for Project {
    const SCHEMA: Schema = Schema {
        kind: Kind::Project,
        parent: Some(ParentLink {
            kind: Kind::Area,
            field: "area_id",
        }),
        child: Some(Kind::Task),
    };

    type Create = CreateProject;
    type Patch = ProjectPatch;

    fn table(store: &dyn EntityStore) -> &dyn Table<Self> {
        store.projects()
    }

    fn name(params: &CreateProject) -> &str {
        &params.name
    }

    fn parent_id(params: &CreateProject) -> Option<&str> {
        Some(&params.area_id)
    }

    fn build(id: String, params: &CreateProject, now: Timestamp) -> Self {
        Self {
            id,
            name: params.name.clone(),
            area_id: params.area_id.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    fn patch_name(patch: &ProjectPatch) -> &FieldUpdate<String> {
        &patch.name
    }

    fn id(&self) -> &str {
        &self.id
    }
}

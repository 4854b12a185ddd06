//! Area model: the root of the hierarchy.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{EntityKind, FieldUpdate, Kind, Schema};
use crate::{
    params::CreateArea,
    store::{EntityStore, Table},
};

/// A broad sphere of responsibility, e.g. "Home" or "Work".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Area {
    /// Unique identifier (UUID v4)
    pub id: String,

    pub name: String,

    /// Free-form description; empty descriptions are stored as absent
    pub description: Option<String>,

    /// Timestamp when the area was created (UTC)
    pub created_at: Timestamp,

    /// Timestamp when the area was last modified (UTC)
    pub updated_at: Timestamp,
}

/// Field changes for an area update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct AreaPatch {
    /// New name for the area
    #[serde(default, skip_serializing_if = "FieldUpdate::is_unchanged")]
    pub name: FieldUpdate<String>,

    /// New description; an empty string clears it
    #[serde(default, skip_serializing_if = "FieldUpdate::is_unchanged")]
    pub description: FieldUpdate<String>,
}

impl EntityKind for Area {
    const SCHEMA: Schema = Schema {
        kind: Kind::Area,
        parent: None,
        child: Some(Kind::Project),
    };

    type Create = CreateArea;
    type Patch = AreaPatch;

    fn table(store: &dyn EntityStore) -> &dyn Table<Self> {
        store.areas()
    }

    fn name(params: &CreateArea) -> &str {
        &params.name
    }

    fn parent_id(_params: &CreateArea) -> Option<&str> {
        None
    }

    fn build(id: String, params: &CreateArea, now: Timestamp) -> Self {
        Self {
            id,
            name: params.name.clone(),
            description: params.description.clone().filter(|d| !d.is_empty()),
            created_at: now,
            updated_at: now,
        }
    }

    fn patch_name(patch: &AreaPatch) -> &FieldUpdate<String> {
        &patch.name
    }

    fn id(&self) -> &str {
        &self.id
    }
}

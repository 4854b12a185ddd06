//! Entity kinds and the per-kind rules shared by the generic service.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::FieldUpdate;
use crate::store::{EntityStore, Table};

/// The three levels of the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Area,
    Project,
    Task,
}

impl Kind {
    /// Lowercase singular name, as used in messages.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Kind::Area => "area",
            Kind::Project => "project",
            Kind::Task => "task",
        }
    }

    /// Name of the backing table.
    pub const fn table(&self) -> &'static str {
        match self {
            Kind::Area => "areas",
            Kind::Project => "projects",
            Kind::Task => "tasks",
        }
    }
}

/// Reference from a child row to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParentLink {
    /// Kind the reference points at
    pub kind: Kind,
    /// Name of the referencing field, e.g. `area_id`
    pub field: &'static str,
}

/// Static shape of an entity kind within the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    pub kind: Kind,
    pub parent: Option<ParentLink>,
    pub child: Option<Kind>,
}

/// Per-kind hooks used by [`crate::service::EntityService`].
///
/// Everything that differs between Area, Project and Task lives here or in
/// [`Schema`]; the create / get / list / update / delete protocol itself is
/// written once.
pub trait EntityKind: Clone + Send + Sync + Sized + 'static {
    const SCHEMA: Schema;

    /// Parameters accepted by `create`.
    type Create: Send + Sync;

    /// Sparse field changes accepted by `update`.
    type Patch: Send + Sync;

    /// Selects this kind's table from a store.
    fn table(store: &dyn EntityStore) -> &dyn Table<Self>;

    fn name(params: &Self::Create) -> &str;

    /// Parent reference carried by the create parameters, if the kind has one.
    fn parent_id(params: &Self::Create) -> Option<&str>;

    /// Builds a fresh row with `created_at == updated_at == now`.
    fn build(id: String, params: &Self::Create, now: Timestamp) -> Self;

    fn patch_name(patch: &Self::Patch) -> &FieldUpdate<String>;

    fn id(&self) -> &str;
}

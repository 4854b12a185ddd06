//! Domain services for the hierarchy.
//!
//! A single [`EntityService`] implements the create / get / list / update /
//! delete protocol for every kind; [`AreaService`], [`ProjectService`] and
//! [`TaskService`] are its three instantiations.
//!
//! Validation always runs before anything is written:
//!
//! 1. required fields (`id`, `name`, the parent reference) must be non-empty
//! 2. for children, the parent must exist at creation time
//! 3. updates and deletes check that the target exists first
//!
//! Deleting a parent does not cascade. Children keep their now dangling
//! reference and the number left behind is logged.

use std::{marker::PhantomData, sync::Arc};

use jiff::Timestamp;
use log::{debug, warn};
use uuid::Uuid;

use crate::{
    error::{PlannerError, Result},
    models::{Area, EntityKind, FieldUpdate, Project, Task},
    store::{EntityStore, Table},
};


pub type AreaService = EntityService<Area>;
pub type ProjectService = EntityService<Project>;
pub type TaskService = EntityService<Task>;

/// CRUD service for one entity kind.
pub struct EntityService<K> {
    store: Arc<dyn EntityStore>,
    _kind: PhantomData<fn() -> K>,
}

impl<K> Clone for EntityService<K> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _kind: PhantomData,
        }
    }
}

impl<K: EntityKind> EntityService<K> {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self {
            store,
            _kind: PhantomData,
        }
    }

    fn table(&self) -> &dyn Table<K> {
        K::table(self.store.as_ref())
    }

    /// Creates a new entity with a fresh id.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if the name or the parent reference is empty
    /// - `NotFound` if the parent does not exist
    /// - `Store` if the insert fails
    pub async fn create(&self, params: &K::Create) -> Result<K> {
        let schema = K::SCHEMA;

        if K::name(params).is_empty() {
            return Err(PlannerError::invalid_argument("name").with_reason("name is required"));
        }

        if let Some(link) = schema.parent {
            let parent_id = K::parent_id(params).unwrap_or_default();
            if parent_id.is_empty() {
                return Err(PlannerError::invalid_argument(link.field)
                    .with_reason(format!("{} is required", link.field)));
            }
            let exists = self
                .store
                .exists_in(link.kind, parent_id)
                .await
                .map_err(PlannerError::store("look up", link.kind))?;
            if !exists {
                return Err(PlannerError::not_found(link.kind, parent_id));
            }
        }

        let row = K::build(Uuid::new_v4().to_string(), params, Timestamp::now());
        let created = self
            .table()
            .insert(row)
            .await
            .map_err(PlannerError::store("create", schema.kind))?;

        debug!("Created {} {}", schema.kind, created.id());
        Ok(created)
    }

    /// Fetches one entity by id.
    pub async fn get(&self, id: &str) -> Result<K> {
        let kind = K::SCHEMA.kind;
        require_id(id)?;
        self.table()
            .get(id)
            .await
            .map_err(PlannerError::store("get", kind))
    }

    /// Lists entities in insertion order.
    ///
    /// For child kinds `parent` restricts the result to one parent; an empty
    /// string means no filter. Root kinds ignore it.
    pub async fn list(&self, parent: Option<&str>) -> Result<Vec<K>> {
        let kind = K::SCHEMA.kind;
        let parent = parent
            .filter(|p| !p.is_empty())
            .filter(|_| K::SCHEMA.parent.is_some());
        self.table()
            .list(parent)
            .await
            .map_err(PlannerError::store("list", kind))
    }

    /// Applies the `Set` fields of `patch` and refreshes `updated_at`.
    ///
    /// An empty patch still succeeds and only advances `updated_at`.
    pub async fn update(&self, id: &str, patch: &K::Patch) -> Result<K> {
        let kind = K::SCHEMA.kind;
        require_id(id)?;

        if let FieldUpdate::Set(name) = K::patch_name(patch)
            && name.is_empty()
        {
            return Err(PlannerError::invalid_argument("name").with_reason("name cannot be empty"));
        }

        self.ensure_exists(id).await?;

        let updated = self
            .table()
            .update(id, patch, Timestamp::now())
            .await
            .map_err(PlannerError::store("update", kind))?;

        debug!("Updated {kind} {id}");
        Ok(updated)
    }

    /// Removes one entity. Children are left in place.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let kind = K::SCHEMA.kind;
        require_id(id)?;

        self.ensure_exists(id).await?;

        self.table()
            .delete(id)
            .await
            .map_err(PlannerError::store("delete", kind))?;

        if let Some(child) = K::SCHEMA.child {
            match self.store.count_children(kind, id).await {
                Ok(0) => {}
                Ok(orphans) => warn!(
                    "Deleted {kind} {id}; {orphans} {} still reference it",
                    child.table()
                ),
                Err(e) => warn!(
                    "Deleted {kind} {id}; could not count remaining {}: {e}",
                    child.table()
                ),
            }
        }

        debug!("Deleted {kind} {id}");
        Ok(())
    }

    async fn ensure_exists(&self, id: &str) -> Result<()> {
        let kind = K::SCHEMA.kind;
        let exists = self
            .table()
            .exists(id)
            .await
            .map_err(PlannerError::store("look up", kind))?;
        if exists {
            Ok(())
        } else {
            Err(PlannerError::not_found(kind, id))
        }
    }
}

fn require_id(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(PlannerError::invalid_argument("id").with_reason("id is required"));
    }
    Ok(())
}

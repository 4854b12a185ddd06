//! Result wrapper types for displaying operation outcomes.

use std::fmt;

use crate::models::{EntityKind, Kind};

/// Wrapper type for displaying the result of create operations.
pub struct CreateResult<K> {
    pub resource: K,
}

impl<K> CreateResult<K> {
    pub fn new(resource: K) -> Self {
        Self { resource }
    }
}

impl<K: EntityKind + fmt::Display> fmt::Display for CreateResult<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Created {} with ID: {}",
            K::SCHEMA.kind,
            self.resource.id()
        )?;
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

/// Wrapper type for displaying the result of update operations.
///
/// Optionally lists which fields were changed.
pub struct UpdateResult<K> {
    pub resource: K,
    pub changes: Vec<String>,
}

impl<K> UpdateResult<K> {
    pub fn new(resource: K) -> Self {
        Self {
            resource,
            changes: Vec::new(),
        }
    }

    /// Create an UpdateResult with a list of changes made.
    pub fn with_changes(resource: K, changes: Vec<String>) -> Self {
        Self { resource, changes }
    }
}

impl<K: EntityKind + fmt::Display> fmt::Display for UpdateResult<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Updated {} with ID: {}",
            K::SCHEMA.kind,
            self.resource.id()
        )?;

        if !self.changes.is_empty() {
            writeln!(f)?;
            writeln!(f, "Changes made:")?;
            for change in &self.changes {
                writeln!(f, "- {change}")?;
            }
        }

        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

/// Confirmation for a delete. Only the id is known once the row is gone.
pub struct DeleteResult {
    pub kind: Kind,
    pub id: String,
}

impl DeleteResult {
    pub fn new(kind: Kind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }
}

impl fmt::Display for DeleteResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Deleted {} with ID: {}", self.kind, self.id)
    }
}

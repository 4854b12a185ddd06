//! Collection wrapper types for displaying lists of entities.

use std::{fmt, ops::Index};

use super::models::Summary;
use crate::models::{Area, EntityKind, Project, Task};

/// Newtype wrapper for displaying a list of entities of one kind.
///
/// Empty lists render as a short "No … found." line.
pub struct Entities<K>(pub Vec<K>);

pub type Areas = Entities<Area>;
pub type Projects = Entities<Project>;
pub type Tasks = Entities<Task>;

impl<K> Entities<K> {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, K> {
        self.0.iter()
    }
}

impl<K> Index<usize> for Entities<K> {
    type Output = K;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<K> IntoIterator for Entities<K> {
    type Item = K;
    type IntoIter = std::vec::IntoIter<K>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a, K> IntoIterator for &'a Entities<K> {
    type Item = &'a K;
    type IntoIter = std::slice::Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<K> From<Vec<K>> for Entities<K> {
    fn from(items: Vec<K>) -> Self {
        Self(items)
    }
}

impl<K: EntityKind + Summary> fmt::Display for Entities<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No {} found.", K::SCHEMA.kind.table());
        }
        for item in &self.0 {
            item.fmt_summary(f)?;
        }
        Ok(())
    }
}

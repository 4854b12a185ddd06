//! Data models for areas, projects and tasks.
//!
//! The hierarchy is fixed: an [`Area`] owns [`Project`]s, a project owns
//! [`Task`]s. Each model implements [`EntityKind`], which together with its
//! [`Schema`] is all the generic service needs to know about it.
//!
//! Display implementations live in [`crate::display::models`].

pub mod area;
pub mod field;
pub mod kind;
pub mod project;
pub mod task;


pub use area::{Area, AreaPatch};
pub use field::FieldUpdate;
pub use kind::{EntityKind, Kind, ParentLink, Schema};
pub use project::{Project, ProjectPatch};
pub use task::{Task, TaskPatch};

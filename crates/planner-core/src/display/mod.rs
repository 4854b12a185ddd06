//! Display formatting for entities and operation results.
//!
//! Domain models implement [`std::fmt::Display`] directly (see [`models`]);
//! this module adds newtype wrappers for lists and for create / update /
//! delete outcomes. Everything renders as markdown so the CLI can hand it to
//! the terminal renderer and the MCP surface can return it verbatim.
//!
//! ```rust
//! use jiff::Timestamp;
//! use planner_core::{display::CreateResult, models::Area};
//!
//! let area = Area {
//!     id: "0b5d".to_string(),
//!     name: "Home".to_string(),
//!     description: None,
//!     created_at: Timestamp::UNIX_EPOCH,
//!     updated_at: Timestamp::UNIX_EPOCH,
//! };
//!
//! let output = CreateResult::new(area).to_string();
//! assert!(output.starts_with("Created area with ID: 0b5d"));
//! ```

pub mod collections;
pub mod datetime;
pub mod models;
pub mod results;

pub use collections::{Areas, Entities, Projects, Tasks};
pub use datetime::LocalDateTime;
pub use models::Summary;
pub use results::{CreateResult, DeleteResult, UpdateResult};

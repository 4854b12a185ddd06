//! Display implementations for domain models.
//!
//! Full `Display` is used when a single entity is shown; [`Summary`] is the
//! compact form used inside lists.

use std::fmt;

use super::datetime::LocalDateTime;
use crate::models::{Area, Kind, Project, Task};

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compact, list-friendly rendering of an entity.
pub trait Summary {
    fn fmt_summary(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}", self.name)?;
        writeln!(f)?;
        writeln!(f, "- ID: {}", self.id)?;
        writeln!(f, "- Created: {}", LocalDateTime(&self.created_at))?;
        writeln!(f, "- Updated: {}", LocalDateTime(&self.updated_at))?;

        if let Some(desc) = &self.description {
            writeln!(f)?;
            writeln!(f, "{desc}")?;
        }

        Ok(())
    }
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}", self.name)?;
        writeln!(f)?;
        writeln!(f, "- ID: {}", self.id)?;
        writeln!(f, "- Area: {}", self.area_id)?;
        writeln!(f, "- Created: {}", LocalDateTime(&self.created_at))?;
        writeln!(f, "- Updated: {}", LocalDateTime(&self.updated_at))
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}", self.name)?;
        writeln!(f)?;
        writeln!(f, "- ID: {}", self.id)?;
        writeln!(f, "- Project: {}", self.project_id)?;
        writeln!(f, "- Created: {}", LocalDateTime(&self.created_at))?;
        writeln!(f, "- Updated: {}", LocalDateTime(&self.updated_at))?;

        if !self.notes.is_empty() {
            writeln!(f)?;
            writeln!(f, "## Notes")?;
            writeln!(f)?;
            writeln!(f, "{}", self.notes)?;
        }

        Ok(())
    }
}

impl Summary for Area {
    fn fmt_summary(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## {} (ID: {})", self.name, self.id)?;
        writeln!(f)?;
        if let Some(desc) = &self.description {
            writeln!(f, "- **Description**: {desc}")?;
        }
        writeln!(f, "- **Created**: {}", LocalDateTime(&self.created_at))?;
        writeln!(f)
    }
}

impl Summary for Project {
    fn fmt_summary(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## {} (ID: {})", self.name, self.id)?;
        writeln!(f)?;
        writeln!(f, "- **Area**: {}", self.area_id)?;
        writeln!(f, "- **Created**: {}", LocalDateTime(&self.created_at))?;
        writeln!(f)
    }
}

impl Summary for Task {
    fn fmt_summary(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## {} (ID: {})", self.name, self.id)?;
        writeln!(f)?;
        writeln!(f, "- **Project**: {}", self.project_id)?;
        if let Some(first_line) = self.notes.lines().next() {
            writeln!(f, "- **Notes**: {first_line}")?;
        }
        writeln!(f, "- **Created**: {}", LocalDateTime(&self.created_at))?;
        writeln!(f)
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use super::*;

    fn task(notes: &str) -> Task {
        Task {
            id: "t1".to_string(),
            name: "Buy paint".to_string(),
            notes: notes.to_string(),
            project_id: "p1".to_string(),
            created_at: Timestamp::from_second(1640995200).unwrap(),
            updated_at: Timestamp::from_second(1641081600).unwrap(),
        }
    }

    #[test]
    fn test_task_display_includes_notes_section() {
        let output = task("Two coats\nwhite").to_string();
        assert!(output.starts_with("# Buy paint\n"));
        assert!(output.contains("- Project: p1"));
        assert!(output.contains("## Notes\n\nTwo coats\nwhite"));

        let output = task("").to_string();
        assert!(!output.contains("## Notes"));
    }

    #[test]
    fn test_area_without_description() {
        let area = Area {
            id: "a1".to_string(),
            name: "Home".to_string(),
            description: None,
            created_at: Timestamp::from_second(1640995200).unwrap(),
            updated_at: Timestamp::from_second(1640995200).unwrap(),
        };
        let output = area.to_string();
        assert!(output.contains("- ID: a1"));
        assert!(output.trim_end().ends_with(&LocalDateTime(&area.updated_at).to_string()));
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(Kind::Project.to_string(), "project");
    }
}

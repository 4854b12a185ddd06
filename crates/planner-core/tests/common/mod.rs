#![allow(dead_code)]

use planner_core::{
    Area, Planner, PlannerBuilder, Project, Task,
    params::{CreateArea, CreateProject, CreateTask},
};
use tempfile::TempDir;

/// Helper function to create a test planner backed by a temporary file
pub async fn create_test_planner() -> (TempDir, Planner) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let planner = PlannerBuilder::new()
        .with_database_path(Some(&db_path))
        .build()
        .await
        .expect("Failed to create planner");
    (temp_dir, planner)
}

pub async fn create_area(planner: &Planner, name: &str) -> Area {
    planner
        .areas()
        .create(&CreateArea {
            name: name.to_string(),
            description: None,
        })
        .await
        .expect("Failed to create area")
}

pub async fn create_project(planner: &Planner, name: &str, area_id: &str) -> Project {
    planner
        .projects()
        .create(&CreateProject {
            name: name.to_string(),
            area_id: area_id.to_string(),
        })
        .await
        .expect("Failed to create project")
}

pub async fn create_task(planner: &Planner, name: &str, project_id: &str) -> Task {
    planner
        .tasks()
        .create(&CreateTask {
            name: name.to_string(),
            notes: String::new(),
            project_id: project_id.to_string(),
        })
        .await
        .expect("Failed to create task")
}

/// PostgreSQL connection string for backend tests, if one is configured
pub fn postgres_url() -> Option<String> {
    std::env::var("PLANNER_TEST_POSTGRES")
        .ok()
        .filter(|url| !url.is_empty())
}

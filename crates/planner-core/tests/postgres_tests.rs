//! Runs against a live PostgreSQL server when `PLANNER_TEST_POSTGRES` holds a
//! connection string; otherwise each test returns early.

mod common;

use common::{create_area, create_project, create_task, postgres_url};
use planner_core::{ErrorKind, FieldUpdate, PlannerBuilder, TaskPatch};

#[tokio::test]
async fn test_postgres_hierarchy_round_trip() {
    let Some(url) = postgres_url() else {
        eprintln!("PLANNER_TEST_POSTGRES not set, skipping");
        return;
    };

    let planner = PlannerBuilder::new()
        .with_postgres(url)
        .build()
        .await
        .expect("Failed to connect");

    let area = create_area(&planner, "Home").await;
    let project = create_project(&planner, "Renovation", &area.id).await;
    let task = create_task(&planner, "Buy paint", &project.id).await;

    assert_eq!(planner.areas().get(&area.id).await.unwrap(), area);
    let listed = planner.tasks().list(Some(&project.id)).await.unwrap();
    assert_eq!(listed, vec![task.clone()]);

    let updated = planner
        .tasks()
        .update(
            &task.id,
            &TaskPatch {
                name: FieldUpdate::Unchanged,
                notes: FieldUpdate::Set("Two coats".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.notes, "Two coats");
    assert_eq!(updated.created_at, task.created_at);

    planner.areas().delete(&area.id).await.unwrap();
    assert_eq!(
        planner.areas().delete(&area.id).await.unwrap_err().kind(),
        ErrorKind::NotFound
    );
    assert_eq!(planner.projects().get(&project.id).await.unwrap(), project);

    planner.tasks().delete(&task.id).await.unwrap();
    planner.projects().delete(&project.id).await.unwrap();
    planner.close().await.unwrap();
}

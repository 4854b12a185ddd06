use jiff::{Timestamp, ToSpan};

use super::SqliteStore;
use crate::{
    error::ErrorKind,
    models::{Area, AreaPatch, FieldUpdate, Kind, Project, Task, TaskPatch},
    store::EntityStore,
};

fn at(second: i64) -> Timestamp {
    Timestamp::from_second(second).unwrap()
}

fn area(id: &str, name: &str) -> Area {
    Area {
        id: id.to_string(),
        name: name.to_string(),
        description: None,
        created_at: at(1_700_000_000),
        updated_at: at(1_700_000_000),
    }
}

fn project(id: &str, area_id: &str) -> Project {
    Project {
        id: id.to_string(),
        name: format!("Project {id}"),
        area_id: area_id.to_string(),
        created_at: at(1_700_000_000),
        updated_at: at(1_700_000_000),
    }
}

fn task(id: &str, project_id: &str) -> Task {
    Task {
        id: id.to_string(),
        name: format!("Task {id}"),
        notes: String::new(),
        project_id: project_id.to_string(),
        created_at: at(1_700_000_000),
        updated_at: at(1_700_000_000),
    }
}

#[tokio::test]
async fn test_insert_and_get_round_trip() {
    let store = SqliteStore::open_in_memory().unwrap();
    let stored = store.areas().insert(area("a1", "Home")).await.unwrap();
    let fetched = store.areas().get("a1").await.unwrap();
    assert_eq!(stored, fetched);
}

#[tokio::test]
async fn test_list_preserves_insertion_order() {
    let store = SqliteStore::open_in_memory().unwrap();
    for id in ["z", "a", "m"] {
        store.areas().insert(area(id, id)).await.unwrap();
    }
    let ids: Vec<String> = store
        .areas()
        .list(None)
        .await
        .unwrap()
        .into_iter()
        .map(|a| a.id)
        .collect();
    assert_eq!(ids, ["z", "a", "m"]);
}

#[tokio::test]
async fn test_list_filters_by_parent() {
    let store = SqliteStore::open_in_memory().unwrap();
    store.projects().insert(project("p1", "a1")).await.unwrap();
    store.projects().insert(project("p2", "a2")).await.unwrap();
    store.projects().insert(project("p3", "a1")).await.unwrap();

    let in_a1 = store.projects().list(Some("a1")).await.unwrap();
    assert_eq!(in_a1.len(), 2);
    assert!(in_a1.iter().all(|p| p.area_id == "a1"));
    assert_eq!(store.projects().list(None).await.unwrap().len(), 3);
    assert!(store.projects().list(Some("nope")).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_update_only_touches_set_fields() {
    let store = SqliteStore::open_in_memory().unwrap();
    let mut original = area("a1", "Home");
    original.description = Some("House".to_string());
    store.areas().insert(original.clone()).await.unwrap();

    let later = original.updated_at + 1.hour();
    let patch = AreaPatch {
        name: FieldUpdate::Set("Household".to_string()),
        description: FieldUpdate::Unchanged,
    };
    let updated = store.areas().update("a1", &patch, later).await.unwrap();

    assert_eq!(updated.name, "Household");
    assert_eq!(updated.description.as_deref(), Some("House"));
    assert_eq!(updated.created_at, original.created_at);
    assert_eq!(updated.updated_at, later);
}

#[tokio::test]
async fn test_update_sets_empty_values() {
    let store = SqliteStore::open_in_memory().unwrap();
    let mut original = task("t1", "p1");
    original.notes = "Two coats".to_string();
    store.tasks().insert(original).await.unwrap();

    let patch = TaskPatch {
        name: FieldUpdate::Unchanged,
        notes: FieldUpdate::Set(String::new()),
    };
    let updated = store.tasks().update("t1", &patch, at(1_800_000_000)).await.unwrap();
    assert_eq!(updated.notes, "");
    assert_eq!(updated.name, "Task t1");
}

#[tokio::test]
async fn test_clearing_area_description_stores_null() {
    let store = SqliteStore::open_in_memory().unwrap();
    let mut original = area("a1", "Home");
    original.description = Some("House".to_string());
    store.areas().insert(original).await.unwrap();

    let patch = AreaPatch {
        name: FieldUpdate::Unchanged,
        description: FieldUpdate::Set(String::new()),
    };
    let updated = store.areas().update("a1", &patch, at(1_800_000_000)).await.unwrap();
    assert_eq!(updated.description, None);
}

#[tokio::test]
async fn test_missing_rows_report_not_found() {
    let store = SqliteStore::open_in_memory().unwrap();

    let err = store.tasks().get("missing").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = store
        .tasks()
        .update("missing", &TaskPatch::default(), at(0))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = store.tasks().delete("missing").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_delete_leaves_children_in_place() {
    let store = SqliteStore::open_in_memory().unwrap();
    store.projects().insert(project("p1", "a1")).await.unwrap();
    store.tasks().insert(task("t1", "p1")).await.unwrap();

    store.projects().delete("p1").await.unwrap();

    assert!(!store.projects().exists("p1").await.unwrap());
    assert!(store.tasks().exists("t1").await.unwrap());
    assert_eq!(store.count_children(Kind::Project, "p1").await.unwrap(), 1);
}

#[tokio::test]
async fn test_exists_in_dispatches_by_kind() {
    let store = SqliteStore::open_in_memory().unwrap();
    store.areas().insert(area("shared", "Shared")).await.unwrap();

    assert!(store.exists_in(Kind::Area, "shared").await.unwrap());
    assert!(!store.exists_in(Kind::Project, "shared").await.unwrap());
    assert!(!store.exists_in(Kind::Task, "shared").await.unwrap());
}

#[tokio::test]
async fn test_closed_store_rejects_calls() {
    let store = SqliteStore::open_in_memory().unwrap();
    store.close().await.unwrap();
    // A second close is a no-op
    store.close().await.unwrap();

    let err = store.areas().list(None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Internal);
}

#[tokio::test]
async fn test_reopening_file_keeps_schema_version() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let path = temp_dir.path().join("planner.db");

    let store = SqliteStore::open(&path).unwrap();
    store.areas().insert(area("a1", "Home")).await.unwrap();
    store.close().await.unwrap();

    let reopened = SqliteStore::open(&path).unwrap();
    assert_eq!(reopened.areas().get("a1").await.unwrap().name, "Home");
}

#[tokio::test]
async fn test_count_children_counts_only_direct_children() {
    let store = SqliteStore::open_in_memory().unwrap();
    store.areas().insert(area("a1", "Home")).await.unwrap();
    store.projects().insert(project("p1", "a1")).await.unwrap();
    store.projects().insert(project("p2", "a1")).await.unwrap();
    store.projects().insert(project("p3", "a2")).await.unwrap();
    store.tasks().insert(task("t1", "p1")).await.unwrap();

    assert_eq!(store.count_children(Kind::Area, "a1").await.unwrap(), 2);
    assert_eq!(store.count_children(Kind::Project, "p1").await.unwrap(), 1);
    assert_eq!(store.count_children(Kind::Project, "p2").await.unwrap(), 0);
    assert_eq!(store.count_children(Kind::Task, "t1").await.unwrap(), 0);

    // Rows left behind by a deleted parent are still counted
    store.areas().delete("a1").await.unwrap();
    assert_eq!(store.count_children(Kind::Area, "a1").await.unwrap(), 2);
}

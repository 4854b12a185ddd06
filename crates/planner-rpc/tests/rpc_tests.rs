use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use jiff::Timestamp;
use planner_core::{
    Area, AreaPatch, EntityStore, ErrorKind, FieldUpdate, PlannerBuilder, Project, ProjectPatch,
    SqliteStore, Table, Task, TaskPatch,
    params::{CreateArea, CreateProject, CreateTask, UpdateArea, UpdateProject, UpdateTask},
};
use planner_rpc::{PlannerClient, RpcServer, TIMEOUT_HEADER};

/// Store whose task listing takes `delay` to answer.
struct SlowTaskStore {
    inner: SqliteStore,
    delay: Duration,
}

#[async_trait]
impl Table<Task> for SlowTaskStore {
    async fn insert(&self, row: Task) -> planner_core::Result<Task> {
        self.inner.tasks().insert(row).await
    }

    async fn get(&self, id: &str) -> planner_core::Result<Task> {
        self.inner.tasks().get(id).await
    }

    async fn list(&self, parent: Option<&str>) -> planner_core::Result<Vec<Task>> {
        tokio::time::sleep(self.delay).await;
        self.inner.tasks().list(parent).await
    }

    async fn exists(&self, id: &str) -> planner_core::Result<bool> {
        self.inner.tasks().exists(id).await
    }

    async fn update(
        &self,
        id: &str,
        patch: &TaskPatch,
        updated_at: Timestamp,
    ) -> planner_core::Result<Task> {
        self.inner.tasks().update(id, patch, updated_at).await
    }

    async fn delete(&self, id: &str) -> planner_core::Result<()> {
        self.inner.tasks().delete(id).await
    }
}

#[async_trait]
impl EntityStore for SlowTaskStore {
    fn areas(&self) -> &dyn Table<Area> {
        self.inner.areas()
    }

    fn projects(&self) -> &dyn Table<Project> {
        self.inner.projects()
    }

    fn tasks(&self) -> &dyn Table<Task> {
        self
    }

    async fn close(&self) -> planner_core::Result<()> {
        self.inner.close().await
    }
}

async fn start_server() -> (RpcServer, PlannerClient) {
    let planner = PlannerBuilder::new()
        .in_memory()
        .build()
        .await
        .expect("Failed to create planner");
    let mut server = RpcServer::new(planner);
    let address = server.start("127.0.0.1:0").await.expect("Failed to start");
    let client = PlannerClient::new(address.to_string()).expect("Failed to create client");
    (server, client)
}

async fn start_slow_server(delay: Duration) -> (RpcServer, PlannerClient) {
    let store = SlowTaskStore {
        inner: SqliteStore::open_in_memory().expect("Failed to open store"),
        delay,
    };
    let planner = PlannerBuilder::new()
        .with_store(Arc::new(store))
        .build()
        .await
        .expect("Failed to create planner");
    let mut server = RpcServer::new(planner);
    let address = server.start("127.0.0.1:0").await.expect("Failed to start");
    let client = PlannerClient::new(address.to_string()).expect("Failed to create client");
    (server, client)
}

#[tokio::test]
async fn test_full_hierarchy_over_the_wire() {
    let (mut server, client) = start_server().await;

    let home = client
        .create_area(&CreateArea {
            name: "Home".to_string(),
            description: Some("House and garden".to_string()),
        })
        .await
        .unwrap();
    let renovation = client
        .create_project(&CreateProject {
            name: "Renovation".to_string(),
            area_id: home.id.clone(),
        })
        .await
        .unwrap();
    let paint = client
        .create_task(&CreateTask {
            name: "Buy paint".to_string(),
            notes: String::new(),
            project_id: renovation.id.clone(),
        })
        .await
        .unwrap();

    assert_eq!(client.get_area(&home.id).await.unwrap(), home);
    assert_eq!(client.get_project(&renovation.id).await.unwrap(), renovation);
    assert_eq!(client.get_task(&paint.id).await.unwrap(), paint);
    assert_eq!(client.list_areas().await.unwrap(), vec![home.clone()]);
    assert_eq!(
        client.list_projects(Some(&home.id)).await.unwrap(),
        vec![renovation.clone()]
    );
    assert_eq!(
        client.list_tasks(Some(&renovation.id)).await.unwrap(),
        vec![paint.clone()]
    );

    let updated = client
        .update_task(&UpdateTask {
            id: paint.id.clone(),
            changes: TaskPatch {
                name: FieldUpdate::Unchanged,
                notes: FieldUpdate::Set("Two coats".to_string()),
            },
        })
        .await
        .unwrap();
    assert_eq!(updated.name, "Buy paint");
    assert_eq!(updated.notes, "Two coats");
    assert_eq!(updated.created_at, paint.created_at);

    client.delete_area(&home.id).await.unwrap();
    let orphan = client.get_project(&renovation.id).await.unwrap();
    assert_eq!(orphan.area_id, home.id);

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_error_kinds_survive_the_round_trip() {
    let (mut server, client) = start_server().await;

    let err = client
        .create_area(&CreateArea {
            name: String::new(),
            description: None,
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);

    let err = client
        .create_project(&CreateProject {
            name: "Renovation".to_string(),
            area_id: "missing".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = client
        .update_area(&UpdateArea {
            id: "missing".to_string(),
            changes: AreaPatch {
                name: FieldUpdate::Set("Work".to_string()),
                description: FieldUpdate::Unchanged,
            },
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = client.delete_task("missing").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_double_delete_over_the_wire() {
    let (mut server, client) = start_server().await;
    let area = client
        .create_area(&CreateArea {
            name: "Home".to_string(),
            description: None,
        })
        .await
        .unwrap();

    client.delete_area(&area.id).await.unwrap();
    let err = client.delete_area(&area.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_update_after_delete_over_the_wire() {
    let (mut server, client) = start_server().await;
    let home = client
        .create_area(&CreateArea {
            name: "Home".to_string(),
            description: None,
        })
        .await
        .unwrap();
    let renovation = client
        .create_project(&CreateProject {
            name: "Renovation".to_string(),
            area_id: home.id.clone(),
        })
        .await
        .unwrap();

    client.delete_project(&renovation.id).await.unwrap();
    let err = client
        .update_project(&UpdateProject {
            id: renovation.id.clone(),
            changes: ProjectPatch::default(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_malformed_body_is_invalid_argument() {
    let (mut server, client) = start_server().await;

    let response = reqwest::Client::new()
        .post(format!("{}/rpc/CreateArea", client.base_url()))
        .header("content-type", "application/json")
        .body(r#"{"description": 42}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"]["code"], "invalid_argument");

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_server_enforces_caller_deadline() {
    let (mut server, client) = start_slow_server(Duration::from_millis(500)).await;

    let response = reqwest::Client::new()
        .post(format!("{}/rpc/ListTasks", client.base_url()))
        .header(TIMEOUT_HEADER, "50")
        .json(&serde_json::json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 504);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"]["code"], "deadline_exceeded");

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_client_deadline_is_deadline_exceeded() {
    let (mut server, client) = start_slow_server(Duration::from_millis(500)).await;
    let client = client.with_timeout(Duration::from_millis(50));

    let err = client.list_tasks(None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DeadlineExceeded);

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_stop_waits_for_in_flight_calls() {
    let (mut server, client) = start_slow_server(Duration::from_millis(300)).await;

    let in_flight = tokio::spawn(async move { client.list_tasks(None).await });
    tokio::time::sleep(Duration::from_millis(50)).await;

    server.stop().await.unwrap();
    assert!(server.address().is_none());

    let tasks = in_flight.await.unwrap().unwrap();
    assert!(tasks.is_empty());
}

#[tokio::test]
async fn test_lifecycle() {
    let (mut server, client) = start_server().await;
    assert!(server.address().is_some());

    let health = client.health().await.unwrap();
    assert_eq!(health.status, "ok");

    let err = server.start("127.0.0.1:0").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Internal);

    server.stop().await.unwrap();
    // Stopping twice is harmless
    server.stop().await.unwrap();

    let err = client.list_areas().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Internal);
}

#[tokio::test]
async fn test_bind_failure_is_reported() {
    let (mut first, _client) = start_server().await;
    let taken = first.address().unwrap().to_string();

    let planner = PlannerBuilder::new().in_memory().build().await.unwrap();
    let mut second = RpcServer::new(planner);
    let err = second.start(&taken).await.unwrap_err();
    assert!(matches!(err, planner_core::PlannerError::Bind { .. }));

    first.stop().await.unwrap();
}

//! Transport host: serves the planner services over JSON/HTTP.

use std::{error::Error as StdError, future::Future, net::SocketAddr, time::Duration};

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use log::{debug, error, info, warn};
use planner_core::{
    ErrorKind, Planner, PlannerError, Result,
    params::{
        CreateArea, CreateProject, CreateTask, Id, ListAreas, ListProjects, ListTasks, UpdateArea,
        UpdateProject, UpdateTask,
    },
};
use tokio::{net::TcpListener, sync::oneshot, task::JoinHandle};

use crate::wire::{
    AreaReply, AreasReply, DeleteReply, ErrorBody, ErrorEnvelope, HEALTH_PATH, HealthReply,
    ProjectReply, ProjectsReply, TIMEOUT_HEADER, TaskReply, TasksReply, ops, rpc_path,
};

/// Hosts the fifteen planner operations on a TCP listener.
///
/// `start` binds and returns immediately; `stop` stops accepting, waits for
/// in-flight calls to finish and then returns. Dropping a running server
/// signals shutdown without waiting.
pub struct RpcServer {
    planner: Planner,
    running: Option<Running>,
}

struct Running {
    address: SocketAddr,
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<std::io::Result<()>>,
}

impl RpcServer {
    pub fn new(planner: Planner) -> Self {
        Self {
            planner,
            running: None,
        }
    }

    /// Binds `address` (e.g. `127.0.0.1:0`) and starts serving.
    ///
    /// # Errors
    ///
    /// `PlannerError::Bind` if the address cannot be bound,
    /// `PlannerError::Configuration` if the server is already running.
    pub async fn start(&mut self, address: &str) -> Result<SocketAddr> {
        if let Some(running) = &self.running {
            return Err(PlannerError::Configuration {
                message: format!("server already listening on {}", running.address),
            });
        }

        let bind_error = |source| PlannerError::Bind {
            address: address.to_string(),
            source,
        };
        let listener = TcpListener::bind(address).await.map_err(bind_error)?;
        let local = listener.local_addr().map_err(bind_error)?;

        let (shutdown, signal) = oneshot::channel::<()>();
        let app = router(self.planner.clone());
        let task = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    signal.await.ok();
                })
                .await
        });

        info!("RPC server listening on {local}");
        self.running = Some(Running {
            address: local,
            shutdown,
            task,
        });
        Ok(local)
    }

    /// Stops the server and waits for in-flight calls. Calling it again, or
    /// on a server that never started, does nothing.
    pub async fn stop(&mut self) -> Result<()> {
        let Some(running) = self.running.take() else {
            return Ok(());
        };

        // The receiver is gone only if the serve task already exited
        running.shutdown.send(()).ok();
        match running.task.await? {
            Ok(()) => {
                info!("RPC server on {} stopped", running.address);
                Ok(())
            }
            Err(e) => Err(PlannerError::Transport {
                message: format!("server on {} failed: {e}", running.address),
            }),
        }
    }

    /// Bound address while running.
    pub fn address(&self) -> Option<SocketAddr> {
        self.running.as_ref().map(|r| r.address)
    }
}

impl Drop for RpcServer {
    fn drop(&mut self) {
        if let Some(running) = self.running.take() {
            warn!("RPC server on {} dropped while running", running.address);
            running.shutdown.send(()).ok();
        }
    }
}

/// Builds the axum router for `planner`.
pub fn router(planner: Planner) -> Router {
    Router::new()
        .route(HEALTH_PATH, get(health))
        .route(&rpc_path(ops::CREATE_AREA), post(create_area))
        .route(&rpc_path(ops::GET_AREA), post(get_area))
        .route(&rpc_path(ops::LIST_AREAS), post(list_areas))
        .route(&rpc_path(ops::UPDATE_AREA), post(update_area))
        .route(&rpc_path(ops::DELETE_AREA), post(delete_area))
        .route(&rpc_path(ops::CREATE_PROJECT), post(create_project))
        .route(&rpc_path(ops::GET_PROJECT), post(get_project))
        .route(&rpc_path(ops::LIST_PROJECTS), post(list_projects))
        .route(&rpc_path(ops::UPDATE_PROJECT), post(update_project))
        .route(&rpc_path(ops::DELETE_PROJECT), post(delete_project))
        .route(&rpc_path(ops::CREATE_TASK), post(create_task))
        .route(&rpc_path(ops::GET_TASK), post(get_task))
        .route(&rpc_path(ops::LIST_TASKS), post(list_tasks))
        .route(&rpc_path(ops::UPDATE_TASK), post(update_task))
        .route(&rpc_path(ops::DELETE_TASK), post(delete_task))
        .with_state(planner)
}

/// A failed call, rendered as an [`ErrorEnvelope`].
#[derive(Debug)]
pub struct RpcFailure {
    status: StatusCode,
    body: ErrorBody,
}

impl RpcFailure {
    fn from_error(op: &str, error: PlannerError) -> Self {
        let code = error.kind();
        let message = match (&error, code) {
            (PlannerError::Store { .. }, ErrorKind::Internal) => {
                error!("{op} failed: {}", error_chain(&error));
                error.to_string()
            }
            (_, ErrorKind::Internal) => {
                error!("{op} failed: {}", error_chain(&error));
                format!("{op} failed")
            }
            _ => {
                debug!("{op} rejected: {error}");
                error.to_string()
            }
        };
        Self {
            status: status_for(code),
            body: ErrorBody { code, message },
        }
    }

    fn rejected(rejection: &JsonRejection) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: ErrorBody {
                code: ErrorKind::InvalidArgument,
                message: rejection.body_text(),
            },
        }
    }

    fn bad_deadline(value: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: ErrorBody {
                code: ErrorKind::InvalidArgument,
                message: format!("invalid {TIMEOUT_HEADER} header: '{value}'"),
            },
        }
    }
}

impl IntoResponse for RpcFailure {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorEnvelope { error: self.body })).into_response()
    }
}

fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::InvalidArgument => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::DeadlineExceeded => StatusCode::GATEWAY_TIMEOUT,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_chain(error: &dyn StdError) -> String {
    let mut chain = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        chain.push_str(": ");
        chain.push_str(&cause.to_string());
        source = cause.source();
    }
    chain
}

fn deadline(headers: &HeaderMap) -> std::result::Result<Option<Duration>, RpcFailure> {
    let Some(value) = headers.get(TIMEOUT_HEADER) else {
        return Ok(None);
    };
    let raw = value.to_str().unwrap_or_default();
    raw.trim()
        .parse::<u64>()
        .map(|ms| Some(Duration::from_millis(ms)))
        .map_err(|_| RpcFailure::bad_deadline(raw))
}

/// Runs one service call under the caller's deadline, if any.
///
/// On expiry the call's future is dropped and the caller sees
/// `deadline_exceeded`.
async fn dispatch<T>(
    headers: &HeaderMap,
    op: &'static str,
    call: impl Future<Output = Result<T>>,
) -> std::result::Result<T, RpcFailure> {
    let outcome = match deadline(headers)? {
        Some(limit) => match tokio::time::timeout(limit, call).await {
            Ok(outcome) => outcome,
            Err(_) => Err(PlannerError::DeadlineExceeded {
                message: format!("{op} did not finish within {}ms", limit.as_millis()),
            }),
        },
        None => call.await,
    };
    outcome.map_err(|e| RpcFailure::from_error(op, e))
}

type Reply<T> = std::result::Result<Json<T>, RpcFailure>;

async fn health() -> Json<HealthReply> {
    Json(HealthReply {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn create_area(
    State(planner): State<Planner>,
    headers: HeaderMap,
    payload: std::result::Result<Json<CreateArea>, JsonRejection>,
) -> Reply<AreaReply> {
    let Json(params) = payload.map_err(|r| RpcFailure::rejected(&r))?;
    let area = dispatch(&headers, ops::CREATE_AREA, planner.areas().create(&params)).await?;
    Ok(Json(AreaReply { area }))
}

async fn get_area(
    State(planner): State<Planner>,
    headers: HeaderMap,
    payload: std::result::Result<Json<Id>, JsonRejection>,
) -> Reply<AreaReply> {
    let Json(params) = payload.map_err(|r| RpcFailure::rejected(&r))?;
    let area = dispatch(&headers, ops::GET_AREA, planner.areas().get(&params.id)).await?;
    Ok(Json(AreaReply { area }))
}

async fn list_areas(
    State(planner): State<Planner>,
    headers: HeaderMap,
    payload: std::result::Result<Json<ListAreas>, JsonRejection>,
) -> Reply<AreasReply> {
    let Json(_params) = payload.map_err(|r| RpcFailure::rejected(&r))?;
    let areas = dispatch(&headers, ops::LIST_AREAS, planner.areas().list(None)).await?;
    Ok(Json(AreasReply { areas }))
}

async fn update_area(
    State(planner): State<Planner>,
    headers: HeaderMap,
    payload: std::result::Result<Json<UpdateArea>, JsonRejection>,
) -> Reply<AreaReply> {
    let Json(params) = payload.map_err(|r| RpcFailure::rejected(&r))?;
    let area = dispatch(
        &headers,
        ops::UPDATE_AREA,
        planner.areas().update(&params.id, &params.changes),
    )
    .await?;
    Ok(Json(AreaReply { area }))
}

async fn delete_area(
    State(planner): State<Planner>,
    headers: HeaderMap,
    payload: std::result::Result<Json<Id>, JsonRejection>,
) -> Reply<DeleteReply> {
    let Json(params) = payload.map_err(|r| RpcFailure::rejected(&r))?;
    dispatch(&headers, ops::DELETE_AREA, planner.areas().delete(&params.id)).await?;
    Ok(Json(DeleteReply { success: true }))
}

async fn create_project(
    State(planner): State<Planner>,
    headers: HeaderMap,
    payload: std::result::Result<Json<CreateProject>, JsonRejection>,
) -> Reply<ProjectReply> {
    let Json(params) = payload.map_err(|r| RpcFailure::rejected(&r))?;
    let project = dispatch(
        &headers,
        ops::CREATE_PROJECT,
        planner.projects().create(&params),
    )
    .await?;
    Ok(Json(ProjectReply { project }))
}

async fn get_project(
    State(planner): State<Planner>,
    headers: HeaderMap,
    payload: std::result::Result<Json<Id>, JsonRejection>,
) -> Reply<ProjectReply> {
    let Json(params) = payload.map_err(|r| RpcFailure::rejected(&r))?;
    let project = dispatch(&headers, ops::GET_PROJECT, planner.projects().get(&params.id)).await?;
    Ok(Json(ProjectReply { project }))
}

async fn list_projects(
    State(planner): State<Planner>,
    headers: HeaderMap,
    payload: std::result::Result<Json<ListProjects>, JsonRejection>,
) -> Reply<ProjectsReply> {
    let Json(params) = payload.map_err(|r| RpcFailure::rejected(&r))?;
    let projects = dispatch(
        &headers,
        ops::LIST_PROJECTS,
        planner.projects().list(params.area_id.as_deref()),
    )
    .await?;
    Ok(Json(ProjectsReply { projects }))
}

async fn update_project(
    State(planner): State<Planner>,
    headers: HeaderMap,
    payload: std::result::Result<Json<UpdateProject>, JsonRejection>,
) -> Reply<ProjectReply> {
    let Json(params) = payload.map_err(|r| RpcFailure::rejected(&r))?;
    let project = dispatch(
        &headers,
        ops::UPDATE_PROJECT,
        planner.projects().update(&params.id, &params.changes),
    )
    .await?;
    Ok(Json(ProjectReply { project }))
}

async fn delete_project(
    State(planner): State<Planner>,
    headers: HeaderMap,
    payload: std::result::Result<Json<Id>, JsonRejection>,
) -> Reply<DeleteReply> {
    let Json(params) = payload.map_err(|r| RpcFailure::rejected(&r))?;
    dispatch(
        &headers,
        ops::DELETE_PROJECT,
        planner.projects().delete(&params.id),
    )
    .await?;
    Ok(Json(DeleteReply { success: true }))
}

async fn create_task(
    State(planner): State<Planner>,
    headers: HeaderMap,
    payload: std::result::Result<Json<CreateTask>, JsonRejection>,
) -> Reply<TaskReply> {
    let Json(params) = payload.map_err(|r| RpcFailure::rejected(&r))?;
    let task = dispatch(&headers, ops::CREATE_TASK, planner.tasks().create(&params)).await?;
    Ok(Json(TaskReply { task }))
}

async fn get_task(
    State(planner): State<Planner>,
    headers: HeaderMap,
    payload: std::result::Result<Json<Id>, JsonRejection>,
) -> Reply<TaskReply> {
    let Json(params) = payload.map_err(|r| RpcFailure::rejected(&r))?;
    let task = dispatch(&headers, ops::GET_TASK, planner.tasks().get(&params.id)).await?;
    Ok(Json(TaskReply { task }))
}

async fn list_tasks(
    State(planner): State<Planner>,
    headers: HeaderMap,
    payload: std::result::Result<Json<ListTasks>, JsonRejection>,
) -> Reply<TasksReply> {
    let Json(params) = payload.map_err(|r| RpcFailure::rejected(&r))?;
    let tasks = dispatch(
        &headers,
        ops::LIST_TASKS,
        planner.tasks().list(params.project_id.as_deref()),
    )
    .await?;
    Ok(Json(TasksReply { tasks }))
}

async fn update_task(
    State(planner): State<Planner>,
    headers: HeaderMap,
    payload: std::result::Result<Json<UpdateTask>, JsonRejection>,
) -> Reply<TaskReply> {
    let Json(params) = payload.map_err(|r| RpcFailure::rejected(&r))?;
    let task = dispatch(
        &headers,
        ops::UPDATE_TASK,
        planner.tasks().update(&params.id, &params.changes),
    )
    .await?;
    Ok(Json(TaskReply { task }))
}

async fn delete_task(
    State(planner): State<Planner>,
    headers: HeaderMap,
    payload: std::result::Result<Json<Id>, JsonRejection>,
) -> Reply<DeleteReply> {
    let Json(params) = payload.map_err(|r| RpcFailure::rejected(&r))?;
    dispatch(&headers, ops::DELETE_TASK, planner.tasks().delete(&params.id)).await?;
    Ok(Json(DeleteReply { success: true }))
}

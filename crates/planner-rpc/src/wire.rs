//! JSON shapes exchanged between [`crate::RpcServer`] and
//! [`crate::PlannerClient`].
//!
//! Every operation is `POST /rpc/{Operation}` with the matching
//! `planner_core::params` struct as body. Successful replies wrap the entity
//! in a one-field object; failures use [`ErrorEnvelope`].

use planner_core::{Area, ErrorKind, Project, Task};
use serde::{Deserialize, Serialize};

/// Request header carrying the caller's deadline in milliseconds.
pub const TIMEOUT_HEADER: &str = "x-planner-timeout-ms";

pub const HEALTH_PATH: &str = "/health";

/// Operation names, as they appear in the request path.
pub mod ops {
    pub const CREATE_AREA: &str = "CreateArea";
    pub const GET_AREA: &str = "GetArea";
    pub const LIST_AREAS: &str = "ListAreas";
    pub const UPDATE_AREA: &str = "UpdateArea";
    pub const DELETE_AREA: &str = "DeleteArea";

    pub const CREATE_PROJECT: &str = "CreateProject";
    pub const GET_PROJECT: &str = "GetProject";
    pub const LIST_PROJECTS: &str = "ListProjects";
    pub const UPDATE_PROJECT: &str = "UpdateProject";
    pub const DELETE_PROJECT: &str = "DeleteProject";

    pub const CREATE_TASK: &str = "CreateTask";
    pub const GET_TASK: &str = "GetTask";
    pub const LIST_TASKS: &str = "ListTasks";
    pub const UPDATE_TASK: &str = "UpdateTask";
    pub const DELETE_TASK: &str = "DeleteTask";

    pub const ALL: [&str; 15] = [
        CREATE_AREA,
        GET_AREA,
        LIST_AREAS,
        UPDATE_AREA,
        DELETE_AREA,
        CREATE_PROJECT,
        GET_PROJECT,
        LIST_PROJECTS,
        UPDATE_PROJECT,
        DELETE_PROJECT,
        CREATE_TASK,
        GET_TASK,
        LIST_TASKS,
        UPDATE_TASK,
        DELETE_TASK,
    ];
}

/// Path for an operation, e.g. `/rpc/CreateArea`.
pub fn rpc_path(op: &str) -> String {
    format!("/rpc/{op}")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AreaReply {
    pub area: Area,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AreasReply {
    pub areas: Vec<Area>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectReply {
    pub project: Project,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectsReply {
    pub projects: Vec<Project>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskReply {
    pub task: Task,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TasksReply {
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteReply {
    pub success: bool,
}

/// Body of every failed call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: ErrorKind,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReply {
    pub status: String,
    pub version: String,
}

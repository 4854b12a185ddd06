//! Local client facade: one async method per remote operation.

use std::time::Duration;

use log::debug;
use planner_core::{
    Area, PlannerError, Project, Result, Task,
    params::{
        CreateArea, CreateProject, CreateTask, Id, ListAreas, ListProjects, ListTasks, UpdateArea,
        UpdateProject, UpdateTask,
    },
};
use serde::{Serialize, de::DeserializeOwned};

use crate::wire::{
    AreaReply, AreasReply, DeleteReply, ErrorEnvelope, HEALTH_PATH, HealthReply, ProjectReply,
    ProjectsReply, TIMEOUT_HEADER, TaskReply, TasksReply, ops, rpc_path,
};

/// Talks to an [`crate::RpcServer`].
///
/// Failures come back as `PlannerError::Remote` carrying the server's
/// [`planner_core::ErrorKind`], so callers branch on `err.kind()` exactly as
/// they would against the services directly.
#[derive(Debug, Clone)]
pub struct PlannerClient {
    http: reqwest::Client,
    base: String,
    timeout: Option<Duration>,
}

impl PlannerClient {
    /// Creates a client for `address` (`host:port` or a full `http://` URL).
    pub fn new(address: impl AsRef<str>) -> Result<Self> {
        let address = address.as_ref().trim_end_matches('/');
        let base = if address.starts_with("http://") || address.starts_with("https://") {
            address.to_string()
        } else {
            format!("http://{address}")
        };
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| PlannerError::Transport {
                message: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self {
            http,
            base,
            timeout: None,
        })
    }

    /// Applies a deadline to every call: sent to the server and enforced
    /// locally.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    async fn call<Req, Resp>(&self, op: &'static str, request: &Req) -> Result<Resp>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let url = format!("{}{}", self.base, rpc_path(op));
        let mut builder = self.http.post(&url).json(request);
        if let Some(timeout) = self.timeout {
            builder = builder
                .timeout(timeout)
                .header(TIMEOUT_HEADER, timeout.as_millis().to_string());
        }

        debug!("Calling {op}");
        let response = builder
            .send()
            .await
            .map_err(|e| transport_error(op, &e))?;

        if response.status().is_success() {
            return response
                .json::<Resp>()
                .await
                .map_err(|e| transport_error(op, &e));
        }

        let status = response.status();
        let envelope = response
            .json::<ErrorEnvelope>()
            .await
            .map_err(|e| PlannerError::Transport {
                message: format!("{op} failed with HTTP {status} and an unreadable body: {e}"),
            })?;
        Err(PlannerError::Remote {
            kind: envelope.error.code,
            message: envelope.error.message,
        })
    }

    /// Reports the server's status and version.
    pub async fn health(&self) -> Result<HealthReply> {
        let url = format!("{}{HEALTH_PATH}", self.base);
        let mut builder = self.http.get(&url);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let response = builder
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| transport_error("Health", &e))?;
        response
            .json()
            .await
            .map_err(|e| transport_error("Health", &e))
    }

    pub async fn create_area(&self, params: &CreateArea) -> Result<Area> {
        let reply: AreaReply = self.call(ops::CREATE_AREA, params).await?;
        Ok(reply.area)
    }

    pub async fn get_area(&self, id: &str) -> Result<Area> {
        let reply: AreaReply = self.call(ops::GET_AREA, &Id::from(id)).await?;
        Ok(reply.area)
    }

    pub async fn list_areas(&self) -> Result<Vec<Area>> {
        let reply: AreasReply = self.call(ops::LIST_AREAS, &ListAreas {}).await?;
        Ok(reply.areas)
    }

    pub async fn update_area(&self, params: &UpdateArea) -> Result<Area> {
        let reply: AreaReply = self.call(ops::UPDATE_AREA, params).await?;
        Ok(reply.area)
    }

    pub async fn delete_area(&self, id: &str) -> Result<()> {
        let reply: DeleteReply = self.call(ops::DELETE_AREA, &Id::from(id)).await?;
        confirm(ops::DELETE_AREA, &reply)
    }

    pub async fn create_project(&self, params: &CreateProject) -> Result<Project> {
        let reply: ProjectReply = self.call(ops::CREATE_PROJECT, params).await?;
        Ok(reply.project)
    }

    pub async fn get_project(&self, id: &str) -> Result<Project> {
        let reply: ProjectReply = self.call(ops::GET_PROJECT, &Id::from(id)).await?;
        Ok(reply.project)
    }

    /// Lists projects, optionally only those of one area.
    pub async fn list_projects(&self, area_id: Option<&str>) -> Result<Vec<Project>> {
        let params = ListProjects {
            area_id: area_id.map(String::from),
        };
        let reply: ProjectsReply = self.call(ops::LIST_PROJECTS, &params).await?;
        Ok(reply.projects)
    }

    pub async fn update_project(&self, params: &UpdateProject) -> Result<Project> {
        let reply: ProjectReply = self.call(ops::UPDATE_PROJECT, params).await?;
        Ok(reply.project)
    }

    pub async fn delete_project(&self, id: &str) -> Result<()> {
        let reply: DeleteReply = self.call(ops::DELETE_PROJECT, &Id::from(id)).await?;
        confirm(ops::DELETE_PROJECT, &reply)
    }

    pub async fn create_task(&self, params: &CreateTask) -> Result<Task> {
        let reply: TaskReply = self.call(ops::CREATE_TASK, params).await?;
        Ok(reply.task)
    }

    pub async fn get_task(&self, id: &str) -> Result<Task> {
        let reply: TaskReply = self.call(ops::GET_TASK, &Id::from(id)).await?;
        Ok(reply.task)
    }

    /// Lists tasks, optionally only those of one project.
    pub async fn list_tasks(&self, project_id: Option<&str>) -> Result<Vec<Task>> {
        let params = ListTasks {
            project_id: project_id.map(String::from),
        };
        let reply: TasksReply = self.call(ops::LIST_TASKS, &params).await?;
        Ok(reply.tasks)
    }

    pub async fn update_task(&self, params: &UpdateTask) -> Result<Task> {
        let reply: TaskReply = self.call(ops::UPDATE_TASK, params).await?;
        Ok(reply.task)
    }

    pub async fn delete_task(&self, id: &str) -> Result<()> {
        let reply: DeleteReply = self.call(ops::DELETE_TASK, &Id::from(id)).await?;
        confirm(ops::DELETE_TASK, &reply)
    }
}

fn confirm(op: &str, reply: &DeleteReply) -> Result<()> {
    if reply.success {
        Ok(())
    } else {
        Err(PlannerError::Transport {
            message: format!("{op} was not confirmed by the server"),
        })
    }
}

fn transport_error(op: &str, error: &reqwest::Error) -> PlannerError {
    if error.is_timeout() {
        PlannerError::DeadlineExceeded {
            message: format!("{op} timed out"),
        }
    } else {
        PlannerError::Transport {
            message: format!("{op} failed: {error}"),
        }
    }
}

//! MCP tool handlers.
//!
//! Every handler calls the planner through [`PlannerClient`] and answers
//! with the same markdown the shell prints.

use std::fmt::Display;

use log::debug;
use planner_core::{
    Areas, CreateResult, DeleteResult, Kind, Projects, Tasks, UpdateResult, params as core,
};
use planner_rpc::PlannerClient;
use rmcp::{
    ErrorData,
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::Deserialize;

use super::errors::to_mcp_error;
use crate::cli::ChangedFields;

/// Transparent wrapper adding MCP deserialization and schema generation to a
/// core parameter type.
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct McpParams<T>(T)
where
    T: JsonSchema;

impl<T> JsonSchema for McpParams<T>
where
    T: JsonSchema,
{
    fn schema_name() -> std::borrow::Cow<'static, str> {
        T::schema_name()
    }

    fn json_schema(g: &mut schemars::SchemaGenerator) -> schemars::Schema {
        T::json_schema(g)
    }
}

impl<T> AsRef<T> for McpParams<T>
where
    T: JsonSchema,
{
    fn as_ref(&self) -> &T {
        &self.0
    }
}

pub type Id = McpParams<core::Id>;
pub type CreateArea = McpParams<core::CreateArea>;
pub type ListAreas = McpParams<core::ListAreas>;
pub type UpdateArea = McpParams<core::UpdateArea>;
pub type CreateProject = McpParams<core::CreateProject>;
pub type ListProjects = McpParams<core::ListProjects>;
pub type UpdateProject = McpParams<core::UpdateProject>;
pub type CreateTask = McpParams<core::CreateTask>;
pub type ListTasks = McpParams<core::ListTasks>;
pub type UpdateTask = McpParams<core::UpdateTask>;

pub type McpResult = Result<CallToolResult, ErrorData>;

fn text(value: &impl Display) -> McpResult {
    Ok(CallToolResult::success(vec![Content::text(
        value.to_string(),
    )]))
}

pub struct McpHandlers {
    client: PlannerClient,
}

impl McpHandlers {
    pub fn new(client: PlannerClient) -> Self {
        Self { client }
    }

    pub async fn create_area(&self, Parameters(params): Parameters<CreateArea>) -> McpResult {
        debug!("create_area: {params:?}");
        let area = self
            .client
            .create_area(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to create area", &e))?;
        text(&CreateResult::new(area))
    }

    pub async fn get_area(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("get_area: {params:?}");
        let area = self
            .client
            .get_area(&params.as_ref().id)
            .await
            .map_err(|e| to_mcp_error("Failed to get area", &e))?;
        text(&area)
    }

    pub async fn list_areas(&self, Parameters(_params): Parameters<ListAreas>) -> McpResult {
        let areas = self
            .client
            .list_areas()
            .await
            .map_err(|e| to_mcp_error("Failed to list areas", &e))?;
        text(&Areas::from(areas))
    }

    pub async fn update_area(&self, Parameters(params): Parameters<UpdateArea>) -> McpResult {
        debug!("update_area: {params:?}");
        let params = params.as_ref();
        let area = self
            .client
            .update_area(params)
            .await
            .map_err(|e| to_mcp_error("Failed to update area", &e))?;
        text(&UpdateResult::with_changes(
            area,
            params.changes.changed_fields(),
        ))
    }

    pub async fn delete_area(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("delete_area: {params:?}");
        let id = &params.as_ref().id;
        self.client
            .delete_area(id)
            .await
            .map_err(|e| to_mcp_error("Failed to delete area", &e))?;
        text(&DeleteResult::new(Kind::Area, id.as_str()))
    }

    pub async fn create_project(
        &self,
        Parameters(params): Parameters<CreateProject>,
    ) -> McpResult {
        debug!("create_project: {params:?}");
        let project = self
            .client
            .create_project(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to create project", &e))?;
        text(&CreateResult::new(project))
    }

    pub async fn get_project(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("get_project: {params:?}");
        let project = self
            .client
            .get_project(&params.as_ref().id)
            .await
            .map_err(|e| to_mcp_error("Failed to get project", &e))?;
        text(&project)
    }

    pub async fn list_projects(
        &self,
        Parameters(params): Parameters<ListProjects>,
    ) -> McpResult {
        debug!("list_projects: {params:?}");
        let projects = self
            .client
            .list_projects(params.as_ref().area_id.as_deref())
            .await
            .map_err(|e| to_mcp_error("Failed to list projects", &e))?;
        text(&Projects::from(projects))
    }

    pub async fn update_project(
        &self,
        Parameters(params): Parameters<UpdateProject>,
    ) -> McpResult {
        debug!("update_project: {params:?}");
        let params = params.as_ref();
        let project = self
            .client
            .update_project(params)
            .await
            .map_err(|e| to_mcp_error("Failed to update project", &e))?;
        text(&UpdateResult::with_changes(
            project,
            params.changes.changed_fields(),
        ))
    }

    pub async fn delete_project(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("delete_project: {params:?}");
        let id = &params.as_ref().id;
        self.client
            .delete_project(id)
            .await
            .map_err(|e| to_mcp_error("Failed to delete project", &e))?;
        text(&DeleteResult::new(Kind::Project, id.as_str()))
    }

    pub async fn create_task(&self, Parameters(params): Parameters<CreateTask>) -> McpResult {
        debug!("create_task: {params:?}");
        let task = self
            .client
            .create_task(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to create task", &e))?;
        text(&CreateResult::new(task))
    }

    pub async fn get_task(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("get_task: {params:?}");
        let task = self
            .client
            .get_task(&params.as_ref().id)
            .await
            .map_err(|e| to_mcp_error("Failed to get task", &e))?;
        text(&task)
    }

    pub async fn list_tasks(&self, Parameters(params): Parameters<ListTasks>) -> McpResult {
        debug!("list_tasks: {params:?}");
        let tasks = self
            .client
            .list_tasks(params.as_ref().project_id.as_deref())
            .await
            .map_err(|e| to_mcp_error("Failed to list tasks", &e))?;
        text(&Tasks::from(tasks))
    }

    pub async fn update_task(&self, Parameters(params): Parameters<UpdateTask>) -> McpResult {
        debug!("update_task: {params:?}");
        let params = params.as_ref();
        let task = self
            .client
            .update_task(params)
            .await
            .map_err(|e| to_mcp_error("Failed to update task", &e))?;
        text(&UpdateResult::with_changes(
            task,
            params.changes.changed_fields(),
        ))
    }

    pub async fn delete_task(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("delete_task: {params:?}");
        let id = &params.as_ref().id;
        self.client
            .delete_task(id)
            .await
            .map_err(|e| to_mcp_error("Failed to delete task", &e))?;
        text(&DeleteResult::new(Kind::Task, id.as_str()))
    }
}

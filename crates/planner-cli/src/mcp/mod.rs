//! MCP server exposing the planner operations as tools over stdio.

use std::future::Future;

use anyhow::Result;
use log::{debug, error, info};
use planner_rpc::PlannerClient;
use rmcp::{
    ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};

use crate::app::shutdown_signal;

pub mod errors;
pub mod handlers;

pub use handlers::{
    CreateArea, CreateProject, CreateTask, Id, ListAreas, ListProjects, ListTasks, McpResult,
    UpdateArea, UpdateProject, UpdateTask,
};

const INSTRUCTIONS: &str = r#"Planner organises work in three levels.

## Concepts
- **Areas**: broad spheres of responsibility such as "Home" or "Work"
- **Projects**: outcomes inside an area; every project belongs to one area
- **Tasks**: concrete actions inside a project, with free-form notes

## Workflow
1. `list_areas` to find an area, or `create_area` to start one
2. `create_project` with the area's `area_id`
3. `create_task` with the project's `project_id`
4. `list_projects` / `list_tasks` accept an optional parent id to narrow the list

## Updates and deletes
- `update_*` only changes the fields you send; omitted fields are left alone
- Deleting an area or project does not delete its children. They remain and
  keep the id of the deleted parent."#;

#[derive(Clone)]
pub struct PlannerMcpServer {
    client: PlannerClient,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl PlannerMcpServer {
    pub fn new(client: PlannerClient) -> Self {
        Self {
            client,
            tool_router: Self::tool_router(),
        }
    }

    fn handlers(&self) -> handlers::McpHandlers {
        handlers::McpHandlers::new(self.client.clone())
    }

    #[tool(
        name = "create_area",
        description = "Create a new area of responsibility. Requires a non-empty name; description is optional. Returns the area with its generated ID."
    )]
    async fn create_area(&self, params: Parameters<CreateArea>) -> McpResult {
        self.handlers().create_area(params).await
    }

    #[tool(
        name = "get_area",
        description = "Show one area by ID, including its description and timestamps."
    )]
    async fn get_area(&self, params: Parameters<Id>) -> McpResult {
        self.handlers().get_area(params).await
    }

    #[tool(
        name = "list_areas",
        description = "List all areas in creation order with their IDs."
    )]
    async fn list_areas(&self, params: Parameters<ListAreas>) -> McpResult {
        self.handlers().list_areas(params).await
    }

    #[tool(
        name = "update_area",
        description = "Change an area's name and/or description. Only the fields provided are changed; an empty description clears it. The name cannot be set to an empty string."
    )]
    async fn update_area(&self, params: Parameters<UpdateArea>) -> McpResult {
        self.handlers().update_area(params).await
    }

    #[tool(
        name = "delete_area",
        description = "Delete an area. Its projects are not deleted; they keep referring to the removed area ID."
    )]
    async fn delete_area(&self, params: Parameters<Id>) -> McpResult {
        self.handlers().delete_area(params).await
    }

    #[tool(
        name = "create_project",
        description = "Create a project inside an existing area. Requires a non-empty name and the area_id of an area that exists."
    )]
    async fn create_project(&self, params: Parameters<CreateProject>) -> McpResult {
        self.handlers().create_project(params).await
    }

    #[tool(
        name = "get_project",
        description = "Show one project by ID, including the ID of its area."
    )]
    async fn get_project(&self, params: Parameters<Id>) -> McpResult {
        self.handlers().get_project(params).await
    }

    #[tool(
        name = "list_projects",
        description = "List projects in creation order. Pass area_id to only list the projects of that area."
    )]
    async fn list_projects(&self, params: Parameters<ListProjects>) -> McpResult {
        self.handlers().list_projects(params).await
    }

    #[tool(
        name = "update_project",
        description = "Rename a project. The project stays in its area."
    )]
    async fn update_project(&self, params: Parameters<UpdateProject>) -> McpResult {
        self.handlers().update_project(params).await
    }

    #[tool(
        name = "delete_project",
        description = "Delete a project. Its tasks are not deleted; they keep referring to the removed project ID."
    )]
    async fn delete_project(&self, params: Parameters<Id>) -> McpResult {
        self.handlers().delete_project(params).await
    }

    #[tool(
        name = "create_task",
        description = "Create a task inside an existing project. Requires a non-empty name and the project_id of a project that exists; notes are optional markdown."
    )]
    async fn create_task(&self, params: Parameters<CreateTask>) -> McpResult {
        self.handlers().create_task(params).await
    }

    #[tool(
        name = "get_task",
        description = "Show one task by ID, including its notes and the ID of its project."
    )]
    async fn get_task(&self, params: Parameters<Id>) -> McpResult {
        self.handlers().get_task(params).await
    }

    #[tool(
        name = "list_tasks",
        description = "List tasks in creation order. Pass project_id to only list the tasks of that project."
    )]
    async fn list_tasks(&self, params: Parameters<ListTasks>) -> McpResult {
        self.handlers().list_tasks(params).await
    }

    #[tool(
        name = "update_task",
        description = "Change a task's name and/or notes. Only the fields provided are changed; notes are replaced as a whole."
    )]
    async fn update_task(&self, params: Parameters<UpdateTask>) -> McpResult {
        self.handlers().update_task(params).await
    }

    #[tool(name = "delete_task", description = "Delete a task.")]
    async fn delete_task(&self, params: Parameters<Id>) -> McpResult {
        self.handlers().delete_task(params).await
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for PlannerMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "planner".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Implementation::from_build_env()
            },
            instructions: Some(INSTRUCTIONS.to_string()),
        }
    }
}

/// Serves MCP on stdio until the peer disconnects or a signal arrives.
pub async fn run_stdio_server(server: PlannerMcpServer) -> Result<()> {
    use rmcp::{ServiceExt, transport::stdio};

    info!("Starting planner MCP server on stdio");
    debug!(
        "Server created with {} tools",
        server.tool_router.list_all().len()
    );

    let service = server.serve(stdio()).await.inspect_err(|e| {
        error!("serving error: {e:?}");
    })?;

    tokio::select! {
        result = service.waiting() => match result {
            Ok(reason) => info!("MCP server stopped: {reason:?}"),
            Err(e) => error!("MCP server error: {e:?}"),
        },
        result = shutdown_signal() => result?,
    }

    info!("MCP server shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server() -> PlannerMcpServer {
        PlannerMcpServer::new(PlannerClient::new("127.0.0.1:50051").unwrap())
    }

    #[test]
    fn test_all_operations_are_tools() {
        let mut names: Vec<_> = server()
            .tool_router
            .list_all()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect();
        names.sort();
        assert_eq!(
            names,
            [
                "create_area",
                "create_project",
                "create_task",
                "delete_area",
                "delete_project",
                "delete_task",
                "get_area",
                "get_project",
                "get_task",
                "list_areas",
                "list_projects",
                "list_tasks",
                "update_area",
                "update_project",
                "update_task",
            ]
        );
    }

    #[test]
    fn test_server_info() {
        let info = server().get_info();
        assert_eq!(info.server_info.name, "planner");
        assert!(info.capabilities.tools.is_some());
        assert!(info.instructions.unwrap().contains("create_project"));
    }
}

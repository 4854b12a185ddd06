//! Shell subcommands and their handlers.
//!
//! Each subcommand has a clap argument struct that converts into the
//! matching `planner_core::params` type, so clap attributes never leak into
//! the core crate:
//!
//! ```text
//! User Input → clap Args → core params → PlannerClient → services
//! ```
//!
//! Handlers always go through [`PlannerClient`], whether the services run in
//! this process or behind `--server`.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use planner_core::{
    AreaPatch, Areas, CreateResult, DeleteResult, FieldUpdate, Kind, ProjectPatch, Projects,
    TaskPatch, Tasks, UpdateResult,
    params::{CreateArea, CreateProject, CreateTask, UpdateArea, UpdateProject, UpdateTask},
};
use planner_rpc::PlannerClient;

use crate::renderer::TerminalRenderer;

#[derive(Subcommand)]
pub enum AreaCommands {
    /// Create a new area
    Create(CreateAreaArgs),
    /// Show details of an area
    Show(IdArgs),
    /// List all areas
    List,
    /// Rename an area or change its description
    Update(UpdateAreaArgs),
    /// Delete an area. Its projects are kept and keep pointing at the deleted id
    Delete(IdArgs),
}

#[derive(Subcommand)]
pub enum ProjectCommands {
    /// Create a new project inside an area
    Create(CreateProjectArgs),
    /// Show details of a project
    Show(IdArgs),
    /// List projects, optionally only those of one area
    List(ListProjectsArgs),
    /// Rename a project
    Update(UpdateProjectArgs),
    /// Delete a project. Its tasks are kept
    Delete(IdArgs),
}

#[derive(Subcommand)]
pub enum TaskCommands {
    /// Create a new task inside a project
    Create(CreateTaskArgs),
    /// Show details of a task
    Show(IdArgs),
    /// List tasks, optionally only those of one project
    List(ListTasksArgs),
    /// Rename a task or replace its notes
    Update(UpdateTaskArgs),
    /// Delete a task
    Delete(IdArgs),
}

#[derive(Args)]
pub struct IdArgs {
    /// ID of the resource
    pub id: String,
}

#[derive(Args)]
pub struct CreateAreaArgs {
    /// Name of the area
    pub name: String,
    /// Optional description of the area
    #[arg(short, long)]
    pub description: Option<String>,
}

impl From<CreateAreaArgs> for CreateArea {
    fn from(args: CreateAreaArgs) -> Self {
        Self {
            name: args.name,
            description: args.description,
        }
    }
}

#[derive(Args)]
pub struct UpdateAreaArgs {
    /// ID of the area to update
    pub id: String,
    /// New name
    #[arg(short, long)]
    pub name: Option<String>,
    /// New description; pass an empty string to clear it
    #[arg(short, long)]
    pub description: Option<String>,
}

impl From<UpdateAreaArgs> for UpdateArea {
    fn from(args: UpdateAreaArgs) -> Self {
        Self {
            id: args.id,
            changes: AreaPatch {
                name: args.name.into(),
                description: args.description.into(),
            },
        }
    }
}

#[derive(Args)]
pub struct CreateProjectArgs {
    /// Name of the project
    pub name: String,
    /// ID of the owning area
    #[arg(short, long = "area")]
    pub area_id: String,
}

impl From<CreateProjectArgs> for CreateProject {
    fn from(args: CreateProjectArgs) -> Self {
        Self {
            name: args.name,
            area_id: args.area_id,
        }
    }
}

#[derive(Args)]
pub struct ListProjectsArgs {
    /// Only list projects of this area
    #[arg(short, long = "area")]
    pub area_id: Option<String>,
}

#[derive(Args)]
pub struct UpdateProjectArgs {
    /// ID of the project to update
    pub id: String,
    /// New name
    #[arg(short, long)]
    pub name: Option<String>,
}

impl From<UpdateProjectArgs> for UpdateProject {
    fn from(args: UpdateProjectArgs) -> Self {
        Self {
            id: args.id,
            changes: ProjectPatch {
                name: args.name.into(),
            },
        }
    }
}

#[derive(Args)]
pub struct CreateTaskArgs {
    /// Name of the task
    pub name: String,
    /// ID of the owning project
    #[arg(short, long = "project")]
    pub project_id: String,
    /// Free-form notes
    #[arg(long, default_value = "")]
    pub notes: String,
}

impl From<CreateTaskArgs> for CreateTask {
    fn from(args: CreateTaskArgs) -> Self {
        Self {
            name: args.name,
            notes: args.notes,
            project_id: args.project_id,
        }
    }
}

#[derive(Args)]
pub struct ListTasksArgs {
    /// Only list tasks of this project
    #[arg(short, long = "project")]
    pub project_id: Option<String>,
}

#[derive(Args)]
pub struct UpdateTaskArgs {
    /// ID of the task to update
    pub id: String,
    /// New name
    #[arg(short, long)]
    pub name: Option<String>,
    /// New notes, replacing the current ones
    #[arg(long)]
    pub notes: Option<String>,
}

impl From<UpdateTaskArgs> for UpdateTask {
    fn from(args: UpdateTaskArgs) -> Self {
        Self {
            id: args.id,
            changes: TaskPatch {
                name: args.name.into(),
                notes: args.notes.into(),
            },
        }
    }
}

/// Names of the fields a patch sets, for update confirmations.
pub trait ChangedFields {
    fn changed_fields(&self) -> Vec<String>;
}

fn collect(fields: &[(&str, bool)]) -> Vec<String> {
    fields
        .iter()
        .filter(|(_, set)| *set)
        .map(|(name, _)| (*name).to_string())
        .collect()
}

impl ChangedFields for AreaPatch {
    fn changed_fields(&self) -> Vec<String> {
        collect(&[
            ("name", self.name.is_set()),
            ("description", self.description.is_set()),
        ])
    }
}

impl ChangedFields for ProjectPatch {
    fn changed_fields(&self) -> Vec<String> {
        collect(&[("name", self.name.is_set())])
    }
}

impl ChangedFields for TaskPatch {
    fn changed_fields(&self) -> Vec<String> {
        collect(&[("name", self.name.is_set()), ("notes", self.notes.is_set())])
    }
}

/// Runs shell commands against a planner client.
pub struct Cli<'a> {
    client: &'a PlannerClient,
    renderer: TerminalRenderer,
}

impl<'a> Cli<'a> {
    pub fn new(client: &'a PlannerClient, renderer: TerminalRenderer) -> Self {
        Self { client, renderer }
    }

    pub async fn handle_area_command(&self, command: AreaCommands) -> Result<()> {
        match command {
            AreaCommands::Create(args) => {
                let area = self
                    .client
                    .create_area(&args.into())
                    .await
                    .context("Failed to create area")?;
                self.renderer.render(&CreateResult::new(area));
            }
            AreaCommands::Show(IdArgs { id }) => {
                let area = self
                    .client
                    .get_area(&id)
                    .await
                    .with_context(|| format!("Failed to get area {id}"))?;
                self.renderer.render(&area);
            }
            AreaCommands::List => self.list_areas().await?,
            AreaCommands::Update(args) => {
                let params = UpdateArea::from(args);
                let area = self
                    .client
                    .update_area(&params)
                    .await
                    .with_context(|| format!("Failed to update area {}", params.id))?;
                self.renderer.render(&UpdateResult::with_changes(
                    area,
                    params.changes.changed_fields(),
                ));
            }
            AreaCommands::Delete(IdArgs { id }) => {
                self.client
                    .delete_area(&id)
                    .await
                    .with_context(|| format!("Failed to delete area {id}"))?;
                self.renderer.render(&DeleteResult::new(Kind::Area, id));
            }
        }
        Ok(())
    }

    pub async fn handle_project_command(&self, command: ProjectCommands) -> Result<()> {
        match command {
            ProjectCommands::Create(args) => {
                let project = self
                    .client
                    .create_project(&args.into())
                    .await
                    .context("Failed to create project")?;
                self.renderer.render(&CreateResult::new(project));
            }
            ProjectCommands::Show(IdArgs { id }) => {
                let project = self
                    .client
                    .get_project(&id)
                    .await
                    .with_context(|| format!("Failed to get project {id}"))?;
                self.renderer.render(&project);
            }
            ProjectCommands::List(ListProjectsArgs { area_id }) => {
                let projects = self
                    .client
                    .list_projects(area_id.as_deref())
                    .await
                    .context("Failed to list projects")?;
                self.renderer.render(&Projects::from(projects));
            }
            ProjectCommands::Update(args) => {
                let params = UpdateProject::from(args);
                let project = self
                    .client
                    .update_project(&params)
                    .await
                    .with_context(|| format!("Failed to update project {}", params.id))?;
                self.renderer.render(&UpdateResult::with_changes(
                    project,
                    params.changes.changed_fields(),
                ));
            }
            ProjectCommands::Delete(IdArgs { id }) => {
                self.client
                    .delete_project(&id)
                    .await
                    .with_context(|| format!("Failed to delete project {id}"))?;
                self.renderer.render(&DeleteResult::new(Kind::Project, id));
            }
        }
        Ok(())
    }

    pub async fn handle_task_command(&self, command: TaskCommands) -> Result<()> {
        match command {
            TaskCommands::Create(args) => {
                let task = self
                    .client
                    .create_task(&args.into())
                    .await
                    .context("Failed to create task")?;
                self.renderer.render(&CreateResult::new(task));
            }
            TaskCommands::Show(IdArgs { id }) => {
                let task = self
                    .client
                    .get_task(&id)
                    .await
                    .with_context(|| format!("Failed to get task {id}"))?;
                self.renderer.render(&task);
            }
            TaskCommands::List(ListTasksArgs { project_id }) => {
                let tasks = self
                    .client
                    .list_tasks(project_id.as_deref())
                    .await
                    .context("Failed to list tasks")?;
                self.renderer.render(&Tasks::from(tasks));
            }
            TaskCommands::Update(args) => {
                let params = UpdateTask::from(args);
                let task = self
                    .client
                    .update_task(&params)
                    .await
                    .with_context(|| format!("Failed to update task {}", params.id))?;
                self.renderer.render(&UpdateResult::with_changes(
                    task,
                    params.changes.changed_fields(),
                ));
            }
            TaskCommands::Delete(IdArgs { id }) => {
                self.client
                    .delete_task(&id)
                    .await
                    .with_context(|| format!("Failed to delete task {id}"))?;
                self.renderer.render(&DeleteResult::new(Kind::Task, id));
            }
        }
        Ok(())
    }

    /// What a bare `planner` prints.
    pub async fn list_areas(&self) -> Result<()> {
        let areas = self
            .client
            .list_areas()
            .await
            .context("Failed to list areas")?;
        self.renderer.render(&Areas::from(areas));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_args_leave_missing_flags_unchanged() {
        let params = UpdateTask::from(UpdateTaskArgs {
            id: "t1".to_string(),
            name: None,
            notes: Some("Two coats".to_string()),
        });
        assert_eq!(params.changes.name, FieldUpdate::Unchanged);
        assert_eq!(params.changes.notes, FieldUpdate::Set("Two coats".to_string()));
        assert_eq!(params.changes.changed_fields(), vec!["notes"]);
    }

    #[test]
    fn test_empty_description_is_an_explicit_change() {
        let params = UpdateArea::from(UpdateAreaArgs {
            id: "a1".to_string(),
            name: None,
            description: Some(String::new()),
        });
        assert!(params.changes.description.is_set());
        assert_eq!(params.changes.changed_fields(), vec!["description"]);
    }

    #[test]
    fn test_empty_patch_lists_no_changes() {
        assert!(ProjectPatch::default().changed_fields().is_empty());
    }
}

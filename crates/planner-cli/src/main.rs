//! Planner command-line shell, server host and MCP surface.

mod app;
mod args;
mod cli;
mod config;
mod mcp;
mod renderer;

use Commands::*;
use anyhow::{Context, Result};
use app::{App, shutdown_signal};
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use config::Config;
use log::info;
use mcp::{PlannerMcpServer, run_stdio_server};
use renderer::TerminalRenderer;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let mut args = Args::parse();
    let command = args.command.take();

    let config = match &command {
        Some(Serve(serve)) => Config::for_serve(&args, serve)?,
        _ => Config::from_args(&args)?,
    };
    let app = App::start(&config).await?;
    let cli = Cli::new(app.client(), TerminalRenderer::new(!args.no_color));

    let result = match command {
        Some(Area { command }) => cli.handle_area_command(command).await,
        Some(Project { command }) => cli.handle_project_command(command).await,
        Some(Task { command }) => cli.handle_task_command(command).await,
        Some(Serve(_)) => {
            if let Some(address) = app.address() {
                info!("Planner server listening on {address}");
                eprintln!("Planner server listening on {address}");
            }
            shutdown_signal().await
        }
        Some(Mcp) => run_stdio_server(PlannerMcpServer::new(app.client().clone()))
            .await
            .context("MCP server failed"),
        None => cli.list_areas().await,
    };

    app.shutdown().await?;
    result
}

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};

use crate::cli::{AreaCommands, ProjectCommands, TaskCommands};

/// Command-line shell for the planner
///
/// Organises work into areas, projects inside areas and tasks inside
/// projects. By default the shell opens the local store, hosts the planner
/// transport on a loopback port and talks to it like any other client. Pass
/// `--server` to talk to a planner started elsewhere with `planner serve`.
#[derive(Parser)]
#[command(version, about, name = "planner")]
pub struct Args {
    /// Storage backend used by the in-process shell and by `serve`
    #[arg(long, global = true, value_enum, default_value_t = DbKind::Sqlite)]
    pub db_kind: DbKind,

    /// SQLite database file or PostgreSQL connection string. SQLite defaults
    /// to $XDG_DATA_HOME/planner/planner.db
    #[arg(long, global = true)]
    pub db_config: Option<String>,

    /// Address of a running planner server (host:port). Skips the local store
    #[arg(long, global = true)]
    pub server: Option<String>,

    /// Deadline for each call, in milliseconds
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DbKind {
    Sqlite,
    Postgres,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage areas
    #[command(alias = "a")]
    Area {
        #[command(subcommand)]
        command: AreaCommands,
    },
    /// Manage projects within areas
    #[command(alias = "p")]
    Project {
        #[command(subcommand)]
        command: ProjectCommands,
    },
    /// Manage tasks within projects
    #[command(alias = "t")]
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },
    /// Run the planner server in the foreground
    Serve(ServeArgs),
    /// Start the MCP server on stdio
    Mcp,
}

#[derive(ClapArgs)]
pub struct ServeArgs {
    /// Interface to listen on
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, default_value_t = 50051)]
    pub port: u16,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_args_are_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = Args::try_parse_from([
            "planner",
            "area",
            "list",
            "--db-kind",
            "postgres",
            "--db-config",
            "postgres://localhost/planner",
        ])
        .unwrap();
        assert_eq!(args.db_kind, DbKind::Postgres);
        assert_eq!(
            args.db_config.as_deref(),
            Some("postgres://localhost/planner")
        );
    }

    #[test]
    fn test_serve_defaults() {
        let args = Args::try_parse_from(["planner", "serve"]).unwrap();
        match args.command {
            Some(Commands::Serve(serve)) => {
                assert_eq!(serve.host, "0.0.0.0");
                assert_eq!(serve.port, 50051);
            }
            _ => panic!("expected serve"),
        }
    }
}

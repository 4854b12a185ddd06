//! Runtime configuration assembled from the command line.

use std::{path::PathBuf, time::Duration};

use anyhow::{Result, bail};
use planner_core::StoreConfig;

use crate::args::{Args, DbKind, ServeArgs};

/// How the shell reaches the planner services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Open the store locally and host the transport on a loopback port.
    InProcess,
    /// Only create a client for a server started elsewhere.
    Remote { address: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseConfig {
    Sqlite { path: Option<PathBuf> },
    Postgres { connection_string: String },
}

impl DatabaseConfig {
    pub fn from_parts(kind: DbKind, config: Option<&str>) -> Result<Self> {
        Ok(match kind {
            DbKind::Sqlite => Self::Sqlite {
                path: config.map(PathBuf::from),
            },
            DbKind::Postgres => match config {
                Some(connection_string) if !connection_string.trim().is_empty() => {
                    Self::Postgres {
                        connection_string: connection_string.to_string(),
                    }
                }
                _ => bail!("--db-config <connection string> is required with --db-kind postgres"),
            },
        })
    }
}

impl From<DatabaseConfig> for StoreConfig {
    fn from(config: DatabaseConfig) -> Self {
        match config {
            DatabaseConfig::Sqlite { path } => StoreConfig::Sqlite(path),
            DatabaseConfig::Postgres { connection_string } => {
                StoreConfig::Postgres(connection_string)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// Loopback address with an OS-assigned port, used by the in-process
    /// shell.
    pub fn ephemeral() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl From<&ServeArgs> for ServerConfig {
    fn from(args: &ServeArgs) -> Self {
        Self {
            host: args.host.clone(),
            port: args.port,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub mode: Mode,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub timeout: Option<Duration>,
}

impl Config {
    /// Configuration for the shell commands and the MCP surface.
    pub fn from_args(args: &Args) -> Result<Self> {
        let mode = match &args.server {
            Some(address) => Mode::Remote {
                address: address.clone(),
            },
            None => Mode::InProcess,
        };
        let database = match mode {
            // The remote server owns the store; local database flags are ignored.
            Mode::Remote { .. } => DatabaseConfig::Sqlite { path: None },
            Mode::InProcess => {
                DatabaseConfig::from_parts(args.db_kind, args.db_config.as_deref())?
            }
        };
        Ok(Self {
            mode,
            database,
            server: ServerConfig::ephemeral(),
            timeout: args.timeout_ms.map(Duration::from_millis),
        })
    }

    /// Configuration for `planner serve`.
    pub fn for_serve(args: &Args, serve: &ServeArgs) -> Result<Self> {
        if args.server.is_some() {
            bail!("--server cannot be combined with serve");
        }
        Ok(Self {
            mode: Mode::InProcess,
            database: DatabaseConfig::from_parts(args.db_kind, args.db_config.as_deref())?,
            server: ServerConfig::from(serve),
            timeout: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn test_in_process_is_the_default() {
        let args = Args::try_parse_from(["planner", "area", "list"]).unwrap();
        let config = Config::from_args(&args).unwrap();
        assert_eq!(config.mode, Mode::InProcess);
        assert_eq!(config.database, DatabaseConfig::Sqlite { path: None });
        assert_eq!(config.server.address(), "127.0.0.1:0");
        assert!(config.timeout.is_none());
    }

    #[test]
    fn test_server_flag_selects_remote_mode() {
        let args = Args::try_parse_from([
            "planner",
            "--server",
            "10.0.0.5:50051",
            "--timeout-ms",
            "250",
            "task",
            "list",
        ])
        .unwrap();
        let config = Config::from_args(&args).unwrap();
        assert_eq!(
            config.mode,
            Mode::Remote {
                address: "10.0.0.5:50051".to_string()
            }
        );
        assert_eq!(config.timeout, Some(Duration::from_millis(250)));
    }

    #[test]
    fn test_postgres_requires_connection_string() {
        assert!(DatabaseConfig::from_parts(DbKind::Postgres, None).is_err());
        assert!(DatabaseConfig::from_parts(DbKind::Postgres, Some("  ")).is_err());
        assert_eq!(
            DatabaseConfig::from_parts(DbKind::Postgres, Some("host=localhost")).unwrap(),
            DatabaseConfig::Postgres {
                connection_string: "host=localhost".to_string()
            }
        );
    }

    #[test]
    fn test_serve_listens_on_requested_port() {
        let args = Args::try_parse_from([
            "planner",
            "--db-config",
            "/tmp/p.db",
            "serve",
            "--port",
            "6000",
        ])
        .unwrap();
        let Some(crate::args::Commands::Serve(serve)) = &args.command else {
            panic!("expected serve");
        };
        let config = Config::for_serve(&args, serve).unwrap();
        assert_eq!(config.server.address(), "0.0.0.0:6000");
        assert_eq!(
            StoreConfig::from(config.database),
            StoreConfig::Sqlite(Some(PathBuf::from("/tmp/p.db")))
        );
    }
}

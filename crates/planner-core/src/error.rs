//! Error types for the planner library.
//!
//! Every failure carries a machine-distinguishable [`ErrorKind`] so transports
//! can report it without inspecting messages.

use std::{fmt, path::PathBuf, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::Kind;

/// Caller-facing classification of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed or missing required input. Not retryable as-is.
    InvalidArgument,
    /// The referenced entity or its parent does not exist.
    NotFound,
    /// The caller's deadline expired before the call completed.
    DeadlineExceeded,
    /// Store or transport failure. Opaque to the caller.
    #[serde(other)]
    Internal,
}

impl ErrorKind {
    /// Wire representation of the kind.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidArgument => "invalid_argument",
            ErrorKind::NotFound => "not_found",
            ErrorKind::DeadlineExceeded => "deadline_exceeded",
            ErrorKind::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorKind {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "invalid_argument" => Ok(ErrorKind::InvalidArgument),
            "not_found" => Ok(ErrorKind::NotFound),
            "deadline_exceeded" => Ok(ErrorKind::DeadlineExceeded),
            "internal" => Ok(ErrorKind::Internal),
            other => Err(PlannerError::invalid_argument("code")
                .with_reason(format!("unknown error kind '{other}'"))),
        }
    }
}

/// Comprehensive error type for all planner operations.
#[derive(Error, Debug)]
pub enum PlannerError {
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidArgument { field: String, reason: String },
    /// Entity not found for the given ID
    #[error("{kind} not found: {id}")]
    NotFound { kind: Kind, id: String },
    /// A store operation failed; the source holds the backend detail
    #[error("Failed to {op} {kind}")]
    Store {
        op: &'static str,
        kind: Kind,
        #[source]
        source: Box<PlannerError>,
    },
    /// SQLite connection or query errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// PostgreSQL connection or query errors
    #[error("PostgreSQL error: {message}")]
    Postgres {
        message: String,
        #[source]
        source: tokio_postgres::Error,
    },
    /// A stored value could not be decoded into its domain type
    #[error("Invalid stored value in column '{column}': {reason}")]
    Decode { column: &'static str, reason: String },
    /// The shared store connection was poisoned by a panicking caller
    #[error("Store connection lock poisoned")]
    LockPoisoned,
    /// The store was used after `close()`
    #[error("Store is closed")]
    Closed,
    /// The caller stopped waiting before the store call started
    #[error("Store call cancelled before it started")]
    Cancelled,
    /// A blocking store task could not be joined
    #[error("Blocking store task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
    /// The listening socket could not be bound
    #[error("Failed to listen on {address}: {source}")]
    Bind {
        address: String,
        source: std::io::Error,
    },
    /// Transport-level failures (connection refused, malformed response, ...)
    #[error("Transport error: {message}")]
    Transport { message: String },
    /// The caller's deadline expired
    #[error("Deadline exceeded: {message}")]
    DeadlineExceeded { message: String },
    /// A failure reported by a remote planner server
    #[error("{message}")]
    Remote { kind: ErrorKind, message: String },
}

/// Builder for creating database errors with optional context.
pub struct DatabaseErrorBuilder {
    message: String,
}

impl DatabaseErrorBuilder {
    /// Create a new database error builder with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Build the error with the given source.
    pub fn with_source(self, source: rusqlite::Error) -> PlannerError {
        PlannerError::Database {
            message: self.message,
            source,
        }
    }
}

/// Builder for creating input validation errors.
pub struct InvalidArgumentBuilder {
    field: String,
}

impl InvalidArgumentBuilder {
    /// Create a new invalid argument error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> PlannerError {
        PlannerError::InvalidArgument {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl PlannerError {
    /// Creates a builder for database errors.
    pub fn database(message: impl Into<String>) -> DatabaseErrorBuilder {
        DatabaseErrorBuilder::new(message)
    }

    /// Creates a builder for input validation errors.
    pub fn invalid_argument(field: impl Into<String>) -> InvalidArgumentBuilder {
        InvalidArgumentBuilder::new(field)
    }

    /// Creates a not-found error for an entity of the given kind.
    pub fn not_found(kind: Kind, id: impl Into<String>) -> Self {
        PlannerError::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Returns the caller-facing classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PlannerError::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            PlannerError::NotFound { .. } => ErrorKind::NotFound,
            PlannerError::DeadlineExceeded { .. } => ErrorKind::DeadlineExceeded,
            PlannerError::Remote { kind, .. } => *kind,
            _ => ErrorKind::Internal,
        }
    }

    /// Returns a closure wrapping store failures with operation context.
    ///
    /// Not-found errors pass through untouched so callers still see them as
    /// [`ErrorKind::NotFound`].
    pub fn store(op: &'static str, kind: Kind) -> impl FnOnce(PlannerError) -> PlannerError {
        move |source| match source {
            PlannerError::NotFound { .. } => source,
            other => PlannerError::Store {
                op,
                kind,
                source: Box::new(other),
            },
        }
    }
}

/// Specialized extension trait for SQLite-related Results.
pub trait DatabaseResultExt<T> {
    /// Map database errors with a message.
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T> DatabaseResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| PlannerError::database(message).with_source(e))
    }
}

/// Specialized extension trait for PostgreSQL-related Results.
pub trait PostgresResultExt<T> {
    /// Map PostgreSQL errors with a message.
    fn pg_context(self, message: &str) -> Result<T>;
}

impl<T> PostgresResultExt<T> for std::result::Result<T, tokio_postgres::Error> {
    fn pg_context(self, message: &str) -> Result<T> {
        self.map_err(|source| PlannerError::Postgres {
            message: message.to_string(),
            source,
        })
    }
}

/// Result type alias for planner operations
pub type Result<T> = std::result::Result<T, PlannerError>;

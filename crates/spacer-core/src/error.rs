//! Core error types for spacer-core.
//!
//! One thiserror hierarchy for the whole library. A candidate that is
//! syntactically valid but conflicts with a rule is NOT an exceptional
//! path inside the validator -- [`crate::validator::validate`] returns the
//! violation as a plain value. It is wrapped into [`CoreError::Rejected`]
//! only at the planner boundary, where a rejected commit and a database
//! failure travel the same channel back to the caller.

use std::path::PathBuf;

use thiserror::Error;

use crate::validator::Violation;

/// Core error type for spacer-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Malformed input, rejected before any rule is evaluated
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    /// A separation rule blocked the candidate; nothing was persisted
    #[error("{0}")]
    Rejected(#[from] Violation),

    /// A referenced record does not exist in the store
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },
}

/// Input validation errors, detected before rule evaluation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// An event must carry at least one tag
    #[error("event must carry at least one tag")]
    EmptyTags,

    /// A rule tag group must name at least one tag
    #[error("rule tag group '{side}' must name at least one tag")]
    EmptyTagGroup { side: &'static str },

    /// A date string did not parse as a calendar date
    #[error("invalid calendar date (expected YYYY-MM-DD): {value}")]
    InvalidDate { value: String },
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Database(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

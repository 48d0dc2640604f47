//! Core error types for pomotrack-core.
//!
//! The timer itself never fails. Errors come from the collaborators around
//! it: local storage, configuration, and the day-planning request.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for pomotrack-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Storage errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Day-planning request errors
    #[error("Planner error: {0}")]
    Planner(#[from] PlannerError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Key-value storage errors.
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

    /// Database is locked
    #[error("Database is locked")]
    Locked,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),
}

/// Errors reported to the planning collaborator. None of these stop the timer.
#[derive(Error, Debug)]
pub enum PlannerError {
    /// The planner base URL could not be parsed
    #[error("Invalid planner URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The request was rejected locally and never sent
    #[error("Invalid plan request: {0}")]
    InvalidRequest(String),

    /// Transport failure
    #[error("Plan request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("Planner returned HTTP {status}")]
    Status { status: u16 },

    /// Response body was not a list of plan blocks
    #[error("Failed to decode plan response: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Blank free-text input
    #[error("{0} must not be empty")]
    EmptyText(String),

    /// Out of bounds
    #[error("Index {index} out of bounds for {collection} (length: {len})")]
    OutOfBounds {
        collection: String,
        index: usize,
        len: usize,
    },
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(code, _msg) => {
                if code.code == rusqlite::ErrorCode::DatabaseLocked {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

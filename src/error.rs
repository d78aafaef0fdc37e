//! Error types for routinr
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

use crate::domain::Seconds;

/// All error types that can occur in routinr
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Essential tasks do not fit the budget, even with tolerance
    #[error("Insufficient time: essential tasks need {required}s but only {available}s are available")]
    InsufficientTime { required: Seconds, available: Seconds },

    /// A routine references a task the source can no longer resolve
    #[error("Task reference invalid: {0}")]
    TaskReferenceInvalid(String),

    /// A task definition is malformed
    #[error("Invalid task: {0}")]
    InvalidTask(String),

    /// Routine not present in the catalog
    #[error("Routine not found: {0}")]
    RoutineNotFound(String),

    /// Too many candidates for exhaustive search
    #[error("Too many candidates for exhaustive search: {count} (limit {limit})")]
    CandidateLimit { count: usize, limit: usize },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for routinr operations
pub type Result<T> = std::result::Result<T, SchedulerError>;

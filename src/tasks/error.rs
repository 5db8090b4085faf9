//! Error types for task management.

use thiserror::Error;

/// Task management error type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// No task id starts with the given prefix.
    #[error("no task matches '{0}'")]
    NotFound(String),

    /// More than one task id starts with the given prefix.
    #[error("'{prefix}' matches {count} tasks; type more of the id")]
    AmbiguousId { prefix: String, count: usize },

    /// The description was empty after trimming.
    #[error("task description cannot be empty")]
    EmptyDescription,

    /// Planned pomodoros must be at least one.
    #[error("planned pomodoros must be at least 1 (got {0})")]
    InvalidPlannedPomodoros(u32),
}

/// Result type for task operations.
pub type Result<T> = std::result::Result<T, TaskError>;

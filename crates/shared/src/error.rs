use thiserror::Error;

use crate::domain::{JobState, TaskState};

/// Failures detected locally, before any request reaches the scheduler.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid timestamp for '{field}': {value}")]
    InvalidTimestamp { field: String, value: String },
    #[error("missing navigation parameter '{0}'")]
    MissingParameter(String),
    #[error("unknown view '{0}'")]
    UnknownView(String),
    #[error("action '{action}' is not available for job in state {state}")]
    ActionNotAvailable { action: String, state: JobState },
    #[error("task parameters are only editable for FAILED tasks, task is {0}")]
    TaskNotEditable(TaskState),
    #[error("suspend requested without a suspend date or scheduled start")]
    SuspendDateRequired,
    #[error("no view model loaded yet")]
    NotLoaded,
}

impl DomainError {
    pub fn invalid_timestamp(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidTimestamp {
            field: field.into(),
            value: value.into(),
        }
    }
}

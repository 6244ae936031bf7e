use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(&self.0)
            }
        }
    };
}

id_newtype!(GroupId);
id_newtype!(JobId);
id_newtype!(TaskId);
id_newtype!(ElementId);

/// Lifecycle state of a job as reported by the scheduler.
///
/// Values the client does not know deserialize to [`JobState::Unknown`]
/// so that a newer server never breaks rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobState {
    New,
    Waiting,
    Ready,
    Active,
    Failed,
    Cancelled,
    Skipped,
    Confirm,
    Completed,
    Timeout,
    Rejected,
    #[default]
    #[serde(other)]
    Unknown,
}

impl JobState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::Waiting => "WAITING",
            Self::Ready => "READY",
            Self::Active => "ACTIVE",
            Self::Failed => "FAILED",
            Self::Cancelled => "CANCELLED",
            Self::Skipped => "SKIPPED",
            Self::Confirm => "CONFIRM",
            Self::Completed => "COMPLETED",
            Self::Timeout => "TIMEOUT",
            Self::Rejected => "REJECTED",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// State of a single task within a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskState {
    New,
    Waiting,
    Ready,
    Active,
    Failed,
    Cancelled,
    Skipped,
    Confirm,
    Completed,
    Timeout,
    Rejected,
    #[default]
    #[serde(other)]
    Unknown,
}

impl TaskState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::Waiting => "WAITING",
            Self::Ready => "READY",
            Self::Active => "ACTIVE",
            Self::Failed => "FAILED",
            Self::Cancelled => "CANCELLED",
            Self::Skipped => "SKIPPED",
            Self::Confirm => "CONFIRM",
            Self::Completed => "COMPLETED",
            Self::Timeout => "TIMEOUT",
            Self::Rejected => "REJECTED",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Role a user needs for an action. Advisory only; the server authorizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Operator,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_states_fall_back_to_unknown() {
        let state: JobState = serde_json::from_str("\"PAUSED\"").expect("state");
        assert_eq!(state, JobState::Unknown);
        let state: TaskState = serde_json::from_str("\"DEFERRED\"").expect("state");
        assert_eq!(state, TaskState::Unknown);
    }

    #[test]
    fn waiting_tasks_keep_their_state() {
        let state: TaskState = serde_json::from_str("\"WAITING\"").expect("state");
        assert_eq!(state, TaskState::Waiting);
        assert_eq!(state.to_string(), "WAITING");
    }

    #[test]
    fn known_states_use_server_spelling() {
        let state: JobState = serde_json::from_str("\"CANCELLED\"").expect("state");
        assert_eq!(state, JobState::Cancelled);
        assert_eq!(
            serde_json::to_string(&TaskState::Completed).expect("json"),
            "\"COMPLETED\""
        );
    }
}

//! Which job actions a user may trigger, derived from the job state alone.

use std::{collections::BTreeSet, fmt};

use shared::{
    domain::{JobState, Role},
    protocol::JobTask,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ActionKind {
    Resume,
    Confirm,
    Cancel,
    Remove,
}

impl ActionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Resume => "resume",
            Self::Confirm => "confirm",
            Self::Cancel => "cancel",
            Self::Remove => "remove",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Resume => "Resume",
            Self::Confirm => "Confirm",
            Self::Cancel => "Cancel",
            Self::Remove => "Remove",
        }
    }

    pub fn style(self) -> ActionStyle {
        match self {
            Self::Resume | Self::Confirm => ActionStyle::Primary,
            Self::Cancel | Self::Remove => ActionStyle::Danger,
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionStyle {
    Primary,
    Danger,
}

/// An action offered on the job view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobAction {
    pub action: ActionKind,
    pub style: ActionStyle,
    pub label: &'static str,
    pub role: Role,
}

impl From<ActionKind> for JobAction {
    fn from(action: ActionKind) -> Self {
        Self {
            action,
            style: action.style(),
            label: action.label(),
            role: Role::Operator,
        }
    }
}

/// Each rule offers its action in any of the listed states. Rules are not
/// exclusive: every matching rule contributes.
const ACTION_RULES: [(ActionKind, &[JobState]); 4] = [
    (ActionKind::Resume, &[JobState::Cancelled, JobState::Failed]),
    (ActionKind::Confirm, &[JobState::Confirm]),
    (
        ActionKind::Cancel,
        &[JobState::Active, JobState::Ready, JobState::Confirm],
    ),
    (
        ActionKind::Remove,
        &[JobState::Cancelled, JobState::Completed, JobState::Failed],
    ),
];

pub fn available_actions(state: JobState) -> BTreeSet<ActionKind> {
    ACTION_RULES
        .iter()
        .filter(|(_, states)| states.contains(&state))
        .map(|(action, _)| *action)
        .collect()
}

pub fn job_actions(state: JobState) -> Vec<JobAction> {
    available_actions(state)
        .into_iter()
        .map(JobAction::from)
        .collect()
}

pub fn in_progress(state: JobState) -> bool {
    matches!(state, JobState::Active | JobState::Confirm)
}

/// Whether the task table needs an element column.
pub fn render_element_column(tasks: &[JobTask]) -> bool {
    tasks.iter().any(JobTask::has_element)
}

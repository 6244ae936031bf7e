//! Per-view controllers of the job console.
//!
//! A controller owns its resource client and its view model. The shell
//! loads it for a [`Location`], forwards button presses and timer ticks,
//! and follows the [`Outcome`] it reports.

use anyhow::Result;
use async_trait::async_trait;
pub use client_core::Params;

pub mod actions;
pub mod confirm_remove;
pub mod flow;
pub mod menu;
pub mod overview;
pub mod progress;
pub mod settings;
pub mod task;
pub mod tasks;

pub const JOBS_VIEW: &str = "jobs";
pub const JOB_VIEW: &str = "job";
pub const CONFIRM_REMOVE_VIEW: &str = "confirm-remove";
pub const TASKS_VIEW: &str = "tasks";
pub const TASK_VIEW: &str = "task";
pub const TASKFLOW_VIEW: &str = "taskflow";

/// A view name plus the navigation parameters it was opened with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub view: String,
    pub params: Params,
}

impl Location {
    pub fn new(view: impl Into<String>, params: Params) -> Self {
        Self {
            view: view.into(),
            params,
        }
    }
}

/// What a button handler did once its request succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Stay,
    Reloaded,
    Navigate(Location),
}

/// Result of a refresh tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    Reloaded,
    /// Nothing left to observe; the shell should stop polling.
    Stopped,
}

#[async_trait]
pub trait Controller: Send {
    type ViewModel;

    /// Fetches the entity for `location` and rebuilds the view model.
    async fn load(&mut self, location: Location) -> Result<()>;

    async fn refresh(&mut self) -> Result<Refresh>;

    fn view_model(&self) -> Option<&Self::ViewModel>;
}

#[cfg(test)]
#[path = "tests/fakes.rs"]
pub(crate) mod fakes;

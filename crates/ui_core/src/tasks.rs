//! Job detail with its task list and the state-dependent job actions.

use anyhow::Result;
use async_trait::async_trait;
use client_core::JobResource;
use shared::{domain::JobState, error::DomainError, protocol::JobInfo};
use tracing::{debug, info};

use crate::{
    actions::{
        available_actions, in_progress, job_actions, render_element_column, ActionKind, JobAction,
    },
    progress::Progress,
    Controller, Location, Outcome, Refresh, CONFIRM_REMOVE_VIEW,
};

#[derive(Debug, Clone, PartialEq)]
pub struct TasksViewModel {
    pub job: JobInfo,
    pub actions: Vec<JobAction>,
    pub render_element_column: bool,
    pub in_progress: bool,
    pub progress: Option<Progress>,
}

impl TasksViewModel {
    pub fn new(job: JobInfo) -> Self {
        let state = job.envelope.job_state;
        Self {
            actions: job_actions(state),
            render_element_column: render_element_column(&job.tasks),
            in_progress: in_progress(state),
            progress: Progress::of(&job.tasks),
            job,
        }
    }

    pub fn job_state(&self) -> JobState {
        self.job.envelope.job_state
    }
}

pub struct TasksController {
    job: Box<dyn JobResource>,
    location: Option<Location>,
    view_model: Option<TasksViewModel>,
}

impl TasksController {
    /// `job` must load the default projection, which carries the tasks.
    pub fn new(job: Box<dyn JobResource>) -> Self {
        Self {
            job,
            location: None,
            view_model: None,
        }
    }

    /// Runs one of the offered job actions.
    ///
    /// State transitions reload the job once the server accepted them.
    /// `Remove` only navigates to the confirmation view.
    pub async fn press(&mut self, action: ActionKind) -> Result<Outcome> {
        let (Some(location), Some(view_model)) = (&self.location, &self.view_model) else {
            return Err(DomainError::NotLoaded.into());
        };
        let state = view_model.job_state();
        if !available_actions(state).contains(&action) {
            return Err(DomainError::ActionNotAvailable {
                action: action.to_string(),
                state,
            }
            .into());
        }

        let params = &location.params;
        match action {
            ActionKind::Remove => {
                return Ok(Outcome::Navigate(Location::new(
                    CONFIRM_REMOVE_VIEW,
                    params.clone(),
                )));
            }
            ActionKind::Cancel => self.job.cancel(params).await?,
            ActionKind::Confirm => self.job.confirm(params).await?,
            ActionKind::Resume => self.job.resume(params).await?,
        }
        info!(%action, job = params.get("job"), "job action accepted");

        let location = location.clone();
        self.load(location).await?;
        Ok(Outcome::Reloaded)
    }
}

#[async_trait]
impl Controller for TasksController {
    type ViewModel = TasksViewModel;

    async fn load(&mut self, location: Location) -> Result<()> {
        let raw = self.job.load(&location.params).await?;
        let mut job: JobInfo = serde_json::from_value(raw)?;
        // Without a task list, progress can only come from the server counters.
        if job.tasks.is_empty() && job.progress.is_none() {
            job.progress = Some(self.job.progress(&location.params).await?);
        }
        self.view_model = Some(TasksViewModel::new(job));
        self.location = Some(location);
        Ok(())
    }

    /// COMPLETED jobs do not change anymore, so polling stops there. Other
    /// end states stay polled because resume can revive them.
    async fn refresh(&mut self) -> Result<Refresh> {
        let location = self.location.clone().ok_or(DomainError::NotLoaded)?;
        if self
            .view_model
            .as_ref()
            .is_some_and(|vm| vm.job_state() == JobState::Completed)
        {
            debug!(job = location.params.get("job"), "job completed, refresh suppressed");
            return Ok(Refresh::Stopped);
        }
        self.load(location).await?;
        Ok(Refresh::Reloaded)
    }

    fn view_model(&self) -> Option<&TasksViewModel> {
        self.view_model.as_ref()
    }
}

#[cfg(test)]
#[path = "tests/tasks_tests.rs"]
mod tests;

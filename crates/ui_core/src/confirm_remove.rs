use anyhow::Result;
use async_trait::async_trait;
use client_core::{JobResource, Params};
use shared::{error::DomainError, protocol::JobInfo};
use tracing::info;

use crate::{Controller, Location, Outcome, Refresh, JOBS_VIEW};

/// Asks for confirmation before a job is removed.
pub struct ConfirmRemoveController {
    job: Box<dyn JobResource>,
    location: Option<Location>,
    view_model: Option<JobInfo>,
}

impl ConfirmRemoveController {
    pub fn new(job: Box<dyn JobResource>) -> Self {
        Self {
            job,
            location: None,
            view_model: None,
        }
    }

    /// Removes the job and leaves for the job listing. The removed job is
    /// never loaded again.
    pub async fn confirm_remove(&mut self) -> Result<Outcome> {
        let location = self.location.as_ref().ok_or(DomainError::NotLoaded)?;
        self.job.remove(&location.params).await?;
        info!(job = location.params.get("job"), "job removed");
        self.view_model = None;
        Ok(Outcome::Navigate(Location::new(JOBS_VIEW, Params::new())))
    }
}

#[async_trait]
impl Controller for ConfirmRemoveController {
    type ViewModel = JobInfo;

    async fn load(&mut self, location: Location) -> Result<()> {
        let raw = self.job.load(&location.params).await?;
        self.view_model = Some(serde_json::from_value(raw)?);
        self.location = Some(location);
        Ok(())
    }

    async fn refresh(&mut self) -> Result<Refresh> {
        let location = self.location.clone().ok_or(DomainError::NotLoaded)?;
        self.load(location).await?;
        Ok(Refresh::Reloaded)
    }

    fn view_model(&self) -> Option<&JobInfo> {
        self.view_model.as_ref()
    }
}

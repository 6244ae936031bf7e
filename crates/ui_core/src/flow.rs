use anyhow::Result;
use async_trait::async_trait;
use client_core::JobResource;
use shared::{error::DomainError, protocol::JobFlow};

use crate::{Controller, Location, Refresh};

/// Task-flow graph of a job. Rendering the DOT graph is left to the caller.
pub struct FlowController {
    job: Box<dyn JobResource>,
    location: Option<Location>,
    view_model: Option<JobFlow>,
}

impl FlowController {
    /// `job` must load the `flow` scope.
    pub fn new(job: Box<dyn JobResource>) -> Self {
        Self {
            job,
            location: None,
            view_model: None,
        }
    }
}

#[async_trait]
impl Controller for FlowController {
    type ViewModel = JobFlow;

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

    fn view_model(&self) -> Option<&JobFlow> {
        self.view_model.as_ref()
    }
}

//! The job listing.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use client_core::{jobs_query_pairs, JobsResource, Params};
use shared::{
    error::DomainError,
    protocol::{iso_date, JobSettings, JobsQuery},
};
use tracing::debug;

use crate::{Controller, Location, Outcome, Refresh};

/// Length of the listing window when the user did not pick `after`.
pub const DEFAULT_WINDOW_HOURS: i64 = 24;

/// Listing query derived from navigation parameters. The flags record
/// whether the bounds were supplied or filled in by default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverviewQuery {
    pub query: JobsQuery,
    pub before_supplied: bool,
    pub after_supplied: bool,
}

pub fn derive_query(params: &Params, now: DateTime<Utc>) -> Result<OverviewQuery, DomainError> {
    let before = timestamp_param(params, "before")?;
    let after = timestamp_param(params, "after")?;
    let effective_before = before.unwrap_or(now);
    let effective_after =
        after.unwrap_or_else(|| effective_before - Duration::hours(DEFAULT_WINDOW_HOURS));

    Ok(OverviewQuery {
        query: JobsQuery {
            filter: params.get("filter").map(str::to_string),
            running: params.get("running").and_then(|v| v.parse().ok()),
            after: Some(effective_after),
            before: Some(effective_before),
            limit: params.get("limit").and_then(|v| v.parse().ok()),
        },
        before_supplied: before.is_some(),
        after_supplied: after.is_some(),
    })
}

fn timestamp_param(params: &Params, key: &str) -> Result<Option<DateTime<Utc>>, DomainError> {
    params
        .get(key)
        .map(|raw| iso_date::parse(raw).ok_or_else(|| DomainError::invalid_timestamp(key, raw)))
        .transpose()
}

/// Navigation parameters that reproduce `query`.
pub fn query_params(query: &JobsQuery) -> Params {
    jobs_query_pairs(query).into_iter().collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverviewViewModel {
    pub query: OverviewQuery,
    pub jobs: Vec<JobSettings>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OverviewButton {
    /// Reloads the listing with the (edited) query of the view model.
    Filter(JobsQuery),
}

pub struct OverviewController {
    jobs: Box<dyn JobsResource>,
    location: Option<Location>,
    view_model: Option<OverviewViewModel>,
}

impl OverviewController {
    pub fn new(jobs: Box<dyn JobsResource>) -> Self {
        Self {
            jobs,
            location: None,
            view_model: None,
        }
    }

    pub async fn press(&mut self, button: OverviewButton) -> Result<Outcome> {
        match button {
            OverviewButton::Filter(query) => {
                let view = self
                    .location
                    .as_ref()
                    .map(|l| l.view.clone())
                    .unwrap_or_else(|| crate::JOBS_VIEW.to_string());
                self.load(Location::new(view, query_params(&query))).await?;
                Ok(Outcome::Reloaded)
            }
        }
    }
}

#[async_trait]
impl Controller for OverviewController {
    type ViewModel = OverviewViewModel;

    async fn load(&mut self, location: Location) -> Result<()> {
        let query = derive_query(&location.params, Utc::now())?;
        let jobs = self.jobs.load(&query.query).await?;
        debug!(count = jobs.len(), "loaded job listing");
        self.view_model = Some(OverviewViewModel { query, jobs });
        self.location = Some(location);
        Ok(())
    }

    async fn refresh(&mut self) -> Result<Refresh> {
        let location = self.location.clone().ok_or(DomainError::NotLoaded)?;
        self.load(location).await?;
        Ok(Refresh::Reloaded)
    }

    fn view_model(&self) -> Option<&OverviewViewModel> {
        self.view_model.as_ref()
    }
}

#[cfg(test)]
#[path = "tests/overview_tests.rs"]
mod tests;

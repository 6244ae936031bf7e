use std::fmt;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use shared::protocol::{JobProgress, JobSettings};
use tracing::info;

use crate::{JobResource, Params, RestClient};

const JOB_PATH: &str = "/api/v1/jobs/{job}";
const JOB_SCOPE_PATH: &str = "/api/v1/jobs/{job}/{scope}";
const JOB_SETTINGS_PATH: &str = "/api/v1/jobs/{job}/settings";
const JOB_PROGRESS_PATH: &str = "/api/v1/jobs/{job}/progress";
const JOB_CANCEL_PATH: &str = "/api/v1/jobs/{job}/_cancel";
const JOB_CONFIRM_PATH: &str = "/api/v1/jobs/{job}/_confirm";
const JOB_RESUME_PATH: &str = "/api/v1/jobs/{job}/_resume";

/// Server-side projection of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobScope {
    Settings,
    Flow,
}

impl JobScope {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Settings => "settings",
            Self::Flow => "flow",
        }
    }
}

impl fmt::Display for JobScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct JobClient {
    rest: RestClient,
    defaults: Params,
}

impl JobClient {
    /// A client loading the default job projection (info with tasks).
    pub fn new(rest: RestClient) -> Self {
        Self {
            rest,
            defaults: Params::new(),
        }
    }

    pub fn with_scope(rest: RestClient, scope: JobScope) -> Self {
        Self {
            rest,
            defaults: Params::new().with("scope", scope.as_str()),
        }
    }

    fn url(&self, template: &str, params: &Params) -> Result<url::Url> {
        params.require("job")?;
        self.rest.resolve(template, &[&self.defaults, params])
    }
}

#[async_trait]
impl JobResource for JobClient {
    async fn load(&self, params: &Params) -> Result<Value> {
        let url = self.url(JOB_SCOPE_PATH, params)?;
        self.rest.get_json(url, &[]).await
    }

    async fn update_settings(&self, params: &Params, settings: &JobSettings) -> Result<()> {
        let url = self.url(JOB_SETTINGS_PATH, params)?;
        info!(job = params.get("job"), "updating job settings");
        self.rest.put_json(url, settings).await
    }

    async fn cancel(&self, params: &Params) -> Result<()> {
        let url = self.url(JOB_CANCEL_PATH, params)?;
        info!(job = params.get("job"), "cancelling job");
        self.rest.post(url).await
    }

    async fn confirm(&self, params: &Params) -> Result<()> {
        let url = self.url(JOB_CONFIRM_PATH, params)?;
        info!(job = params.get("job"), "confirming job");
        self.rest.post(url).await
    }

    async fn resume(&self, params: &Params) -> Result<()> {
        let url = self.url(JOB_RESUME_PATH, params)?;
        info!(job = params.get("job"), "resuming job");
        self.rest.post(url).await
    }

    async fn remove(&self, params: &Params) -> Result<()> {
        let url = self.url(JOB_PATH, params)?;
        info!(job = params.get("job"), "removing job");
        self.rest.delete(url).await
    }

    async fn progress(&self, params: &Params) -> Result<JobProgress> {
        let url = self.url(JOB_PROGRESS_PATH, params)?;
        self.rest.get_json(url, &[]).await
    }
}

//! Typed clients for the scheduler's job REST resources.
//!
//! Every call is a single request. Transport failures and non-2xx
//! responses are returned as errors; nothing is retried.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use shared::protocol::{JobProgress, JobSettings, JobTaskInfo, JobsQuery};

mod job;
mod jobs;
mod task;
pub mod template;
pub mod transport;

pub use job::{JobClient, JobScope};
pub use jobs::{jobs_query_pairs, JobsClient};
pub use task::TaskClient;
pub use template::Params;
pub use transport::RestClient;

/// The collection of scheduled jobs.
#[async_trait]
pub trait JobsResource: Send + Sync {
    async fn load(&self, query: &JobsQuery) -> Result<Vec<JobSettings>>;
}

/// A single job, addressed by the `job` navigation parameter.
#[async_trait]
pub trait JobResource: Send + Sync {
    /// Loads the projection selected by the `scope` parameter. Different
    /// scopes answer with different documents, so the body is returned raw.
    async fn load(&self, params: &Params) -> Result<Value>;
    /// Replaces the job's settings with `settings` as given.
    async fn update_settings(&self, params: &Params, settings: &JobSettings) -> Result<()>;
    async fn cancel(&self, params: &Params) -> Result<()>;
    async fn confirm(&self, params: &Params) -> Result<()>;
    async fn resume(&self, params: &Params) -> Result<()>;
    async fn remove(&self, params: &Params) -> Result<()>;
    async fn progress(&self, params: &Params) -> Result<JobProgress>;
}

/// A single task, addressed by the `job` and `task` navigation parameters.
#[async_trait]
pub trait TaskResource: Send + Sync {
    async fn load(&self, params: &Params) -> Result<JobTaskInfo>;
    /// Replaces the task's parameter payload wholesale.
    async fn set_parameter(&self, params: &Params, parameters: &Value) -> Result<()>;
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;

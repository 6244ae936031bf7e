use anyhow::Result;
use async_trait::async_trait;
use shared::protocol::{iso_date, JobSettings, JobsQuery};

use crate::{JobsResource, RestClient};

const JOBS_PATH: &str = "/api/v1/jobs";

/// Lists jobs, merging each query over a configured default.
#[derive(Debug, Clone)]
pub struct JobsClient {
    rest: RestClient,
    defaults: JobsQuery,
}

impl JobsClient {
    pub fn new(rest: RestClient) -> Self {
        Self::with_defaults(rest, JobsQuery::default())
    }

    pub fn with_defaults(rest: RestClient, defaults: JobsQuery) -> Self {
        Self { rest, defaults }
    }
}

#[async_trait]
impl JobsResource for JobsClient {
    async fn load(&self, query: &JobsQuery) -> Result<Vec<JobSettings>> {
        let query = query.merged_over(&self.defaults);
        let url = self.rest.resolve(JOBS_PATH, &[])?;
        self.rest.get_json(url, &jobs_query_pairs(&query)).await
    }
}

/// Query string pairs for a listing request. Unset fields are omitted.
pub fn jobs_query_pairs(query: &JobsQuery) -> Vec<(&'static str, String)> {
    let mut pairs = Vec::new();
    if let Some(filter) = query.filter.as_deref().filter(|f| !f.is_empty()) {
        pairs.push(("filter", filter.to_string()));
    }
    if let Some(running) = query.running {
        pairs.push(("running", running.to_string()));
    }
    if let Some(after) = &query.after {
        pairs.push(("after", iso_date::format(after)));
    }
    if let Some(before) = &query.before {
        pairs.push(("before", iso_date::format(before)));
    }
    if let Some(limit) = query.limit {
        pairs.push(("limit", limit.to_string()));
    }
    pairs
}

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use shared::protocol::JobTaskInfo;
use tracing::info;

use crate::{Params, RestClient, TaskResource};

const TASK_PATH: &str = "/api/v1/jobs/{job}/tasks/{task}";
const TASK_PARAMETERS_PATH: &str = "/api/v1/jobs/{job}/tasks/{task}/parameters";

#[derive(Debug, Clone)]
pub struct TaskClient {
    rest: RestClient,
}

impl TaskClient {
    pub fn new(rest: RestClient) -> Self {
        Self { rest }
    }

    fn url(&self, template: &str, params: &Params) -> Result<url::Url> {
        params.require("job")?;
        params.require("task")?;
        self.rest.resolve(template, &[params])
    }
}

#[async_trait]
impl TaskResource for TaskClient {
    async fn load(&self, params: &Params) -> Result<JobTaskInfo> {
        let url = self.url(TASK_PATH, params)?;
        self.rest.get_json(url, &[]).await
    }

    async fn set_parameter(&self, params: &Params, parameters: &Value) -> Result<()> {
        let url = self.url(TASK_PARAMETERS_PATH, params)?;
        info!(
            job = params.get("job"),
            task = params.get("task"),
            "replacing task parameters"
        );
        self.rest.put_json(url, parameters).await
    }
}

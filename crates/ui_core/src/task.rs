//! Detail view of a single task with its parameter editor.

use anyhow::{Context, Result};
use async_trait::async_trait;
use client_core::TaskResource;
use serde_json::Value;
use shared::{domain::TaskState, error::DomainError, protocol::JobTaskInfo};
use tracing::info;

use crate::{Controller, Location, Outcome, Refresh};

#[derive(Debug, Clone, PartialEq)]
pub struct TaskViewModel {
    pub task: JobTaskInfo,
    /// Pretty-printed parameters, as shown in the editor.
    pub json: String,
    /// Parameters can only be edited for FAILED tasks.
    pub editable: bool,
}

impl TaskViewModel {
    pub fn new(task: JobTaskInfo) -> Result<Self> {
        let json = match &task.task.parameters {
            Some(parameters) => serde_json::to_string_pretty(parameters)?,
            None => "{}".to_string(),
        };
        Ok(Self {
            json,
            editable: task.task.task_state == TaskState::Failed,
            task,
        })
    }
}

/// Parses the editor content. Malformed JSON aborts the save.
pub fn parse_parameters(text: &str) -> Result<Value> {
    serde_json::from_str(text).context("task parameters are not valid JSON")
}

#[derive(Debug, Clone, PartialEq)]
pub enum TaskButton {
    SaveTask(Value),
}

pub struct TaskController {
    task: Box<dyn TaskResource>,
    location: Option<Location>,
    view_model: Option<TaskViewModel>,
}

impl TaskController {
    pub fn new(task: Box<dyn TaskResource>) -> Self {
        Self {
            task,
            location: None,
            view_model: None,
        }
    }

    pub async fn press(&mut self, button: TaskButton) -> Result<Outcome> {
        let TaskButton::SaveTask(parameters) = button;
        let (Some(location), Some(view_model)) = (&self.location, &self.view_model) else {
            return Err(DomainError::NotLoaded.into());
        };
        if !view_model.editable {
            return Err(DomainError::TaskNotEditable(view_model.task.task.task_state).into());
        }

        self.task
            .set_parameter(&location.params, &parameters)
            .await?;
        info!(task = %view_model.task.task.task_id, "task parameters replaced");

        let location = location.clone();
        self.load(location).await?;
        Ok(Outcome::Reloaded)
    }
}

#[async_trait]
impl Controller for TaskController {
    type ViewModel = TaskViewModel;

    async fn load(&mut self, location: Location) -> Result<()> {
        let task = self.task.load(&location.params).await?;
        self.view_model = Some(TaskViewModel::new(task)?);
        self.location = Some(location);
        Ok(())
    }

    async fn refresh(&mut self) -> Result<Refresh> {
        let location = self.location.clone().ok_or(DomainError::NotLoaded)?;
        self.load(location).await?;
        Ok(Refresh::Reloaded)
    }

    fn view_model(&self) -> Option<&TaskViewModel> {
        self.view_model.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use shared::protocol::JobTask;

    use super::*;
    use crate::{
        fakes::{Call, CallLog, FakeTask},
        Params,
    };

    fn task_in(state: TaskState) -> JobTaskInfo {
        JobTaskInfo {
            task: JobTask {
                task_state: state,
                parameters: Some(json!({ "image": "v1", "retries": 2 })),
                ..JobTask::default()
            },
            ..JobTaskInfo::default()
        }
    }

    async fn loaded(state: TaskState, log: CallLog) -> TaskController {
        let mut controller = TaskController::new(Box::new(FakeTask {
            log,
            task: task_in(state),
        }));
        controller
            .load(Location::new(crate::TASK_VIEW, params()))
            .await
            .expect("load");
        controller
    }

    fn params() -> Params {
        Params::new().with("job", "job-7").with("task", "t4")
    }

    #[tokio::test]
    async fn view_model_pretty_prints_parameters() {
        let controller = loaded(TaskState::Failed, CallLog::default()).await;
        let vm = controller.view_model().expect("vm");

        assert!(vm.editable);
        assert_eq!(vm.json, "{\n  \"image\": \"v1\",\n  \"retries\": 2\n}");
    }

    #[tokio::test]
    async fn failed_task_parameters_can_be_replaced() {
        let log = CallLog::default();
        let mut controller = loaded(TaskState::Failed, log.clone()).await;
        let edited = parse_parameters("{ \"image\": \"v2\" }").expect("json");

        let outcome = controller
            .press(TaskButton::SaveTask(edited.clone()))
            .await
            .expect("save");

        assert_eq!(outcome, Outcome::Reloaded);
        assert_eq!(
            log.calls(),
            [
                Call::LoadTask(params()),
                Call::SetParameter(params(), edited),
                Call::LoadTask(params()),
            ]
        );
    }

    #[tokio::test]
    async fn other_states_are_read_only() {
        let log = CallLog::default();
        let mut controller = loaded(TaskState::Completed, log.clone()).await;
        assert!(!controller.view_model().expect("vm").editable);

        let err = controller
            .press(TaskButton::SaveTask(json!({})))
            .await
            .expect_err("read-only");

        assert!(err.to_string().contains("COMPLETED"));
        assert_eq!(log.calls().len(), 1);
    }

    #[test]
    fn malformed_editor_content_is_rejected() {
        assert!(parse_parameters("{ image: v2 ").is_err());
    }
}

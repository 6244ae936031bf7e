use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::{ElementId, GroupId, JobId, JobState, TaskId, TaskState};

/// Server-side cap on listed jobs when no `limit` is sent.
pub const DEFAULT_JOBS_LIMIT: u32 = 100;

/// ISO-8601 instants in the form the scheduler emits (`2024-01-01T10:00:00.000Z`).
pub mod iso_date {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn format(value: &DateTime<Utc>) -> String {
        value.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn parse(value: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(value.trim())
            .ok()
            .map(|parsed| parsed.with_timezone(&Utc))
    }

    pub mod option {
        use super::*;

        pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match value {
                Some(value) => serializer.serialize_str(&super::format(value)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
        where
            D: Deserializer<'de>,
        {
            let raw: Option<String> = Option::deserialize(deserializer)?;
            match raw {
                None => Ok(None),
                Some(raw) if raw.trim().is_empty() => Ok(None),
                Some(raw) => super::parse(&raw)
                    .map(Some)
                    .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}"))),
            }
        }
    }
}

/// Timing metadata of a job.
///
/// `date_suspend` present means suspend is enabled; the scheduler has no
/// separate flag, so dropping the field is how suspend gets switched off.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobSchedule {
    #[serde(
        default,
        with = "iso_date::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub date_scheduled: Option<DateTime<Utc>>,
    #[serde(
        default,
        with = "iso_date::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub date_suspend: Option<DateTime<Utc>>,
    #[serde(default)]
    pub auto_resume: bool,
}

/// Identity and descriptive fields shared by every job projection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobEnvelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<GroupId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_name: Option<String>,
    pub job_id: JobId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_application: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_owner: Option<String>,
    #[serde(default)]
    pub job_state: JobState,
}

/// The `settings` projection of a job. Also the element type of a job listing.
///
/// Fields this client does not model are kept in `extra` so that a
/// full-replace update sends them back untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobSettings {
    #[serde(flatten)]
    pub envelope: JobEnvelope,
    #[serde(default)]
    pub schedule: JobSchedule,
    #[serde(
        default,
        with = "iso_date::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub date_modified: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobTask {
    pub task_id: TaskId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_type: Option<String>,
    #[serde(default)]
    pub task_state: TaskState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_id: Option<ElementId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,
}

impl JobTask {
    pub fn has_element(&self) -> bool {
        self.element_id
            .as_ref()
            .is_some_and(|element_id| !element_id.as_str().is_empty())
    }
}

/// A single task loaded through the task resource, with its owning job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobTaskInfo {
    #[serde(flatten)]
    pub task: JobTask,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<JobId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_application: Option<String>,
}

/// Server-side task counters of a job.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobProgress {
    #[serde(default)]
    pub ready: u32,
    #[serde(default)]
    pub active: u32,
    #[serde(default)]
    pub completed: u32,
    #[serde(default)]
    pub failed: u32,
    #[serde(default)]
    pub timeout: u32,
}

/// The default projection of a job: envelope, schedule and ordered tasks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobInfo {
    #[serde(flatten)]
    pub envelope: JobEnvelope,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<JobSchedule>,
    #[serde(default)]
    pub tasks: Vec<JobTask>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<JobProgress>,
}

/// The `flow` projection of a job. `graph` holds DOT source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobFlow {
    #[serde(flatten)]
    pub envelope: JobEnvelope,
    #[serde(default)]
    pub graph: String,
}

/// Filter for the job listing. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobsQuery {
    pub filter: Option<String>,
    pub running: Option<bool>,
    pub after: Option<DateTime<Utc>>,
    pub before: Option<DateTime<Utc>>,
    pub limit: Option<u32>,
}

impl JobsQuery {
    /// Fields set on `self` win over `defaults`.
    pub fn merged_over(&self, defaults: &JobsQuery) -> JobsQuery {
        JobsQuery {
            filter: self.filter.clone().or_else(|| defaults.filter.clone()),
            running: self.running.or(defaults.running),
            after: self.after.or(defaults.after),
            before: self.before.or(defaults.before),
            limit: self.limit.or(defaults.limit),
        }
    }

    pub fn effective_limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_JOBS_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn settings_round_trip_keeps_unmodelled_fields() {
        let raw = json!({
            "job_id": "job-1",
            "job_state": "READY",
            "job_name": "upgrade",
            "schedule": {
                "date_scheduled": "2024-03-01T10:00:00.000Z",
                "auto_resume": false
            },
            "labels": ["a", "b"]
        });

        let settings: JobSettings = serde_json::from_value(raw).expect("settings");
        assert_eq!(settings.envelope.job_state, JobState::Ready);
        assert!(settings.schedule.date_suspend.is_none());
        assert_eq!(settings.extra.get("labels"), Some(&json!(["a", "b"])));

        let back = serde_json::to_value(&settings).expect("json");
        assert_eq!(back["labels"], json!(["a", "b"]));
        assert_eq!(back["schedule"]["date_scheduled"], "2024-03-01T10:00:00.000Z");
        assert!(back["schedule"].get("date_suspend").is_none());
    }

    #[test]
    fn query_overrides_win_over_defaults() {
        let defaults = JobsQuery {
            filter: Some("upgrade".into()),
            running: Some(true),
            ..JobsQuery::default()
        };
        let call = JobsQuery {
            running: Some(false),
            limit: Some(10),
            ..JobsQuery::default()
        };

        let merged = call.merged_over(&defaults);
        assert_eq!(merged.filter.as_deref(), Some("upgrade"));
        assert_eq!(merged.running, Some(false));
        assert_eq!(merged.effective_limit(), 10);
        assert_eq!(JobsQuery::default().effective_limit(), DEFAULT_JOBS_LIMIT);
    }

    #[test]
    fn task_element_requires_non_empty_id() {
        let mut task = JobTask::default();
        assert!(!task.has_element());
        task.element_id = Some(ElementId::new(""));
        assert!(!task.has_element());
        task.element_id = Some(ElementId::new("leaf-1"));
        assert!(task.has_element());
    }
}

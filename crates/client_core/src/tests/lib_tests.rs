use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{Method, StatusCode, Uri},
    response::IntoResponse,
    Json, Router,
};
use serde_json::json;
use shared::{
    domain::{JobId, JobState, TaskState},
    protocol::{JobSchedule, JobSettings, JobsQuery},
};
use tokio::{net::TcpListener, sync::Mutex};

use super::*;

#[derive(Debug, Clone)]
struct RecordedRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Bytes,
}

impl RecordedRequest {
    fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn json_body(&self) -> Value {
        serde_json::from_slice(&self.body).expect("json body")
    }
}

type Recorded = Arc<Mutex<Vec<RecordedRequest>>>;

#[derive(Clone)]
struct ServerState {
    requests: Recorded,
    status: StatusCode,
    response: Value,
}

async fn record(
    State(state): State<ServerState>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> impl IntoResponse {
    let query = uri
        .query()
        .map(|raw| {
            url::form_urlencoded::parse(raw.as_bytes())
                .into_owned()
                .collect()
        })
        .unwrap_or_default();
    state.requests.lock().await.push(RecordedRequest {
        method,
        path: uri.path().to_string(),
        query,
        body,
    });
    (state.status, Json(state.response.clone()))
}

async fn spawn_server(status: StatusCode, response: Value) -> anyhow::Result<(RestClient, Recorded)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let requests: Recorded = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new().fallback(record).with_state(ServerState {
        requests: requests.clone(),
        status,
        response,
    });
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((RestClient::new(&format!("http://{addr}"))?, requests))
}

fn job_params() -> Params {
    Params::new().with("job", "job-7")
}

#[tokio::test]
async fn jobs_load_merges_defaults_and_omits_unset_filters() {
    let (rest, requests) = spawn_server(
        StatusCode::OK,
        json!([{ "job_id": "job-1", "job_state": "ACTIVE", "job_name": "upgrade" }]),
    )
    .await
    .expect("server");
    let jobs = JobsClient::with_defaults(
        rest,
        JobsQuery {
            filter: Some("upgrade".into()),
            running: Some(true),
            ..JobsQuery::default()
        },
    );

    let listed = jobs
        .load(&JobsQuery {
            running: Some(false),
            before: iso_date("2024-03-02T10:00:00.000Z"),
            ..JobsQuery::default()
        })
        .await
        .expect("load");

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].envelope.job_id, JobId::new("job-1"));
    assert_eq!(listed[0].envelope.job_state, JobState::Active);

    let requests = requests.lock().await;
    let request = &requests[0];
    assert_eq!(request.method, Method::GET);
    assert_eq!(request.path, "/api/v1/jobs");
    assert_eq!(request.query_value("filter"), Some("upgrade"));
    assert_eq!(request.query_value("running"), Some("false"));
    assert_eq!(request.query_value("before"), Some("2024-03-02T10:00:00.000Z"));
    assert_eq!(request.query_value("after"), None);
    assert_eq!(request.query_value("limit"), None);
}

#[tokio::test]
async fn job_load_selects_projection_by_scope() {
    let (rest, requests) = spawn_server(StatusCode::OK, json!({ "job_id": "job-7" }))
        .await
        .expect("server");

    JobClient::with_scope(rest.clone(), JobScope::Settings)
        .load(&job_params())
        .await
        .expect("settings");
    JobClient::with_scope(rest.clone(), JobScope::Flow)
        .load(&job_params())
        .await
        .expect("flow");
    JobClient::new(rest).load(&job_params()).await.expect("info");

    let paths: Vec<String> = requests
        .lock()
        .await
        .iter()
        .map(|r| r.path.clone())
        .collect();
    assert_eq!(
        paths,
        [
            "/api/v1/jobs/job-7/settings",
            "/api/v1/jobs/job-7/flow",
            "/api/v1/jobs/job-7",
        ]
    );
}

#[tokio::test]
async fn state_transitions_post_without_body_and_remove_deletes() {
    let (rest, requests) = spawn_server(StatusCode::OK, json!({}))
        .await
        .expect("server");
    let job = JobClient::new(rest);

    job.cancel(&job_params()).await.expect("cancel");
    job.confirm(&job_params()).await.expect("confirm");
    job.resume(&job_params()).await.expect("resume");
    job.remove(&job_params()).await.expect("remove");

    let requests = requests.lock().await;
    let calls: Vec<(Method, &str)> = requests
        .iter()
        .map(|r| (r.method.clone(), r.path.as_str()))
        .collect();
    assert_eq!(
        calls,
        [
            (Method::POST, "/api/v1/jobs/job-7/_cancel"),
            (Method::POST, "/api/v1/jobs/job-7/_confirm"),
            (Method::POST, "/api/v1/jobs/job-7/_resume"),
            (Method::DELETE, "/api/v1/jobs/job-7"),
        ]
    );
    assert!(requests[..3].iter().all(|r| r.body.is_empty()));
}

#[tokio::test]
async fn update_settings_puts_the_settings_document_as_given() {
    let (rest, requests) = spawn_server(StatusCode::OK, json!({}))
        .await
        .expect("server");
    let job = JobClient::with_scope(rest, JobScope::Settings);
    let mut settings = JobSettings::default();
    settings.envelope.job_id = JobId::new("job-7");
    settings.envelope.job_state = JobState::Ready;
    settings.schedule = JobSchedule {
        date_scheduled: iso_date("2024-03-01T10:00:00.000Z"),
        date_suspend: None,
        auto_resume: false,
    };

    job.update_settings(&job_params(), &settings)
        .await
        .expect("update");

    let requests = requests.lock().await;
    assert_eq!(requests[0].method, Method::PUT);
    assert_eq!(requests[0].path, "/api/v1/jobs/job-7/settings");
    let body = requests[0].json_body();
    assert_eq!(body["job_state"], "READY");
    assert_eq!(body["schedule"]["date_scheduled"], "2024-03-01T10:00:00.000Z");
    assert!(body["schedule"].get("date_suspend").is_none());
}

#[tokio::test]
async fn progress_reads_server_counters() {
    let (rest, requests) = spawn_server(
        StatusCode::OK,
        json!({ "ready": 1, "active": 2, "completed": 3, "failed": 0, "timeout": 0 }),
    )
    .await
    .expect("server");

    let progress = JobClient::new(rest)
        .progress(&job_params())
        .await
        .expect("progress");

    assert_eq!(progress.active, 2);
    assert_eq!(progress.completed, 3);
    assert_eq!(requests.lock().await[0].path, "/api/v1/jobs/job-7/progress");
}

#[tokio::test]
async fn task_load_and_parameter_replacement() {
    let (rest, requests) = spawn_server(
        StatusCode::OK,
        json!({
            "job_id": "job-7",
            "task_id": "task-3",
            "task_state": "FAILED",
            "parameters": { "image": "v1" }
        }),
    )
    .await
    .expect("server");
    let task = TaskClient::new(rest);
    let params = job_params().with("task", "task-3");

    let loaded = task.load(&params).await.expect("load");
    assert_eq!(loaded.task.task_state, TaskState::Failed);
    assert_eq!(loaded.job_id, Some(JobId::new("job-7")));

    task.set_parameter(&params, &json!({ "image": "v2" }))
        .await
        .expect("set parameter");

    let requests = requests.lock().await;
    assert_eq!(requests[0].method, Method::GET);
    assert_eq!(requests[0].path, "/api/v1/jobs/job-7/tasks/task-3");
    assert_eq!(requests[1].method, Method::PUT);
    assert_eq!(requests[1].path, "/api/v1/jobs/job-7/tasks/task-3/parameters");
    assert_eq!(requests[1].json_body(), json!({ "image": "v2" }));
}

#[tokio::test]
async fn identity_parameters_are_required_before_any_request() {
    let (rest, requests) = spawn_server(StatusCode::OK, json!({}))
        .await
        .expect("server");
    let job = JobClient::new(rest.clone());
    let task = TaskClient::new(rest);

    let err = job.remove(&Params::new()).await.expect_err("no job");
    assert_eq!(
        err.downcast_ref::<shared::error::DomainError>(),
        Some(&shared::error::DomainError::MissingParameter("job".into()))
    );
    assert!(job.cancel(&Params::new().with("job", "")).await.is_err());
    assert!(task.load(&job_params()).await.is_err());
    assert!(task
        .set_parameter(&Params::new().with("task", "task-3"), &json!({}))
        .await
        .is_err());

    assert!(requests.lock().await.is_empty());
}

#[tokio::test]
async fn non_success_status_propagates_to_caller() {
    let (rest, requests) = spawn_server(StatusCode::CONFLICT, json!({ "message": "conflict" }))
        .await
        .expect("server");
    let job = JobClient::new(rest);

    let err = job.cancel(&job_params()).await.expect_err("conflict");
    assert!(err.to_string().contains("409"));
    assert!(job.load(&job_params()).await.is_err());
    // one attempt per call, no retries
    assert_eq!(requests.lock().await.len(), 2);
}

#[test]
fn resolve_keeps_server_path_prefix_and_encodes_segments() {
    let rest = RestClient::new("http://scheduler.local/leitstand/").expect("client");
    let url = rest
        .resolve("/api/v1/jobs/{job}", &[&Params::new().with("job", "a b")])
        .expect("url");
    assert_eq!(url.as_str(), "http://scheduler.local/leitstand/api/v1/jobs/a%20b");
}

#[test]
fn rejects_non_http_server_urls() {
    assert!(RestClient::new("ftp://scheduler.local").is_err());
}

#[test]
fn query_pairs_format_timestamps_as_iso_instants() {
    let pairs = jobs_query_pairs(&JobsQuery {
        after: iso_date("2024-03-01T10:00:00Z"),
        limit: Some(20),
        filter: Some(String::new()),
        ..JobsQuery::default()
    });
    assert_eq!(
        pairs,
        [
            ("after", "2024-03-01T10:00:00.000Z".to_string()),
            ("limit", "20".to_string()),
        ]
    );
}

fn iso_date(raw: &str) -> Option<chrono::DateTime<chrono::Utc>> {
    shared::protocol::iso_date::parse(raw)
}

//! Plain-text rendering of view models.

use std::fmt::Write;

use chrono::{DateTime, Utc};
use shared::protocol::{iso_date, JobFlow, JobInfo};
use ui_core::{
    menu::Page, overview::OverviewViewModel, settings::SettingsViewModel, task::TaskViewModel,
    tasks::TasksViewModel, Controller,
};

const PROGRESS_WIDTH: usize = 30;

pub fn page(page: &Page) -> String {
    let rendered = match page {
        Page::Overview(c) => c.view_model().map(overview),
        Page::Settings(c) => c.view_model().map(settings),
        Page::Tasks(c) => c.view_model().map(tasks),
        Page::Task(c) => c.view_model().map(task),
        Page::ConfirmRemove(c) => c.view_model().map(confirm_remove),
        Page::Flow(c) => c.view_model().map(flow),
    };
    rendered.unwrap_or_default()
}

fn date(value: Option<DateTime<Utc>>) -> String {
    value
        .as_ref()
        .map(iso_date::format)
        .unwrap_or_else(|| "-".into())
}

fn or_dash(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}

pub fn overview(vm: &OverviewViewModel) -> String {
    let query = &vm.query;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Jobs scheduled after {}{} and before {}{}",
        date(query.query.after),
        if query.after_supplied { "" } else { " (default)" },
        date(query.query.before),
        if query.before_supplied { "" } else { " (now)" },
    );
    if let Some(filter) = &query.query.filter {
        let _ = writeln!(out, "Filter: {filter}");
    }
    if vm.jobs.is_empty() {
        let _ = writeln!(out, "No jobs found.");
        return out;
    }
    let _ = writeln!(out, "{:<38} {:<24} {:<10} {}", "JOB", "NAME", "STATE", "SCHEDULED");
    for job in &vm.jobs {
        let _ = writeln!(
            out,
            "{:<38} {:<24} {:<10} {}",
            job.envelope.job_id,
            or_dash(job.envelope.job_name.as_deref()),
            job.envelope.job_state,
            date(job.schedule.date_scheduled),
        );
    }
    let limit = query.query.effective_limit();
    if vm.jobs.len() >= limit as usize {
        let _ = writeln!(out, "Showing the first {limit} jobs; narrow the window to see more.");
    }
    out
}

pub fn settings(vm: &SettingsViewModel) -> String {
    let job = &vm.settings;
    let schedule = &job.schedule;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Job {} ({}) is {}",
        job.envelope.job_id,
        or_dash(job.envelope.job_name.as_deref()),
        job.envelope.job_state
    );
    let _ = writeln!(out, "Scheduled start: {}", date(schedule.date_scheduled));
    if vm.suspend {
        let _ = writeln!(
            out,
            "Suspend at:      {} (auto resume: {})",
            date(schedule.date_suspend),
            if schedule.auto_resume { "yes" } else { "no" }
        );
    } else {
        let _ = writeln!(
            out,
            "Suspend:         off (proposed: {})",
            date(vm.default_date_suspend)
        );
    }
    if vm.disabled {
        let _ = writeln!(out, "Settings are read-only in state {}.", job.envelope.job_state);
    }
    out
}

pub fn tasks(vm: &TasksViewModel) -> String {
    let job = &vm.job;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Job {} ({}) is {}{}",
        job.envelope.job_id,
        or_dash(job.envelope.job_name.as_deref()),
        job.envelope.job_state,
        if vm.in_progress { ", in progress" } else { "" }
    );
    if let Some(progress) = &vm.progress {
        let _ = writeln!(out, "{}", progress.render_bar(PROGRESS_WIDTH));
    } else if let Some(counters) = &job.progress {
        let _ = writeln!(
            out,
            "ready {}, active {}, completed {}, failed {}, timeout {}",
            counters.ready, counters.active, counters.completed, counters.failed, counters.timeout
        );
    }
    if !vm.actions.is_empty() {
        let labels: Vec<String> = vm
            .actions
            .iter()
            .map(|a| format!("[{}]", a.label))
            .collect();
        let _ = writeln!(out, "Actions (Operator): {}", labels.join(" "));
    }
    for task in &job.tasks {
        let _ = write!(
            out,
            "  {:<38} {:<24} {:<10}",
            task.task_id,
            or_dash(task.task_name.as_deref()),
            task.task_state
        );
        if vm.render_element_column {
            let element = task
                .element_name
                .as_deref()
                .or(task.element_id.as_ref().map(|e| e.as_str()));
            let _ = write!(out, " {}", or_dash(element));
        }
        out.push('\n');
    }
    out
}

pub fn task(vm: &TaskViewModel) -> String {
    let task = &vm.task.task;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Task {} ({}) is {}",
        task.task_id,
        or_dash(task.task_name.as_deref()),
        task.task_state
    );
    let _ = writeln!(
        out,
        "Parameters{}:",
        if vm.editable { " (editable)" } else { "" }
    );
    let _ = writeln!(out, "{}", vm.json);
    out
}

pub fn confirm_remove(job: &JobInfo) -> String {
    format!(
        "Remove job {} ({}) in state {}? Re-run with --yes to confirm.\n",
        job.envelope.job_id,
        or_dash(job.envelope.job_name.as_deref()),
        job.envelope.job_state
    )
}

pub fn flow(flow: &JobFlow) -> String {
    format!("{}\n", flow.graph.trim_end())
}

use std::{fs, path::PathBuf, process::ExitCode, time::Duration};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use client_core::{Params, RestClient};
use shared::protocol::{iso_date, JobsQuery};
use tracing::info;
use tracing_subscriber::EnvFilter;
use ui_core::{
    actions::ActionKind,
    menu::{Menu, Page},
    settings::{SettingsButton, SettingsForm, StartMode},
    task::{parse_parameters, TaskButton},
    Location, Outcome, Refresh, CONFIRM_REMOVE_VIEW, JOBS_VIEW, JOB_VIEW, TASKFLOW_VIEW,
    TASKS_VIEW, TASK_VIEW,
};

mod config;
mod events;
mod render;

use events::UiError;

#[derive(Parser, Debug)]
#[command(name = "jobs_console", about = "Inspect and steer scheduled jobs")]
struct Cli {
    /// Scheduler base URL; overrides config and environment.
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List jobs, by default those scheduled within the last 24 hours.
    Jobs {
        #[arg(long)]
        filter: Option<String>,
        #[arg(long)]
        running: bool,
        #[arg(long)]
        after: Option<String>,
        #[arg(long)]
        before: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Show or edit the schedule of a job.
    Job {
        #[arg(long)]
        job: String,
        #[arg(long)]
        save: bool,
        #[arg(long, requires = "save")]
        start_immediately: bool,
        #[arg(long, requires = "save", value_parser = parse_timestamp)]
        date_scheduled: Option<DateTime<Utc>>,
        #[arg(long, requires = "save")]
        suspend: bool,
        #[arg(long, requires = "suspend", value_parser = parse_timestamp)]
        date_suspend: Option<DateTime<Utc>>,
        #[arg(long, requires = "suspend")]
        auto_resume: bool,
    },
    /// Show the tasks of a job and run job actions.
    Tasks {
        #[arg(long)]
        job: String,
        #[arg(long, value_enum)]
        action: Option<ActionArg>,
        /// Keep polling until the job completes.
        #[arg(long)]
        watch: bool,
    },
    /// Remove a job after confirmation.
    ConfirmRemove {
        #[arg(long)]
        job: String,
        #[arg(long)]
        yes: bool,
    },
    /// Print the task-flow graph of a job as DOT.
    Taskflow {
        #[arg(long)]
        job: String,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Show a task, or replace its parameters from a JSON file.
    Task {
        #[arg(long)]
        job: String,
        #[arg(long)]
        task: String,
        #[arg(long)]
        parameters: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ActionArg {
    Cancel,
    Confirm,
    Resume,
    Remove,
}

impl From<ActionArg> for ActionKind {
    fn from(value: ActionArg) -> Self {
        match value {
            ActionArg::Cancel => ActionKind::Cancel,
            ActionArg::Confirm => ActionKind::Confirm,
            ActionArg::Resume => ActionKind::Resume,
            ActionArg::Remove => ActionKind::Remove,
        }
    }
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    iso_date::parse(raw).ok_or_else(|| format!("expected an ISO-8601 instant, got '{raw}'"))
}

impl Command {
    fn location(&self) -> Location {
        let job = |job: &str| Params::new().with("job", job);
        match self {
            Command::Jobs {
                filter,
                running,
                after,
                before,
                limit,
            } => {
                let mut params = Params::new();
                let optional = [
                    ("filter", filter.clone()),
                    ("running", running.then(|| "true".to_string())),
                    ("after", after.clone()),
                    ("before", before.clone()),
                    ("limit", limit.map(|l| l.to_string())),
                ];
                for (key, value) in optional {
                    if let Some(value) = value {
                        params.insert(key, value);
                    }
                }
                Location::new(JOBS_VIEW, params)
            }
            Command::Job { job: id, .. } => Location::new(JOB_VIEW, job(id)),
            Command::Tasks { job: id, .. } => Location::new(TASKS_VIEW, job(id)),
            Command::ConfirmRemove { job: id, .. } => Location::new(CONFIRM_REMOVE_VIEW, job(id)),
            Command::Taskflow { job: id, .. } => Location::new(TASKFLOW_VIEW, job(id)),
            Command::Task { job: id, task, .. } => {
                Location::new(TASK_VIEW, job(id).with("task", task.as_str()))
            }
        }
    }
}

/// Presses the button the command asks for, if any.
async fn press(page: &mut Page, command: &Command) -> Result<Option<Outcome>> {
    let outcome = match (page, command) {
        (
            Page::Settings(controller),
            Command::Job {
                save: true,
                start_immediately,
                date_scheduled,
                suspend,
                date_suspend,
                auto_resume,
                ..
            },
        ) => {
            let form = SettingsForm {
                start_mode: if *start_immediately {
                    StartMode::Immediate
                } else {
                    StartMode::Scheduled
                },
                date_scheduled: *date_scheduled,
                suspend: *suspend,
                date_suspend: *date_suspend,
                auto_resume: *auto_resume,
            };
            let outcome = controller.press(SettingsButton::SaveSettings(form)).await?;
            eprintln!("Settings saved.");
            outcome
        }
        (
            Page::Tasks(controller),
            Command::Tasks {
                action: Some(action),
                ..
            },
        ) => controller.press((*action).into()).await?,
        (Page::ConfirmRemove(controller), Command::ConfirmRemove { yes: true, .. }) => {
            controller.confirm_remove().await?
        }
        (
            Page::Task(controller),
            Command::Task {
                parameters: Some(path),
                ..
            },
        ) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read parameters from '{}'", path.display()))?;
            controller
                .press(TaskButton::SaveTask(parse_parameters(&text)?))
                .await?
        }
        _ => return Ok(None),
    };
    Ok(Some(outcome))
}

async fn run(cli: Cli) -> Result<()> {
    let mut settings = config::load_settings(cli.config.as_deref())?;
    if let Some(server_url) = cli.server_url {
        settings.server_url = server_url;
    }
    let rest = RestClient::with_timeout(
        &settings.server_url,
        Duration::from_secs(settings.request_timeout_secs),
    )?;
    let mut menu = Menu::new(
        &rest,
        JobsQuery {
            filter: settings.default_filter.clone(),
            ..JobsQuery::default()
        },
    );

    let command = cli.command;
    let location = command.location();
    let view = location.view.clone();
    let outcome = {
        let page = menu.navigate(location).await?;
        press(page, &command).await?
    };
    let page = match outcome {
        Some(Outcome::Navigate(next)) => menu.navigate(next).await?,
        _ => menu.page_mut(&view)?,
    };

    if let (Page::Flow(_), Command::Taskflow {
        output: Some(path), ..
    }) = (&*page, &command)
    {
        fs::write(path, render::page(page))
            .with_context(|| format!("failed to write graph to '{}'", path.display()))?;
        info!(path = %path.display(), "task flow graph written");
        return Ok(());
    }
    print!("{}", render::page(page));

    if matches!(command, Command::Tasks { watch: true, .. }) {
        let mut ticks = tokio::time::interval(Duration::from_secs(settings.refresh_interval_secs));
        ticks.tick().await;
        loop {
            ticks.tick().await;
            match page.refresh().await? {
                Refresh::Reloaded => print!("{}", render::page(page)),
                Refresh::Stopped => {
                    info!("job completed, polling stopped");
                    break;
                }
            }
        }
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let ui = UiError::from_error(&err);
            eprintln!("{}\n{}", ui.headline(), ui.message());
            ExitCode::FAILURE
        }
    }
}

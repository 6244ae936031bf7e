//! The routing table from view names to controllers, built once by the shell.

use std::collections::BTreeMap;

use anyhow::Result;
use client_core::{JobClient, JobScope, JobsClient, Params, RestClient, TaskClient};
use shared::{error::DomainError, protocol::JobsQuery};
use tracing::debug;

use crate::{
    confirm_remove::ConfirmRemoveController, flow::FlowController, overview::OverviewController,
    settings::SettingsController, task::TaskController, tasks::TasksController, Controller,
    Location, Refresh, CONFIRM_REMOVE_VIEW, JOBS_VIEW, JOB_VIEW, TASKFLOW_VIEW, TASKS_VIEW,
    TASK_VIEW,
};

pub enum Page {
    Overview(OverviewController),
    Settings(SettingsController),
    Tasks(TasksController),
    Task(TaskController),
    ConfirmRemove(ConfirmRemoveController),
    Flow(FlowController),
}

impl Page {
    pub async fn load(&mut self, location: Location) -> Result<()> {
        match self {
            Page::Overview(c) => c.load(location).await,
            Page::Settings(c) => c.load(location).await,
            Page::Tasks(c) => c.load(location).await,
            Page::Task(c) => c.load(location).await,
            Page::ConfirmRemove(c) => c.load(location).await,
            Page::Flow(c) => c.load(location).await,
        }
    }

    pub async fn refresh(&mut self) -> Result<Refresh> {
        match self {
            Page::Overview(c) => c.refresh().await,
            Page::Settings(c) => c.refresh().await,
            Page::Tasks(c) => c.refresh().await,
            Page::Task(c) => c.refresh().await,
            Page::ConfirmRemove(c) => c.refresh().await,
            Page::Flow(c) => c.refresh().await,
        }
    }
}

pub struct Menu {
    pages: BTreeMap<&'static str, Page>,
    default_view: &'static str,
}

impl Menu {
    /// Wires every view to its controller. Each controller gets its own
    /// resource client.
    pub fn new(rest: &RestClient, jobs_defaults: JobsQuery) -> Self {
        let job = |scope: Option<JobScope>| -> Box<JobClient> {
            Box::new(match scope {
                Some(scope) => JobClient::with_scope(rest.clone(), scope),
                None => JobClient::new(rest.clone()),
            })
        };
        Self::from_pages(
            [
                (
                    JOBS_VIEW,
                    Page::Overview(OverviewController::new(Box::new(
                        JobsClient::with_defaults(rest.clone(), jobs_defaults),
                    ))),
                ),
                (
                    JOB_VIEW,
                    Page::Settings(SettingsController::new(job(Some(JobScope::Settings)))),
                ),
                (
                    CONFIRM_REMOVE_VIEW,
                    Page::ConfirmRemove(ConfirmRemoveController::new(job(None))),
                ),
                (TASKS_VIEW, Page::Tasks(TasksController::new(job(None)))),
                (
                    TASK_VIEW,
                    Page::Task(TaskController::new(Box::new(TaskClient::new(rest.clone())))),
                ),
                (
                    TASKFLOW_VIEW,
                    Page::Flow(FlowController::new(job(Some(JobScope::Flow)))),
                ),
            ],
            JOBS_VIEW,
        )
    }

    pub fn from_pages(
        pages: impl IntoIterator<Item = (&'static str, Page)>,
        default_view: &'static str,
    ) -> Self {
        Self {
            pages: pages.into_iter().collect(),
            default_view,
        }
    }

    pub fn views(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.pages.keys().copied()
    }

    pub fn default_location(&self) -> Location {
        Location::new(self.default_view, Params::new())
    }

    pub fn page_mut(&mut self, view: &str) -> Result<&mut Page, DomainError> {
        self.pages
            .get_mut(view)
            .ok_or_else(|| DomainError::UnknownView(view.to_string()))
    }

    /// Loads the controller registered for `location.view`.
    pub async fn navigate(&mut self, location: Location) -> Result<&mut Page> {
        debug!(view = %location.view, "navigating");
        let page = self.page_mut(&location.view)?;
        page.load(location).await?;
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_view_is_routed_and_jobs_is_the_landing_page() {
        let rest = RestClient::new("http://scheduler.local").expect("client");
        let mut menu = Menu::new(&rest, JobsQuery::default());

        let views: Vec<&str> = menu.views().collect();
        assert_eq!(
            views,
            ["confirm-remove", "job", "jobs", "task", "taskflow", "tasks"]
        );
        assert_eq!(menu.default_location().view, JOBS_VIEW);
        assert!(matches!(menu.page_mut(TASKS_VIEW), Ok(Page::Tasks(_))));
        assert!(matches!(menu.page_mut(JOB_VIEW), Ok(Page::Settings(_))));
    }

    #[tokio::test]
    async fn unknown_views_are_reported() {
        let rest = RestClient::new("http://scheduler.local").expect("client");
        let mut menu = Menu::new(&rest, JobsQuery::default());

        let err = menu
            .navigate(Location::new("settings.html", Params::new()))
            .await
            .err()
            .expect("unknown view");
        assert_eq!(
            err.downcast_ref::<DomainError>(),
            Some(&DomainError::UnknownView("settings.html".into()))
        );
    }
}

//! Schedule editing for a single job.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use client_core::JobResource;
use shared::{domain::JobState, error::DomainError, protocol::JobSettings};
use tracing::info;

use crate::{Controller, Location, Outcome, Refresh};

/// Offset of the proposed suspend time from the scheduled start.
pub const DEFAULT_SUSPEND_OFFSET_HOURS: i64 = 4;

pub fn is_editable(state: JobState) -> bool {
    matches!(state, JobState::Ready | JobState::Failed)
}

#[derive(Debug, Clone, PartialEq)]
pub struct SettingsViewModel {
    pub settings: JobSettings,
    pub suspend: bool,
    /// Settings are read-only unless the job is READY or FAILED.
    pub disabled: bool,
    pub default_date_suspend: Option<DateTime<Utc>>,
}

impl SettingsViewModel {
    pub fn new(settings: JobSettings) -> Self {
        let schedule = &settings.schedule;
        let default_date_suspend = schedule.date_suspend.or_else(|| {
            schedule
                .date_scheduled
                .map(|start| start + Duration::hours(DEFAULT_SUSPEND_OFFSET_HOURS))
        });
        Self {
            suspend: schedule.date_suspend.is_some(),
            disabled: !is_editable(settings.envelope.job_state),
            default_date_suspend,
            settings,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StartMode {
    #[default]
    Scheduled,
    Immediate,
}

/// State of the settings form controls at the time "save" is pressed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsForm {
    pub start_mode: StartMode,
    /// A new start time; ignored when starting immediately.
    pub date_scheduled: Option<DateTime<Utc>>,
    pub suspend: bool,
    pub date_suspend: Option<DateTime<Utc>>,
    pub auto_resume: bool,
}

/// Builds the complete settings document submitted on save.
///
/// A checked suspend box always yields a suspend date: the one entered,
/// the one already set, or the (possibly new) start plus the default
/// offset. Without any of them the save is refused.
pub fn assemble_settings(
    view_model: &SettingsViewModel,
    form: &SettingsForm,
    now: DateTime<Utc>,
) -> Result<JobSettings, DomainError> {
    let mut settings = view_model.settings.clone();
    let schedule = &mut settings.schedule;
    match form.start_mode {
        StartMode::Immediate => schedule.date_scheduled = Some(now),
        StartMode::Scheduled => {
            if let Some(start) = form.date_scheduled {
                schedule.date_scheduled = Some(start);
            }
        }
    }
    if form.suspend {
        let proposed = schedule
            .date_scheduled
            .map(|start| start + Duration::hours(DEFAULT_SUSPEND_OFFSET_HOURS));
        schedule.date_suspend = Some(
            form.date_suspend
                .or(schedule.date_suspend)
                .or(proposed)
                .ok_or(DomainError::SuspendDateRequired)?,
        );
        schedule.auto_resume = form.auto_resume;
    } else {
        schedule.date_suspend = None;
    }
    Ok(settings)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsButton {
    SaveSettings(SettingsForm),
}

pub struct SettingsController {
    job: Box<dyn JobResource>,
    location: Option<Location>,
    view_model: Option<SettingsViewModel>,
}

impl SettingsController {
    /// `job` must load the `settings` scope.
    pub fn new(job: Box<dyn JobResource>) -> Self {
        Self {
            job,
            location: None,
            view_model: None,
        }
    }

    pub async fn press(&mut self, button: SettingsButton) -> Result<Outcome> {
        let SettingsButton::SaveSettings(form) = button;
        let (Some(location), Some(view_model)) = (&self.location, &self.view_model) else {
            return Err(DomainError::NotLoaded.into());
        };
        if view_model.disabled {
            return Err(DomainError::ActionNotAvailable {
                action: "save-settings".into(),
                state: view_model.settings.envelope.job_state,
            }
            .into());
        }

        let settings = assemble_settings(view_model, &form, Utc::now())?;
        info!(
            job = %settings.envelope.job_id,
            suspend = settings.schedule.date_suspend.is_some(),
            "saving job settings"
        );
        self.job
            .update_settings(&location.params, &settings)
            .await?;
        Ok(Outcome::Stay)
    }
}

#[async_trait]
impl Controller for SettingsController {
    type ViewModel = SettingsViewModel;

    async fn load(&mut self, location: Location) -> Result<()> {
        let raw = self.job.load(&location.params).await?;
        let settings: JobSettings = serde_json::from_value(raw)?;
        self.view_model = Some(SettingsViewModel::new(settings));
        self.location = Some(location);
        Ok(())
    }

    async fn refresh(&mut self) -> Result<Refresh> {
        let location = self.location.clone().ok_or(DomainError::NotLoaded)?;
        self.load(location).await?;
        Ok(Refresh::Reloaded)
    }

    fn view_model(&self) -> Option<&SettingsViewModel> {
        self.view_model.as_ref()
    }
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;

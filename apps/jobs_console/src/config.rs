use std::{fs, path::Path};

use anyhow::Context;
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "jobs_console.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server_url: String,
    pub default_filter: Option<String>,
    pub request_timeout_secs: u64,
    pub refresh_interval_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8080".into(),
            default_filter: None,
            request_timeout_secs: 30,
            refresh_interval_secs: 5,
        }
    }
}

/// Defaults, then the config file, then the environment.
///
/// A missing default config file is fine; a missing explicit one is not.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = match path {
        Some(path) => read_file(path)?,
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            read_file(Path::new(DEFAULT_CONFIG_FILE))?
        }
        None => Settings::default(),
    };
    apply_env(&mut settings, |key| std::env::var(key).ok());
    settings.clamp_intervals();
    Ok(settings)
}

impl Settings {
    /// Zero periods would make the refresh timer panic and every request
    /// time out at once; both are raised to one second.
    fn clamp_intervals(&mut self) {
        self.refresh_interval_secs = self.refresh_interval_secs.max(1);
        self.request_timeout_secs = self.request_timeout_secs.max(1);
    }
}

fn read_file(path: &Path) -> anyhow::Result<Settings> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file '{}'", path.display()))?;
    toml::from_str(&raw)
        .with_context(|| format!("failed to parse config file '{}'", path.display()))
}

fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("JOBS_SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = lookup("APP__SERVER_URL") {
        settings.server_url = v;
    }

    if let Some(v) = lookup("APP__DEFAULT_FILTER") {
        settings.default_filter = Some(v).filter(|v| !v.is_empty());
    }

    if let Some(v) = lookup("APP__REQUEST_TIMEOUT_SECS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.request_timeout_secs = parsed;
        }
    }

    if let Some(v) = lookup("APP__REFRESH_INTERVAL_SECS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.refresh_interval_secs = parsed;
        }
    }
}

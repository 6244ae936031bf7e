//! Generic failure display. Errors are reported, never recovered from.

use shared::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Auth,
    Transport,
    NotFound,
    Validation,
    Unknown,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    message: String,
}

impl UiError {
    pub fn from_error(err: &anyhow::Error) -> Self {
        if err.downcast_ref::<DomainError>().is_some() {
            return Self {
                category: UiErrorCategory::Validation,
                message: err.to_string(),
            };
        }
        Self::from_message(format!("{err:#}"))
    }

    pub fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        let lower = message.to_ascii_lowercase();
        let category = if lower.contains("401")
            || lower.contains("403")
            || lower.contains("unauthorized")
            || lower.contains("forbidden")
        {
            UiErrorCategory::Auth
        } else if lower.contains("404") || lower.contains("not found") {
            UiErrorCategory::NotFound
        } else if lower.contains("invalid")
            || lower.contains("missing")
            || lower.contains("malformed")
        {
            UiErrorCategory::Validation
        } else if lower.contains("timed out")
            || lower.contains("connection")
            || lower.contains("dns")
            || lower.contains("error sending request")
        {
            UiErrorCategory::Transport
        } else {
            UiErrorCategory::Unknown
        };

        Self { category, message }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn headline(&self) -> &'static str {
        match self.category {
            UiErrorCategory::Auth => "Not authorized; check your credentials and role.",
            UiErrorCategory::Transport => "Scheduler unreachable; check URL/network and retry.",
            UiErrorCategory::NotFound => "The requested job or task does not exist.",
            UiErrorCategory::Validation => "Request rejected.",
            UiErrorCategory::Unknown => "Request failed.",
        }
    }
}

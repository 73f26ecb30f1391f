//! User-facing notifications (the toast popups of the web client)

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Success,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub level: Level,
    pub title: String,
    /// Auto-dismiss delay; `None` waits for the user
    pub dismiss_after: Option<Duration>,
    pub raised_at: DateTime<Utc>,
}

impl Notification {
    pub fn success(title: impl Into<String>) -> Self {
        Self::new(Level::Success, title)
    }

    pub fn warning(title: impl Into<String>) -> Self {
        Self::new(Level::Warning, title)
    }

    fn new(level: Level, title: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            dismiss_after: None,
            raised_at: Utc::now(),
        }
    }

    pub fn with_timer(mut self, after: Duration) -> Self {
        self.dismiss_after = Some(after);
        self
    }
}

impl std::fmt::Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self.level {
            Level::Success => "ok",
            Level::Warning => "warn",
        };
        write!(f, "[{}] {}", tag, self.title)
    }
}

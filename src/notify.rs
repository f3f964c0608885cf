//! Notification sink for user-visible poll outcomes
//!
//! Pollers fire one notice when a watched resource reaches a terminal state.
//! Presentation is up to the sink.

use std::time::Duration;

/// Severity of a user-visible notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

/// A (message, severity, duration) triple
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub severity: Severity,
    /// How long a transient display should keep the notice visible
    pub duration: Duration,
}

impl Notice {
    pub const SHORT: Duration = Duration::from_secs(4);
    pub const LONG: Duration = Duration::from_secs(8);

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Success,
            duration: Self::SHORT,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Info,
            duration: Self::SHORT,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Warning,
            duration: Self::LONG,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Error,
            duration: Self::LONG,
        }
    }
}

/// Display sink for notices
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Routes notices to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: Notice) {
        match notice.severity {
            Severity::Success | Severity::Info => log::info!("{}", notice.message),
            Severity::Warning => log::warn!("{}", notice.message),
            Severity::Error => log::error!("{}", notice.message),
        }
    }
}

/// Collects notices in memory, for assertions in tests
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub notices: std::sync::Mutex<Vec<Notice>>,
}

#[cfg(test)]
impl RecordingNotifier {
    pub fn taken(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}

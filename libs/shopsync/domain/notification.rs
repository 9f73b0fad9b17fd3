//! User-facing notification intents
//!
//! The core only decides whether and what to tell the user; rendering is up
//! to whichever [`Notifier`] the host is wired with.

use std::time::Duration;

/// How long a regular notification stays visible
pub const DEFAULT_DURATION: Duration = Duration::from_secs(5);

/// Duration hint for transient status messages (connection, order updates)
pub const SHORT_DURATION: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    pub duration: Duration,
}

impl Notification {
    pub fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            duration: DEFAULT_DURATION,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Info, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Error, message)
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}

/// Sink for notification intents
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

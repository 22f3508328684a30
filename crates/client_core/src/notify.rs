//! Fire-and-forget notification bus.

use std::{
    sync::atomic::{AtomicU64, Ordering},
    sync::Arc,
    time::Duration,
};

use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

pub const DEFAULT_DURATION: Duration = Duration::from_millis(3000);
pub const LONG_DURATION: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl NotificationLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationLevel::Info => "info",
            NotificationLevel::Success => "success",
            NotificationLevel::Warning => "warning",
            NotificationLevel::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub level: NotificationLevel,
    pub duration: Duration,
}

#[derive(Clone)]
pub struct Notifier {
    sender: broadcast::Sender<Notification>,
    next_id: Arc<AtomicU64>,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(256);
        Self {
            sender,
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }

    pub fn notify(
        &self,
        message: impl Into<String>,
        level: NotificationLevel,
        duration: Duration,
    ) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let message = message.into();
        match level {
            NotificationLevel::Error => error!(id, %message, "notify"),
            NotificationLevel::Warning => warn!(id, %message, "notify"),
            NotificationLevel::Info | NotificationLevel::Success => {
                info!(id, level = level.as_str(), %message, "notify")
            }
        }
        if self
            .sender
            .send(Notification {
                id,
                message,
                level,
                duration,
            })
            .is_err()
        {
            debug!(id, "notify: no subscribers, dropped");
        }
        id
    }

    pub fn info(&self, message: impl Into<String>) -> u64 {
        self.notify(message, NotificationLevel::Info, DEFAULT_DURATION)
    }

    pub fn success(&self, message: impl Into<String>) -> u64 {
        self.notify(message, NotificationLevel::Success, DEFAULT_DURATION)
    }

    pub fn warning(&self, message: impl Into<String>) -> u64 {
        self.notify(message, NotificationLevel::Warning, DEFAULT_DURATION)
    }

    pub fn error(&self, message: impl Into<String>) -> u64 {
        self.notify(message, NotificationLevel::Error, DEFAULT_DURATION)
    }
}

#[cfg(test)]
#[path = "tests/notify_tests.rs"]
mod tests;

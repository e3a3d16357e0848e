use std::collections::VecDeque;
use std::time::Duration;

use tracing::warn;

use crate::domain::{ApiError, Notification, NotificationLevel};

/// FIFO of toasts; the front one is on screen until it expires.
#[derive(Debug)]
pub struct NotificationManager {
    queue: VecDeque<Notification>,
    default_duration: Duration,
}

impl Default for NotificationManager {
    fn default() -> Self {
        Self::new(Duration::from_secs(5))
    }
}

impl NotificationManager {
    #[must_use]
    pub fn new(default_duration: Duration) -> Self {
        Self {
            queue: VecDeque::new(),
            default_duration,
        }
    }

    pub fn notify(
        &mut self,
        level: NotificationLevel,
        title: impl Into<String>,
        message: impl Into<String>,
    ) {
        let notification =
            Notification::new(level, title, message).with_duration(self.default_duration);
        self.queue.push_back(notification);
    }

    pub fn info(&mut self, title: impl Into<String>, message: impl Into<String>) {
        self.notify(NotificationLevel::Info, title, message);
    }

    pub fn success(&mut self, title: impl Into<String>, message: impl Into<String>) {
        self.notify(NotificationLevel::Success, title, message);
    }

    pub fn warn(&mut self, title: impl Into<String>, message: impl Into<String>) {
        self.notify(NotificationLevel::Warn, title, message);
    }

    pub fn error(&mut self, title: impl Into<String>, message: impl Into<String>) {
        self.notify(NotificationLevel::Error, title, message);
    }

    /// Toasts an API failure. Configuration failures are only logged.
    pub fn api_error(&mut self, title: impl Into<String>, error: &ApiError) {
        let title = title.into();
        if !error.should_notify() {
            warn!(
                title = %title,
                status = error.status(),
                code = ?error.code(),
                error = %error,
                "Suppressed notification for configuration error"
            );
            return;
        }
        self.error(title, error.message());
    }

    pub fn tick(&mut self) {
        if let Some(front) = self.queue.front_mut() {
            front.mark_displayed();
            if front.is_expired() {
                self.queue.pop_front();
                if let Some(next) = self.queue.front_mut() {
                    next.mark_displayed();
                }
            }
        }
    }

    /// Drops the toast on screen.
    pub fn dismiss(&mut self) {
        self.queue.pop_front();
        if let Some(next) = self.queue.front_mut() {
            next.mark_displayed();
        }
    }

    #[must_use]
    pub fn current_notification(&self) -> Option<&Notification> {
        self.queue.front()
    }

    #[must_use]
    pub fn has_notifications(&self) -> bool {
        !self.queue.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

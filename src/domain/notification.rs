//! Toast notifications shown on top of the current screen.

use std::time::{Duration, Instant};

/// Severity of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warn,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub message: String,
    pub displayed_at: Option<Instant>,
    pub duration: Duration,
}

impl Notification {
    #[must_use]
    pub fn new(
        level: NotificationLevel,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            level,
            title: title.into(),
            message: message.into(),
            displayed_at: None,
            duration: Duration::from_secs(5),
        }
    }

    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Expiry counts from the first time the toast was shown, not from creation.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.displayed_at
            .is_some_and(|start| start.elapsed() > self.duration)
    }

    pub fn mark_displayed(&mut self) {
        if self.displayed_at.is_none() {
            self.displayed_at = Some(Instant::now());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_expired_before_display() {
        let n = Notification::new(NotificationLevel::Error, "Exams", "Failed to load classes")
            .with_duration(Duration::ZERO);
        assert!(!n.is_expired());
    }

    #[test]
    fn test_expires_after_display() {
        let mut n = Notification::new(NotificationLevel::Success, "Exams", "Created")
            .with_duration(Duration::from_nanos(1));
        n.mark_displayed();
        std::thread::sleep(Duration::from_millis(1));
        assert!(n.is_expired());
    }
}

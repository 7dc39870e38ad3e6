//! Transient user notices (toasts) fanned out to any number of listeners.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use reaper_core::NotificationConfig;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Success => "success",
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserNotice {
    pub id: String,
    pub text: String,
    pub severity: Severity,
    pub created_at: DateTime<Utc>,
    pub display_duration_ms: u64,
}

impl UserNotice {
    pub fn new(text: impl Into<String>, severity: Severity, display_duration_ms: u64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            severity,
            created_at: Utc::now(),
            display_duration_ms,
        }
    }

    /// When a listener should hide the notice. Not enforced by [`Notifier`].
    pub fn expires_at(&self) -> DateTime<Utc> {
        let millis = i64::try_from(self.display_duration_ms).unwrap_or(i64::MAX);
        Duration::try_milliseconds(millis)
            .and_then(|d| self.created_at.checked_add_signed(d))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoticeEvent {
    Added(UserNotice),
    Removed(String),
}

/// Publishes notices to every current subscriber.
///
/// Sending never blocks; a subscriber that falls behind by more than the
/// channel capacity sees `RecvError::Lagged` and skips ahead.
#[derive(Debug, Clone)]
pub struct Notifier {
    events: broadcast::Sender<NoticeEvent>,
    durations: NotificationConfig,
}

impl Notifier {
    pub fn new(capacity: usize, durations: NotificationConfig) -> Self {
        let (events, _) = broadcast::channel(capacity.max(1));
        Self { events, durations }
    }

    pub fn from_config(config: &NotificationConfig) -> Self {
        Self::new(config.channel_capacity, config.clone())
    }

    pub fn subscribe(&self) -> broadcast::Receiver<NoticeEvent> {
        self.events.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.events.receiver_count()
    }

    pub fn success(&self, text: impl Into<String>) -> UserNotice {
        self.success_for(text, self.durations.success_ms)
    }

    pub fn success_for(&self, text: impl Into<String>, duration_ms: u64) -> UserNotice {
        self.publish(UserNotice::new(text, Severity::Success, duration_ms))
    }

    pub fn error(&self, text: impl Into<String>) -> UserNotice {
        self.error_for(text, self.durations.error_ms)
    }

    pub fn error_for(&self, text: impl Into<String>, duration_ms: u64) -> UserNotice {
        self.publish(UserNotice::new(text, Severity::Error, duration_ms))
    }

    pub fn warning(&self, text: impl Into<String>) -> UserNotice {
        self.warning_for(text, self.durations.warning_ms)
    }

    pub fn warning_for(&self, text: impl Into<String>, duration_ms: u64) -> UserNotice {
        self.publish(UserNotice::new(text, Severity::Warning, duration_ms))
    }

    pub fn info(&self, text: impl Into<String>) -> UserNotice {
        self.info_for(text, self.durations.info_ms)
    }

    pub fn info_for(&self, text: impl Into<String>, duration_ms: u64) -> UserNotice {
        self.publish(UserNotice::new(text, Severity::Info, duration_ms))
    }

    /// Ask listeners to drop the notice with this id.
    pub fn dismiss(&self, id: impl Into<String>) {
        let id = id.into();
        tracing::debug!("Dismissing notice {}", id);
        let _ = self.events.send(NoticeEvent::Removed(id));
    }

    fn publish(&self, notice: UserNotice) -> UserNotice {
        tracing::debug!("Notice ({}): {}", notice.severity, notice.text);
        // Err only means nobody is listening
        let _ = self.events.send(NoticeEvent::Added(notice.clone()));
        notice
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::from_config(&NotificationConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_durations() {
        let notifier = Notifier::default();
        assert_eq!(notifier.success("a").display_duration_ms, 5000);
        assert_eq!(notifier.error("a").display_duration_ms, 7000);
        assert_eq!(notifier.warning("a").display_duration_ms, 6000);
        assert_eq!(notifier.info("a").display_duration_ms, 5000);
        assert_eq!(notifier.info_for("a", 250).display_duration_ms, 250);
    }

    #[test]
    fn publish_without_subscribers() {
        let notifier = Notifier::default();
        assert_eq!(notifier.subscriber_count(), 0);
        let notice = notifier.warning("No one is listening");
        assert_eq!(notice.severity, Severity::Warning);
        notifier.dismiss(notice.id);
    }

    #[test]
    fn ids_are_unique_uuids() {
        let notifier = Notifier::default();
        let a = notifier.info("a");
        let b = notifier.info("a");
        assert_ne!(a.id, b.id);
        assert!(Uuid::parse_str(&a.id).is_ok());
    }

    #[test]
    fn expiry_hint() {
        let notice = UserNotice::new("Saved", Severity::Success, 5000);
        assert_eq!(
            notice.expires_at() - notice.created_at,
            Duration::milliseconds(5000)
        );
        assert!(!notice.is_expired(notice.created_at));
        assert!(notice.is_expired(notice.created_at + Duration::seconds(5)));
    }

    #[test]
    fn huge_duration_saturates() {
        let notice = UserNotice::new("x", Severity::Info, u64::MAX);
        assert!(!notice.is_expired(Utc::now()));
    }
}

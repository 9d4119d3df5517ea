//! Short-lived user-facing status messages.
//!
//! Every state-changing operation queues a notification; entries expire five
//! seconds after creation and are pruned on push and on read. The queue is
//! never persisted or mirrored.

use chrono::{DateTime, Utc};
use std::sync::Mutex;

/// How long a notification stays visible.
pub const NOTIFICATION_TTL_SECS: i64 = 5;

/// Visual weight of a notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    /// Operation completed
    Success,
    /// Operation degraded or failed
    Error,
    /// Neutral status update
    Info,
}

/// One queued status message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    /// Opaque id, used only for explicit dismissal
    pub id: String,
    /// Message shown to the user
    pub message: String,
    /// Visual weight
    pub severity: Severity,
    /// When the message stops being shown
    pub expires_at: DateTime<Utc>,
}

/// The self-expiring notification queue.
#[derive(Debug, Default)]
pub struct NotificationQueue {
    entries: Mutex<Vec<Notification>>,
}

impl NotificationQueue {
    /// An empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a message with the standard TTL.
    pub fn push(&self, message: impl Into<String>, severity: Severity) {
        self.push_at(message, severity, Utc::now());
    }

    fn push_at(&self, message: impl Into<String>, severity: Severity, now: DateTime<Utc>) {
        let mut entries = self.guard();
        entries.retain(|n| n.expires_at > now);
        entries.push(Notification {
            id: uuid::Uuid::new_v4().to_string(),
            message: message.into(),
            severity,
            expires_at: now + chrono::Duration::seconds(NOTIFICATION_TTL_SECS),
        });
    }

    /// Unexpired notifications, oldest first. Expired entries are pruned as a
    /// side effect.
    #[must_use]
    pub fn active(&self) -> Vec<Notification> {
        self.active_at(Utc::now())
    }

    fn active_at(&self, now: DateTime<Utc>) -> Vec<Notification> {
        let mut entries = self.guard();
        entries.retain(|n| n.expires_at > now);
        entries.clone()
    }

    /// Removes one notification before its TTL runs out.
    pub fn dismiss(&self, id: &str) {
        self.guard().retain(|n| n.id != id);
    }

    fn guard(&self) -> std::sync::MutexGuard<'_, Vec<Notification>> {
        // A poisoned lock only means another thread panicked mid-push; the
        // queue contents are still valid.
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_read() {
        let queue = NotificationQueue::new();
        queue.push("Order saved.", Severity::Success);

        let active = queue.active();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].message, "Order saved.");
        assert_eq!(active[0].severity, Severity::Success);
    }

    #[test]
    fn test_entries_expire_after_ttl() {
        let queue = NotificationQueue::new();
        let start = Utc::now();
        queue.push_at("ephemeral", Severity::Info, start);

        let just_before = start + chrono::Duration::seconds(NOTIFICATION_TTL_SECS - 1);
        assert_eq!(queue.active_at(just_before).len(), 1);

        let just_after = start + chrono::Duration::seconds(NOTIFICATION_TTL_SECS + 1);
        assert!(queue.active_at(just_after).is_empty());
    }

    #[test]
    fn test_push_prunes_expired_entries() {
        let queue = NotificationQueue::new();
        let start = Utc::now();
        queue.push_at("old", Severity::Info, start);

        let later = start + chrono::Duration::seconds(NOTIFICATION_TTL_SECS * 2);
        queue.push_at("new", Severity::Info, later);

        let active = queue.active_at(later);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].message, "new");
    }

    #[test]
    fn test_dismiss_removes_one_entry() {
        let queue = NotificationQueue::new();
        queue.push("keep", Severity::Info);
        queue.push("drop", Severity::Error);

        let target = queue
            .active()
            .into_iter()
            .find(|n| n.message == "drop")
            .map(|n| n.id);
        queue.dismiss(target.as_deref().unwrap_or_default());

        let active = queue.active();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].message, "keep");
    }
}

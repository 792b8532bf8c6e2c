//! Ephemeral toast notifications raised by store mutations.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How long a notification stays visible.
pub const NOTIFICATION_TTL_SECS: i64 = 5;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Info,
    Warning,
}

/// A single toast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub kind: NotificationKind,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// When the notification stops being shown.
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.created_at + TimeDelta::seconds(NOTIFICATION_TTL_SECS)
    }

    /// Whether the notification has expired at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at()
    }
}

/// Shared queue of notifications.
///
/// Cloning a `Notifier` yields another handle to the same queue, so every
/// store in a session can report into one place.
#[derive(Debug, Clone, Default)]
pub struct Notifier {
    queue: Arc<Mutex<Vec<Notification>>>,
}

impl Notifier {
    /// Create an empty notifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise a notification stamped with the current time.
    pub fn push(&self, kind: NotificationKind, message: impl Into<String>) -> Uuid {
        self.push_at(kind, message, Utc::now())
    }

    /// Raise a notification with an explicit creation time.
    pub fn push_at(
        &self,
        kind: NotificationKind,
        message: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Uuid {
        let notification = Notification {
            id: Uuid::new_v4(),
            kind,
            message: message.into(),
            created_at,
        };
        tracing::debug!(kind = ?notification.kind, message = %notification.message, "Notification raised");

        let id = notification.id;
        let mut queue = self.queue.lock().unwrap_or_else(PoisonError::into_inner);
        queue.retain(|n| !n.is_expired_at(created_at));
        queue.push(notification);
        id
    }

    pub fn success(&self, message: impl Into<String>) -> Uuid {
        self.push(NotificationKind::Success, message)
    }

    pub fn info(&self, message: impl Into<String>) -> Uuid {
        self.push(NotificationKind::Info, message)
    }

    pub fn warning(&self, message: impl Into<String>) -> Uuid {
        self.push(NotificationKind::Warning, message)
    }

    pub fn error(&self, message: impl Into<String>) -> Uuid {
        self.push(NotificationKind::Error, message)
    }

    /// Notifications still visible now, oldest first.
    #[must_use]
    pub fn active(&self) -> Vec<Notification> {
        self.active_at(Utc::now())
    }

    /// Notifications still visible at `now`, dropping the expired ones.
    #[must_use]
    pub fn active_at(&self, now: DateTime<Utc>) -> Vec<Notification> {
        let mut queue = self.queue.lock().unwrap_or_else(PoisonError::into_inner);
        queue.retain(|n| !n.is_expired_at(now));
        queue.clone()
    }

    /// Dismiss one notification early. Returns whether it was present.
    pub fn dismiss(&self, id: Uuid) -> bool {
        let mut queue = self.queue.lock().unwrap_or_else(PoisonError::into_inner);
        let before = queue.len();
        queue.retain(|n| n.id != id);
        queue.len() < before
    }

    /// Dismiss everything.
    pub fn clear(&self) {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

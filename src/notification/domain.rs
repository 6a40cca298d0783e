//! Notification request values.

use crate::identity::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Category of a notification request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A task was assigned to the recipient.
    TaskAssigned,
}

impl NotificationKind {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TaskAssigned => "task_assigned",
        }
    }
}

/// Request to notify a single user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// User who should receive the notification.
    pub recipient: UserId,
    /// Notification category.
    pub kind: NotificationKind,
    /// Short human-readable summary.
    pub message: String,
    /// Structured context for the delivery channel.
    pub payload: Value,
    /// Time the request was raised.
    pub created_at: DateTime<Utc>,
}

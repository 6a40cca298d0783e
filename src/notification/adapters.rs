//! In-process notification sinks.

use super::{Notification, NotificationError, NotificationSink};
use async_trait::async_trait;
use std::sync::{Arc, RwLock};

/// Sink that records every request in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryNotificationSink {
    sent: Arc<RwLock<Vec<Notification>>>,
}

impl InMemoryNotificationSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all recorded requests in submission order.
    #[must_use]
    pub fn sent(&self) -> Vec<Notification> {
        self.sent
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl NotificationSink for InMemoryNotificationSink {
    async fn notify(&self, notification: Notification) -> Result<(), NotificationError> {
        let mut sent = self.sent.write().map_err(|err| {
            NotificationError::delivery(std::io::Error::other(err.to_string()))
        })?;
        sent.push(notification);
        Ok(())
    }
}

/// Sink that drops every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotificationSink;

#[async_trait]
impl NotificationSink for NoopNotificationSink {
    async fn notify(&self, _notification: Notification) -> Result<(), NotificationError> {
        Ok(())
    }
}

//! Notification delivery port.

use super::Notification;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Errors reported by notification sinks.
#[derive(Debug, Clone, Error)]
pub enum NotificationError {
    /// The sink rejected or could not forward the request.
    #[error("notification delivery failed: {0}")]
    Delivery(Arc<dyn std::error::Error + Send + Sync>),
}

impl NotificationError {
    /// Wraps a delivery error.
    pub fn delivery(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Delivery(Arc::new(err))
    }
}

/// Accepts notification requests for asynchronous delivery.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Submits a notification request.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationError`] when the request could not be handed to
    /// the delivery channel. Callers log and discard this error.
    async fn notify(&self, notification: Notification) -> Result<(), NotificationError>;
}

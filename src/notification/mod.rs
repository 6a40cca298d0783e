//! Notification requests emitted as side effects of task changes.
//!
//! Delivery belongs to the notification collaborator. Trellis only submits
//! requests and never fails the owning operation when submission fails.

mod adapters;
mod domain;
mod sink;

pub use adapters::{InMemoryNotificationSink, NoopNotificationSink};
pub use domain::{Notification, NotificationKind};
pub use sink::{NotificationError, NotificationSink};

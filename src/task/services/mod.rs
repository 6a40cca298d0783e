//! Application services for the task store and status propagation.

mod error;
mod propagator;
mod store;

pub use error::{TaskStoreError, TaskStoreResult};
pub use propagator::{ParentStatusPropagator, PropagationError, PropagationOutcome};
pub use store::{CreateTaskRequest, TaskStoreService, TaskUpdate};

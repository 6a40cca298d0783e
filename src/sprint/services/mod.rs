//! Application services for sprint lifecycle orchestration.

mod error;
mod lifecycle;

pub use error::{SprintLifecycleError, SprintLifecycleResult};
pub use lifecycle::{CreateSprintRequest, EndSprintOutcome, SprintLifecycleService};

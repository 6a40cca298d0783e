//! Domain model for sprints.
//!
//! Covers the sprint aggregate, its two-state lifecycle, and the pure plan
//! describing which tasks change when a sprint closes.

mod closure;
mod error;
mod ids;
mod sprint;

pub use closure::{TaskRelease, plan_release};
pub use error::{ParseSprintStatusError, SprintDomainError};
pub use ids::SprintId;
pub use sprint::{NewSprint, PersistedSprintData, Sprint, SprintName, SprintStatus};

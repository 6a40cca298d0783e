//! Service-level errors for sprint lifecycle operations.

use crate::failure::FailureKind;
use crate::sprint::domain::{SprintDomainError, SprintId};
use crate::sprint::ports::SprintRepositoryError;
use crate::task::domain::{ProjectId, TaskDomainError, TaskId};
use crate::task::ports::TaskRepositoryError;
use std::sync::Arc;
use thiserror::Error;

/// Errors returned by [`super::SprintLifecycleService`].
#[derive(Debug, Error)]
pub enum SprintLifecycleError {
    /// No user is signed in.
    #[error("no authenticated identity")]
    Unauthenticated,

    /// Submitted sprint values failed validation.
    #[error("invalid sprint input: {0}")]
    Validation(#[source] SprintDomainError),

    /// The sprint does not exist.
    #[error("sprint not found: {0}")]
    NotFound(SprintId),

    /// A selected task does not exist.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// A sprint must start with at least one task.
    #[error("a sprint needs at least one task")]
    EmptyTaskSelection,

    /// A selected task cannot enter the sprint.
    #[error("invalid task state: {0}")]
    InvalidTaskState(#[source] TaskDomainError),

    /// The project already has an active sprint.
    #[error("project {0} already has an active sprint")]
    ActiveSprintExists(ProjectId),

    /// The sprint is not active, so it cannot be ended again.
    #[error("sprint {0} has already been completed")]
    AlreadyCompleted(SprintId),

    /// Reconciliation only applies to completed sprints.
    #[error("sprint {0} is still active")]
    SprintStillActive(SprintId),

    /// The backing store failed.
    #[error("sprint store unavailable: {0}")]
    StoreUnavailable(#[source] Arc<dyn std::error::Error + Send + Sync>),
}

/// Result type for sprint lifecycle operations.
pub type SprintLifecycleResult<T> = Result<T, SprintLifecycleError>;

impl SprintLifecycleError {
    /// Returns the failure category.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::Unauthenticated => FailureKind::Unauthenticated,
            Self::Validation(_) => FailureKind::InvalidInput,
            Self::NotFound(_) | Self::TaskNotFound(_) => FailureKind::NotFound,
            Self::EmptyTaskSelection
            | Self::InvalidTaskState(_)
            | Self::ActiveSprintExists(_)
            | Self::AlreadyCompleted(_)
            | Self::SprintStillActive(_) => FailureKind::InvalidState,
            Self::StoreUnavailable(_) => FailureKind::Unavailable,
        }
    }

    /// Returns a message suitable for end users.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "The sprint could not be found.",
            Self::TaskNotFound(_) => "One of the selected tasks could not be found.",
            Self::EmptyTaskSelection => "Select at least one backlog item to start a sprint.",
            Self::InvalidTaskState(_) => {
                "Only unassigned backlog items can be added to a new sprint."
            }
            Self::ActiveSprintExists(_) => {
                "This project already has an active sprint. End it before starting another."
            }
            Self::AlreadyCompleted(_) => "This sprint has already been completed.",
            _ => self.kind().user_message(),
        }
    }
}

impl From<SprintDomainError> for SprintLifecycleError {
    fn from(err: SprintDomainError) -> Self {
        match err {
            SprintDomainError::AlreadyCompleted(id) => Self::AlreadyCompleted(id),
            SprintDomainError::EmptyName => Self::Validation(err),
        }
    }
}

impl From<TaskDomainError> for SprintLifecycleError {
    fn from(err: TaskDomainError) -> Self {
        Self::InvalidTaskState(err)
    }
}

impl From<SprintRepositoryError> for SprintLifecycleError {
    fn from(err: SprintRepositoryError) -> Self {
        match err {
            SprintRepositoryError::NotFound(id) => Self::NotFound(id),
            SprintRepositoryError::ActiveSprintExists(project_id) => {
                Self::ActiveSprintExists(project_id)
            }
            other => Self::StoreUnavailable(Arc::new(other)),
        }
    }
}

impl From<TaskRepositoryError> for SprintLifecycleError {
    fn from(err: TaskRepositoryError) -> Self {
        match err {
            TaskRepositoryError::NotFound(id) => Self::TaskNotFound(id),
            other => Self::StoreUnavailable(Arc::new(other)),
        }
    }
}

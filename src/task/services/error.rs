//! Service-level errors for task store operations.

use crate::failure::FailureKind;
use crate::sprint::domain::SprintId;
use crate::sprint::ports::SprintRepositoryError;
use crate::task::domain::{TaskDomainError, TaskId};
use crate::task::ports::TaskRepositoryError;
use std::sync::Arc;
use thiserror::Error;

/// Errors returned by [`super::TaskStoreService`].
#[derive(Debug, Error)]
pub enum TaskStoreError {
    /// No user is signed in.
    #[error("no authenticated identity")]
    Unauthenticated,

    /// Submitted values failed validation.
    #[error("invalid task input: {0}")]
    Validation(#[source] TaskDomainError),

    /// The operation's precondition on task state is violated.
    #[error("invalid task state: {0}")]
    InvalidTaskState(#[source] TaskDomainError),

    /// The referenced task does not exist.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The referenced sprint does not exist.
    #[error("sprint not found: {0}")]
    SprintNotFound(SprintId),

    /// The backing store failed.
    #[error("task store unavailable: {0}")]
    StoreUnavailable(#[source] Arc<dyn std::error::Error + Send + Sync>),
}

/// Result type for task store operations.
pub type TaskStoreResult<T> = Result<T, TaskStoreError>;

impl TaskStoreError {
    /// Returns the failure category.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::Unauthenticated => FailureKind::Unauthenticated,
            Self::Validation(_) => FailureKind::InvalidInput,
            Self::InvalidTaskState(_) => FailureKind::InvalidState,
            Self::NotFound(_) | Self::SprintNotFound(_) => FailureKind::NotFound,
            Self::StoreUnavailable(_) => FailureKind::Unavailable,
        }
    }

    /// Returns a message suitable for end users.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "The task could not be found. It may have been removed.",
            Self::SprintNotFound(_) => "The sprint could not be found.",
            Self::InvalidTaskState(TaskDomainError::TaskDeleted(_)) => {
                "This task has been deleted and can no longer be changed."
            }
            Self::InvalidTaskState(TaskDomainError::ParentCycle { .. }) => {
                "A task cannot be placed under one of its own sub-tasks."
            }
            _ => self.kind().user_message(),
        }
    }
}

impl From<TaskDomainError> for TaskStoreError {
    fn from(err: TaskDomainError) -> Self {
        if err.is_input_error() {
            Self::Validation(err)
        } else {
            Self::InvalidTaskState(err)
        }
    }
}

impl From<TaskRepositoryError> for TaskStoreError {
    fn from(err: TaskRepositoryError) -> Self {
        match err {
            TaskRepositoryError::NotFound(id) => Self::NotFound(id),
            other => Self::StoreUnavailable(Arc::new(other)),
        }
    }
}

impl From<SprintRepositoryError> for TaskStoreError {
    fn from(err: SprintRepositoryError) -> Self {
        match err {
            SprintRepositoryError::NotFound(id) => Self::SprintNotFound(id),
            other => Self::StoreUnavailable(Arc::new(other)),
        }
    }
}

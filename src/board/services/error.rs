//! Service-level errors for board queries.

use crate::board::domain::BoardDomainError;
use crate::failure::FailureKind;
use crate::sprint::domain::SprintId;
use crate::sprint::ports::SprintRepositoryError;
use crate::task::ports::TaskRepositoryError;
use std::sync::Arc;
use thiserror::Error;

/// Errors returned by [`super::BoardService`].
#[derive(Debug, Error)]
pub enum BoardError {
    /// The sprint does not exist.
    #[error("sprint not found: {0}")]
    SprintNotFound(SprintId),

    /// Only active sprints have a board.
    #[error("sprint {0} is not active")]
    SprintNotActive(SprintId),

    /// The backing store failed.
    #[error("board store unavailable: {0}")]
    StoreUnavailable(#[source] Arc<dyn std::error::Error + Send + Sync>),
}

/// Result type for board queries.
pub type BoardResult<T> = Result<T, BoardError>;

impl BoardError {
    /// Returns the failure category.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::SprintNotFound(_) => FailureKind::NotFound,
            Self::SprintNotActive(_) => FailureKind::InvalidState,
            Self::StoreUnavailable(_) => FailureKind::Unavailable,
        }
    }

    /// Returns a message suitable for end users.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::SprintNotFound(_) => "The sprint could not be found.",
            Self::SprintNotActive(_) => "This sprint has ended and no longer has a board.",
            Self::StoreUnavailable(_) => self.kind().user_message(),
        }
    }
}

impl From<BoardDomainError> for BoardError {
    fn from(err: BoardDomainError) -> Self {
        match err {
            BoardDomainError::UnknownSprint(id) => Self::SprintNotFound(id),
            BoardDomainError::SprintNotActive(id) => Self::SprintNotActive(id),
        }
    }
}

impl From<TaskRepositoryError> for BoardError {
    fn from(err: TaskRepositoryError) -> Self {
        Self::StoreUnavailable(Arc::new(err))
    }
}

impl From<SprintRepositoryError> for BoardError {
    fn from(err: SprintRepositoryError) -> Self {
        match err {
            SprintRepositoryError::NotFound(id) => Self::SprintNotFound(id),
            other => Self::StoreUnavailable(Arc::new(other)),
        }
    }
}

//! Error types for board views.

use crate::sprint::domain::SprintId;
use thiserror::Error;

/// Errors returned when a view cannot be built from a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BoardDomainError {
    /// The sprint is not part of the snapshot.
    #[error("sprint {0} is not part of the project snapshot")]
    UnknownSprint(SprintId),

    /// Only active sprints have a board.
    #[error("sprint {0} is not active")]
    SprintNotActive(SprintId),
}

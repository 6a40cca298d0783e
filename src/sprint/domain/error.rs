//! Error types for sprint domain validation and parsing.

use super::SprintId;
use thiserror::Error;

/// Errors returned while constructing or transitioning sprints.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SprintDomainError {
    /// The sprint name is empty after trimming.
    #[error("sprint name must not be empty")]
    EmptyName,

    /// The sprint has already been completed.
    #[error("sprint {0} has already been completed")]
    AlreadyCompleted(SprintId),
}

/// Error returned while parsing sprint status from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown sprint status: {0}")]
pub struct ParseSprintStatusError(pub String);

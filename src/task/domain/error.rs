//! Error types for task domain validation and parsing.

use super::{ProjectId, TaskId, TaskStatus};
use crate::sprint::domain::SprintId;
use thiserror::Error;

/// Errors returned while constructing or mutating domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// A persisted story point value is negative or out of range.
    #[error("invalid story points {0}, expected a non-negative integer")]
    InvalidStoryPoints(i64),

    /// The task has been soft-deleted and can no longer change.
    #[error("task {0} has been deleted")]
    TaskDeleted(TaskId),

    /// The deleted status can only be reached through deletion.
    #[error("task {0} cannot be given the deleted status directly; delete it instead")]
    DeletedStatusNotAssignable(TaskId),

    /// The task would become its own ancestor.
    #[error("task {task_id} cannot be placed under {parent_id}: it would create a cycle")]
    ParentCycle {
        /// Task being re-parented.
        task_id: TaskId,
        /// Requested parent.
        parent_id: TaskId,
    },

    /// A referenced task belongs to a different project.
    #[error("task {task_id} belongs to project {found}, expected {expected}")]
    ProjectMismatch {
        /// Offending task.
        task_id: TaskId,
        /// Project the operation is scoped to.
        expected: ProjectId,
        /// Project the task actually belongs to.
        found: ProjectId,
    },

    /// The task is already assigned to a sprint.
    #[error("task {task_id} is already assigned to sprint {sprint_id}")]
    AlreadyInSprint {
        /// Offending task.
        task_id: TaskId,
        /// Sprint the task is assigned to.
        sprint_id: SprintId,
    },

    /// The task is not in the backlog status required by the operation.
    #[error("task {task_id} has status {status}, expected backlog")]
    NotInBacklog {
        /// Offending task.
        task_id: TaskId,
        /// Current task status.
        status: TaskStatus,
    },

    /// The referenced sprint is not active.
    #[error("sprint {0} is not active")]
    SprintNotActive(SprintId),

    /// The referenced sprint belongs to another project.
    #[error("sprint {sprint_id} does not belong to the project of task {task_id}")]
    ForeignSprint {
        /// Task being scheduled.
        task_id: TaskId,
        /// Requested sprint.
        sprint_id: SprintId,
    },
}

impl TaskDomainError {
    /// Returns whether the error describes malformed input rather than a
    /// state precondition.
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        matches!(self, Self::EmptyTitle | Self::InvalidStoryPoints(_))
    }
}

/// Error returned while parsing task enumerations from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task {field}: {value}")]
pub struct ParseTaskFieldError {
    /// Name of the field being parsed.
    pub field: &'static str,
    /// Rejected input.
    pub value: String,
}

impl ParseTaskFieldError {
    pub(crate) fn new(field: &'static str, value: &str) -> Self {
        Self {
            field,
            value: value.to_owned(),
        }
    }
}

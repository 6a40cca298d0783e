//! Change notifications from the realtime feed.

use crate::sprint::domain::SprintId;
use crate::task::domain::{ProjectId, TaskId};

/// Kind of write reported by the change feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeOperation {
    /// A record was created.
    Insert,
    /// A record was modified.
    Update,
    /// A record was removed.
    Delete,
}

/// Record touched by a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// A task record.
    Task(TaskId),
    /// A sprint record.
    Sprint(SprintId),
}

/// A single change delivered by the realtime collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordChange {
    /// Project owning the record.
    pub project_id: ProjectId,
    /// The changed record.
    pub record: RecordKind,
    /// The kind of write.
    pub operation: ChangeOperation,
}

impl RecordChange {
    /// Creates a change for a task record.
    #[must_use]
    pub const fn task(project_id: ProjectId, task_id: TaskId, operation: ChangeOperation) -> Self {
        Self {
            project_id,
            record: RecordKind::Task(task_id),
            operation,
        }
    }

    /// Creates a change for a sprint record.
    #[must_use]
    pub const fn sprint(
        project_id: ProjectId,
        sprint_id: SprintId,
        operation: ChangeOperation,
    ) -> Self {
        Self {
            project_id,
            record: RecordKind::Sprint(sprint_id),
            operation,
        }
    }
}

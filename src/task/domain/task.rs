//! Task aggregate root.

use super::{
    ProjectId, StoryPoints, TaskDomainError, TaskId, TaskKind, TaskPriority, TaskRole,
    TaskStatus, TaskTitle,
};
use crate::identity::UserId;
use crate::sprint::domain::SprintId;
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    project_id: ProjectId,
    title: TaskTitle,
    description: Option<String>,
    status: TaskStatus,
    priority: TaskPriority,
    kind: TaskKind,
    story_points: Option<StoryPoints>,
    deadline: Option<NaiveDate>,
    parent_task_id: Option<TaskId>,
    sprint_id: Option<SprintId>,
    assignee: Option<UserId>,
    created_by: UserId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

/// Parameter object for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    /// Owning project.
    pub project_id: ProjectId,
    /// Task title.
    pub title: TaskTitle,
    /// Kind of work item.
    pub kind: TaskKind,
    /// Initial status.
    pub status: TaskStatus,
    /// Initial priority.
    pub priority: TaskPriority,
    /// Optional long-form description.
    pub description: Option<String>,
    /// Optional size estimate.
    pub story_points: Option<StoryPoints>,
    /// Optional due date.
    pub deadline: Option<NaiveDate>,
    /// Optional parent task.
    pub parent_task_id: Option<TaskId>,
    /// Optional sprint membership.
    pub sprint_id: Option<SprintId>,
    /// Optional assignee.
    pub assignee: Option<UserId>,
    /// User creating the task.
    pub created_by: UserId,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted owning project.
    pub project_id: ProjectId,
    /// Persisted title.
    pub title: TaskTitle,
    /// Persisted description.
    pub description: Option<String>,
    /// Persisted status.
    pub status: TaskStatus,
    /// Persisted priority.
    pub priority: TaskPriority,
    /// Persisted kind.
    pub kind: TaskKind,
    /// Persisted story points.
    pub story_points: Option<StoryPoints>,
    /// Persisted deadline.
    pub deadline: Option<NaiveDate>,
    /// Persisted parent reference.
    pub parent_task_id: Option<TaskId>,
    /// Persisted sprint reference.
    pub sprint_id: Option<SprintId>,
    /// Persisted assignee.
    pub assignee: Option<UserId>,
    /// Persisted creator.
    pub created_by: UserId,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest modification timestamp.
    pub updated_at: DateTime<Utc>,
    /// Persisted soft-deletion timestamp.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Creates a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::DeletedStatusNotAssignable`] when the
    /// initial status is [`TaskStatus::Deleted`].
    pub fn new(data: NewTask, clock: &impl Clock) -> Result<Self, TaskDomainError> {
        let id = TaskId::new();
        if data.status == TaskStatus::Deleted {
            return Err(TaskDomainError::DeletedStatusNotAssignable(id));
        }
        let timestamp = clock.utc();
        Ok(Self {
            id,
            project_id: data.project_id,
            title: data.title,
            description: data.description,
            status: data.status,
            priority: data.priority,
            kind: data.kind,
            story_points: data.story_points,
            deadline: data.deadline,
            parent_task_id: data.parent_task_id,
            sprint_id: data.sprint_id,
            assignee: data.assignee,
            created_by: data.created_by,
            created_at: timestamp,
            updated_at: timestamp,
            deleted_at: None,
        })
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            project_id: data.project_id,
            title: data.title,
            description: data.description,
            status: data.status,
            priority: data.priority,
            kind: data.kind,
            story_points: data.story_points,
            deadline: data.deadline,
            parent_task_id: data.parent_task_id,
            sprint_id: data.sprint_id,
            assignee: data.assignee,
            created_by: data.created_by,
            created_at: data.created_at,
            updated_at: data.updated_at,
            deleted_at: data.deleted_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the workflow status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> TaskPriority {
        self.priority
    }

    /// Returns the kind of work item.
    #[must_use]
    pub const fn kind(&self) -> TaskKind {
        self.kind
    }

    /// Returns the size estimate, if any.
    #[must_use]
    pub const fn story_points(&self) -> Option<StoryPoints> {
        self.story_points
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<NaiveDate> {
        self.deadline
    }

    /// Returns the parent task, if any.
    #[must_use]
    pub const fn parent_task_id(&self) -> Option<TaskId> {
        self.parent_task_id
    }

    /// Returns the sprint the task is assigned to, if any.
    #[must_use]
    pub const fn sprint_id(&self) -> Option<SprintId> {
        self.sprint_id
    }

    /// Returns the assignee, if any.
    #[must_use]
    pub const fn assignee(&self) -> Option<UserId> {
        self.assignee
    }

    /// Returns the creating user.
    #[must_use]
    pub const fn created_by(&self) -> UserId {
        self.created_by
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the soft-deletion timestamp, if the task was deleted.
    #[must_use]
    pub const fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    /// Returns whether the task has been soft-deleted.
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.deleted_at.is_some() || matches!(self.status, TaskStatus::Deleted)
    }

    /// Returns whether the task is finished.
    #[must_use]
    pub const fn is_done(&self) -> bool {
        matches!(self.status, TaskStatus::Done)
    }

    /// Returns the task's position in the story hierarchy.
    ///
    /// The role is derived from the task alone. Views that need to treat
    /// orphaned sub-tasks differently resolve the parent themselves.
    #[must_use]
    pub const fn role(&self) -> TaskRole {
        if self.parent_task_id.is_some() {
            TaskRole::SubTask
        } else if matches!(self.kind, TaskKind::UserStory) {
            TaskRole::Story
        } else {
            TaskRole::Standalone
        }
    }

    /// Replaces the title.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::TaskDeleted`] for deleted tasks.
    pub fn rename(&mut self, title: TaskTitle, clock: &impl Clock) -> Result<(), TaskDomainError> {
        self.mutate(clock, |task| task.title = title)
    }

    /// Replaces the description.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::TaskDeleted`] for deleted tasks.
    pub fn set_description(
        &mut self,
        description: Option<String>,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.mutate(clock, |task| task.description = description)
    }

    /// Replaces the priority.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::TaskDeleted`] for deleted tasks.
    pub fn set_priority(
        &mut self,
        priority: TaskPriority,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.mutate(clock, |task| task.priority = priority)
    }

    /// Replaces the kind.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::TaskDeleted`] for deleted tasks.
    pub fn set_kind(&mut self, kind: TaskKind, clock: &impl Clock) -> Result<(), TaskDomainError> {
        self.mutate(clock, |task| task.kind = kind)
    }

    /// Replaces the size estimate.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::TaskDeleted`] for deleted tasks.
    pub fn set_story_points(
        &mut self,
        story_points: Option<StoryPoints>,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.mutate(clock, |task| task.story_points = story_points)
    }

    /// Replaces the due date.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::TaskDeleted`] for deleted tasks.
    pub fn set_deadline(
        &mut self,
        deadline: Option<NaiveDate>,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.mutate(clock, |task| task.deadline = deadline)
    }

    /// Replaces the assignee.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::TaskDeleted`] for deleted tasks.
    pub fn assign(
        &mut self,
        assignee: Option<UserId>,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.mutate(clock, |task| task.assignee = assignee)
    }

    /// Changes the workflow status.
    ///
    /// Returns `true` when the status actually changed.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::TaskDeleted`] for deleted tasks and
    /// [`TaskDomainError::DeletedStatusNotAssignable`] when `status` is
    /// [`TaskStatus::Deleted`].
    pub fn set_status(
        &mut self,
        status: TaskStatus,
        clock: &impl Clock,
    ) -> Result<bool, TaskDomainError> {
        self.ensure_live()?;
        if status == TaskStatus::Deleted {
            return Err(TaskDomainError::DeletedStatusNotAssignable(self.id));
        }
        if self.status == status {
            return Ok(false);
        }
        self.status = status;
        self.touch(clock);
        Ok(true)
    }

    /// Moves the task under another parent, or detaches it.
    ///
    /// Cycle detection beyond direct self-reference needs the ancestor chain
    /// and is performed by the task store.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::TaskDeleted`] for deleted tasks and
    /// [`TaskDomainError::ParentCycle`] when the task would parent itself.
    pub fn set_parent(
        &mut self,
        parent_task_id: Option<TaskId>,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        if parent_task_id == Some(self.id) {
            return Err(TaskDomainError::ParentCycle {
                task_id: self.id,
                parent_id: self.id,
            });
        }
        self.mutate(clock, |task| task.parent_task_id = parent_task_id)
    }

    /// Replaces the sprint reference without any other effect.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::TaskDeleted`] for deleted tasks.
    pub fn set_sprint(
        &mut self,
        sprint_id: Option<SprintId>,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.mutate(clock, |task| task.sprint_id = sprint_id)
    }

    /// Checks that the task can be pulled into a new sprint.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::TaskDeleted`],
    /// [`TaskDomainError::AlreadyInSprint`], or
    /// [`TaskDomainError::NotInBacklog`] when the task is not an unassigned
    /// backlog item.
    pub fn ensure_schedulable(&self) -> Result<(), TaskDomainError> {
        self.ensure_live()?;
        if let Some(sprint_id) = self.sprint_id {
            return Err(TaskDomainError::AlreadyInSprint {
                task_id: self.id,
                sprint_id,
            });
        }
        if self.status != TaskStatus::Backlog {
            return Err(TaskDomainError::NotInBacklog {
                task_id: self.id,
                status: self.status,
            });
        }
        Ok(())
    }

    /// Pulls a backlog task into a sprint, resetting its status to todo.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Task::ensure_schedulable`].
    pub fn enter_sprint(
        &mut self,
        sprint_id: SprintId,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.ensure_schedulable()?;
        self.sprint_id = Some(sprint_id);
        self.status = TaskStatus::Todo;
        self.touch(clock);
        Ok(())
    }

    /// Detaches the task from its sprint at sprint closure.
    ///
    /// Unfinished tasks return to the backlog; finished tasks keep their
    /// status. Returns `true` when anything changed.
    pub fn release_from_sprint(&mut self, clock: &impl Clock) -> bool {
        if self.is_deleted() || self.sprint_id.is_none() {
            return false;
        }
        self.sprint_id = None;
        if !self.is_done() {
            self.status = TaskStatus::Backlog;
        }
        self.touch(clock);
        true
    }

    /// Puts an unfinished task back to todo.
    ///
    /// Returns `true` when the status changed.
    pub fn reset_to_todo(&mut self, clock: &impl Clock) -> bool {
        if self.is_deleted() || self.is_done() || self.status == TaskStatus::Todo {
            return false;
        }
        self.status = TaskStatus::Todo;
        self.touch(clock);
        true
    }

    /// Soft-deletes the task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::TaskDeleted`] when the task is already
    /// deleted.
    pub fn soft_delete(&mut self, clock: &impl Clock) -> Result<(), TaskDomainError> {
        self.ensure_live()?;
        let timestamp = clock.utc();
        self.status = TaskStatus::Deleted;
        self.deleted_at = Some(timestamp);
        self.updated_at = timestamp;
        Ok(())
    }

    const fn ensure_live(&self) -> Result<(), TaskDomainError> {
        if self.is_deleted() {
            return Err(TaskDomainError::TaskDeleted(self.id));
        }
        Ok(())
    }

    fn mutate(
        &mut self,
        clock: &impl Clock,
        change: impl FnOnce(&mut Self),
    ) -> Result<(), TaskDomainError> {
        self.ensure_live()?;
        change(self);
        self.touch(clock);
        Ok(())
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

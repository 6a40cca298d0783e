//! Task store service: authoritative task CRUD scoped to a project.

use super::{ParentStatusPropagator, TaskStoreError, TaskStoreResult};
use crate::config::EngineConfig;
use crate::identity::{Identity, SessionProvider, UserId};
use crate::notification::{Notification, NotificationKind, NotificationSink};
use crate::sprint::domain::SprintId;
use crate::sprint::ports::SprintRepository;
use crate::task::{
    domain::{
        NewTask, ProjectId, StoryPoints, Task, TaskDomainError, TaskId, TaskKind, TaskPriority,
        TaskStatus, TaskTitle,
    },
    ports::TaskRepository,
};
use chrono::NaiveDate;
use mockable::Clock;
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    project_id: ProjectId,
    title: String,
    kind: TaskKind,
    status: TaskStatus,
    priority: TaskPriority,
    description: Option<String>,
    story_points: Option<u32>,
    deadline: Option<NaiveDate>,
    parent_task_id: Option<TaskId>,
    sprint_id: Option<SprintId>,
    assignee: Option<UserId>,
}

impl CreateTaskRequest {
    /// Creates a request with the required task fields.
    #[must_use]
    pub fn new(
        project_id: ProjectId,
        title: impl Into<String>,
        kind: TaskKind,
        status: TaskStatus,
        priority: TaskPriority,
    ) -> Self {
        Self {
            project_id,
            title: title.into(),
            kind,
            status,
            priority,
            description: None,
            story_points: None,
            deadline: None,
            parent_task_id: None,
            sprint_id: None,
            assignee: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the story point estimate.
    #[must_use]
    pub const fn with_story_points(mut self, points: u32) -> Self {
        self.story_points = Some(points);
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: NaiveDate) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Places the task under a parent, making it a sub-task.
    #[must_use]
    pub const fn with_parent(mut self, parent_task_id: TaskId) -> Self {
        self.parent_task_id = Some(parent_task_id);
        self
    }

    /// Creates the task directly inside an active sprint.
    #[must_use]
    pub const fn with_sprint(mut self, sprint_id: SprintId) -> Self {
        self.sprint_id = Some(sprint_id);
        self
    }

    /// Assigns the task on creation.
    #[must_use]
    pub const fn with_assignee(mut self, assignee: UserId) -> Self {
        self.assignee = Some(assignee);
        self
    }
}

/// Field-level partial update of a task.
///
/// Unset fields are left untouched. Nullable fields use a nested `Option`
/// where `Some(None)` clears the value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskUpdate {
    title: Option<String>,
    description: Option<Option<String>>,
    status: Option<TaskStatus>,
    priority: Option<TaskPriority>,
    kind: Option<TaskKind>,
    story_points: Option<Option<u32>>,
    deadline: Option<Option<NaiveDate>>,
    assignee: Option<Option<UserId>>,
    parent_task_id: Option<Option<TaskId>>,
    sprint_id: Option<Option<SprintId>>,
}

impl TaskUpdate {
    /// Creates an empty update.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Replaces or clears the description.
    #[must_use]
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = Some(description);
        self
    }

    /// Changes the status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Changes the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Changes the kind.
    #[must_use]
    pub const fn with_kind(mut self, kind: TaskKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Replaces or clears the story point estimate.
    #[must_use]
    pub const fn with_story_points(mut self, points: Option<u32>) -> Self {
        self.story_points = Some(points);
        self
    }

    /// Replaces or clears the due date.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: Option<NaiveDate>) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Replaces or clears the assignee.
    #[must_use]
    pub const fn with_assignee(mut self, assignee: Option<UserId>) -> Self {
        self.assignee = Some(assignee);
        self
    }

    /// Moves the task under another parent, or detaches it.
    #[must_use]
    pub const fn with_parent(mut self, parent_task_id: Option<TaskId>) -> Self {
        self.parent_task_id = Some(parent_task_id);
        self
    }

    /// Replaces or clears the sprint reference.
    #[must_use]
    pub const fn with_sprint(mut self, sprint_id: Option<SprintId>) -> Self {
        self.sprint_id = Some(sprint_id);
        self
    }

    /// Returns whether the update changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Task store orchestration service.
pub struct TaskStoreService<T, S, N, A, C>
where
    T: TaskRepository,
    S: SprintRepository,
    N: NotificationSink,
    A: SessionProvider,
    C: Clock + Send + Sync,
{
    tasks: Arc<T>,
    sprints: Arc<S>,
    notifier: Arc<N>,
    session: Arc<A>,
    clock: Arc<C>,
    propagator: ParentStatusPropagator<T, C>,
    config: EngineConfig,
}

impl<T, S, N, A, C> Clone for TaskStoreService<T, S, N, A, C>
where
    T: TaskRepository,
    S: SprintRepository,
    N: NotificationSink,
    A: SessionProvider,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            tasks: Arc::clone(&self.tasks),
            sprints: Arc::clone(&self.sprints),
            notifier: Arc::clone(&self.notifier),
            session: Arc::clone(&self.session),
            clock: Arc::clone(&self.clock),
            propagator: self.propagator.clone(),
            config: self.config.clone(),
        }
    }
}

impl<T, S, N, A, C> TaskStoreService<T, S, N, A, C>
where
    T: TaskRepository,
    S: SprintRepository,
    N: NotificationSink,
    A: SessionProvider,
    C: Clock + Send + Sync,
{
    /// Creates a new task store service with the default configuration.
    #[must_use]
    pub fn new(
        tasks: Arc<T>,
        sprints: Arc<S>,
        notifier: Arc<N>,
        session: Arc<A>,
        clock: Arc<C>,
    ) -> Self {
        let propagator = ParentStatusPropagator::new(Arc::clone(&tasks), Arc::clone(&clock));
        Self {
            tasks,
            sprints,
            notifier,
            session,
            clock,
            propagator,
            config: EngineConfig::default(),
        }
    }

    /// Replaces the engine configuration.
    #[must_use]
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Creates a task.
    ///
    /// When the task has a parent, the parent's status is re-derived
    /// afterwards. A propagation failure is logged and does not fail the
    /// creation.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Unauthenticated`] without a session,
    /// [`TaskStoreError::Validation`] for malformed input,
    /// [`TaskStoreError::NotFound`] or [`TaskStoreError::SprintNotFound`] for
    /// unknown references, [`TaskStoreError::InvalidTaskState`] when the
    /// parent or sprint cannot accept the task, and
    /// [`TaskStoreError::StoreUnavailable`] when persistence fails.
    pub async fn create_task(&self, request: CreateTaskRequest) -> TaskStoreResult<Task> {
        let identity = self.require_identity()?;
        let title = TaskTitle::new(request.title)?;
        let task = Task::new(
            NewTask {
                project_id: request.project_id,
                title,
                kind: request.kind,
                status: request.status,
                priority: request.priority,
                description: request.description,
                story_points: request.story_points.map(StoryPoints::new),
                deadline: request.deadline,
                parent_task_id: request.parent_task_id,
                sprint_id: request.sprint_id,
                assignee: request.assignee,
                created_by: identity.user_id(),
            },
            &*self.clock,
        )?;

        if let Some(parent_id) = task.parent_task_id() {
            self.validate_parent(task.id(), task.project_id(), parent_id)
                .await?;
        }
        if let Some(sprint_id) = task.sprint_id() {
            self.validate_sprint(task.id(), task.project_id(), sprint_id)
                .await?;
        }
        self.tasks.store(&task).await?;
        tracing::debug!(task_id = %task.id(), project_id = %task.project_id(), "task created");

        if let Some(parent_id) = task.parent_task_id() {
            self.propagate_quietly(parent_id).await;
        }
        if let Some(assignee) = task.assignee() {
            self.notify_assignment(&task, assignee, &identity).await;
        }
        Ok(task)
    }

    /// Applies a partial update to a task.
    ///
    /// Status changes on a sub-task re-derive its parent; re-parenting
    /// re-derives both the old and the new parent. Changing the sprint
    /// reference has no further effect on other tasks.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] when the task does not exist,
    /// [`TaskStoreError::InvalidTaskState`] when the task is deleted, the
    /// status is `deleted`, the new parent would create a cycle, or the new
    /// sprint is not active, plus the errors of [`Self::create_task`].
    pub async fn update_task(&self, id: TaskId, update: TaskUpdate) -> TaskStoreResult<Task> {
        let identity = self.require_identity()?;
        let original = self.find_or_not_found(id).await?;
        if original.is_deleted() {
            return Err(TaskDomainError::TaskDeleted(id).into());
        }
        let mut task = original.clone();
        let clock = &*self.clock;

        if let Some(title) = update.title {
            task.rename(TaskTitle::new(title)?, clock)?;
        }
        if let Some(description) = update.description {
            task.set_description(description, clock)?;
        }
        if let Some(priority) = update.priority {
            task.set_priority(priority, clock)?;
        }
        if let Some(kind) = update.kind {
            task.set_kind(kind, clock)?;
        }
        if let Some(points) = update.story_points {
            task.set_story_points(points.map(StoryPoints::new), clock)?;
        }
        if let Some(deadline) = update.deadline {
            task.set_deadline(deadline, clock)?;
        }
        if let Some(parent) = update.parent_task_id
            && parent != original.parent_task_id()
        {
            if let Some(parent_id) = parent {
                self.validate_parent(id, task.project_id(), parent_id).await?;
            }
            task.set_parent(parent, clock)?;
        }
        if let Some(sprint) = update.sprint_id {
            if let Some(sprint_id) = sprint {
                self.validate_sprint(id, task.project_id(), sprint_id).await?;
            }
            task.set_sprint(sprint, clock)?;
        }
        let status_changed = match update.status {
            Some(status) => task.set_status(status, clock)?,
            None => false,
        };
        if let Some(assignee) = update.assignee {
            task.assign(assignee, clock)?;
        }

        self.tasks.update(&task).await?;
        tracing::debug!(task_id = %id, status_changed, "task updated");

        for parent_id in parents_to_refresh(&original, &task, status_changed) {
            self.propagate_quietly(parent_id).await;
        }
        if let Some(assignee) = task.assignee()
            && original.assignee() != Some(assignee)
        {
            self.notify_assignment(&task, assignee, &identity).await;
        }
        Ok(task)
    }

    /// Soft-deletes a task.
    ///
    /// Children are left in place; the parent, if any, is re-derived.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] when the task does not exist,
    /// [`TaskStoreError::InvalidTaskState`] when it is already deleted, and
    /// [`TaskStoreError::StoreUnavailable`] when persistence fails.
    pub async fn delete_task(&self, id: TaskId) -> TaskStoreResult<Task> {
        self.require_identity()?;
        let mut task = self.find_or_not_found(id).await?;
        task.soft_delete(&*self.clock)?;
        self.tasks.update(&task).await?;
        tracing::debug!(task_id = %id, "task soft-deleted");

        if let Some(parent_id) = task.parent_task_id() {
            self.propagate_quietly(parent_id).await;
        }
        Ok(task)
    }

    /// Fetches a task, including soft-deleted ones.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] when the task does not exist and
    /// [`TaskStoreError::StoreUnavailable`] when persistence fails.
    pub async fn get_task(&self, id: TaskId) -> TaskStoreResult<Task> {
        self.find_or_not_found(id).await
    }

    /// Lists the live tasks of a project in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::StoreUnavailable`] when persistence fails.
    pub async fn list_project_tasks(&self, project_id: ProjectId) -> TaskStoreResult<Vec<Task>> {
        let tasks = self.tasks.find_by_project(project_id).await?;
        Ok(tasks.into_iter().filter(|task| !task.is_deleted()).collect())
    }

    /// Lists the live children of a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::StoreUnavailable`] when persistence fails.
    pub async fn list_children(&self, parent_id: TaskId) -> TaskStoreResult<Vec<Task>> {
        let children = self.tasks.find_children(parent_id).await?;
        Ok(children
            .into_iter()
            .filter(|task| !task.is_deleted())
            .collect())
    }

    fn require_identity(&self) -> TaskStoreResult<Identity> {
        self.session
            .current_identity()
            .ok_or(TaskStoreError::Unauthenticated)
    }

    async fn find_or_not_found(&self, id: TaskId) -> TaskStoreResult<Task> {
        self.tasks
            .find_by_id(id)
            .await?
            .ok_or(TaskStoreError::NotFound(id))
    }

    /// Checks that `parent_id` can adopt `task_id` within `project_id`.
    async fn validate_parent(
        &self,
        task_id: TaskId,
        project_id: ProjectId,
        parent_id: TaskId,
    ) -> TaskStoreResult<()> {
        let parent = self.find_or_not_found(parent_id).await?;
        if parent.is_deleted() {
            return Err(TaskDomainError::TaskDeleted(parent_id).into());
        }
        if parent.project_id() != project_id {
            return Err(TaskDomainError::ProjectMismatch {
                task_id: parent_id,
                expected: project_id,
                found: parent.project_id(),
            }
            .into());
        }

        // Walk up from the new parent; meeting the task itself means a cycle.
        let mut visited = HashSet::new();
        let mut cursor = Some(parent);
        while let Some(ancestor) = cursor {
            if ancestor.id() == task_id {
                return Err(TaskDomainError::ParentCycle { task_id, parent_id }.into());
            }
            if !visited.insert(ancestor.id()) {
                break;
            }
            cursor = match ancestor.parent_task_id() {
                Some(next) => self.tasks.find_by_id(next).await?,
                None => None,
            };
        }
        Ok(())
    }

    async fn validate_sprint(
        &self,
        task_id: TaskId,
        project_id: ProjectId,
        sprint_id: SprintId,
    ) -> TaskStoreResult<()> {
        let sprint = self
            .sprints
            .find_by_id(sprint_id)
            .await?
            .ok_or(TaskStoreError::SprintNotFound(sprint_id))?;
        if sprint.project_id() != project_id {
            return Err(TaskDomainError::ForeignSprint { task_id, sprint_id }.into());
        }
        if !sprint.is_active() {
            return Err(TaskDomainError::SprintNotActive(sprint_id).into());
        }
        Ok(())
    }

    async fn propagate_quietly(&self, parent_id: TaskId) {
        match self.propagator.propagate(parent_id).await {
            Ok(outcome) => {
                tracing::debug!(parent_id = %parent_id, ?outcome, "parent status propagated");
            }
            Err(err) => {
                tracing::warn!(
                    parent_id = %parent_id,
                    error = %err,
                    "parent status propagation failed; status is corrected on the next re-fetch"
                );
            }
        }
    }

    async fn notify_assignment(&self, task: &Task, assignee: UserId, actor: &Identity) {
        if assignee == actor.user_id() && !self.config.notify_self_assignment {
            return;
        }
        let notification = Notification {
            recipient: assignee,
            kind: NotificationKind::TaskAssigned,
            message: format!("You have been assigned to \"{}\"", task.title()),
            payload: json!({
                "task_id": task.id(),
                "project_id": task.project_id(),
                "assigned_by": actor.user_id(),
            }),
            created_at: self.clock.utc(),
        };
        if let Err(err) = self.notifier.notify(notification).await {
            tracing::warn!(task_id = %task.id(), error = %err, "assignment notification dropped");
        }
    }
}

/// Parents whose status must be re-derived after an update.
fn parents_to_refresh(original: &Task, updated: &Task, status_changed: bool) -> Vec<TaskId> {
    let mut parents = Vec::new();
    let reparented = original.parent_task_id() != updated.parent_task_id();
    if reparented {
        parents.extend(original.parent_task_id());
    }
    if reparented || status_changed {
        parents.extend(updated.parent_task_id());
    }
    parents
}

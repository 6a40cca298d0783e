//! Service layer for sprint creation and closure.

use super::{SprintLifecycleError, SprintLifecycleResult};
use crate::config::EngineConfig;
use crate::identity::{Identity, SessionProvider};
use crate::sprint::{
    domain::{NewSprint, Sprint, SprintId, SprintName, TaskRelease, plan_release},
    ports::SprintRepository,
};
use crate::task::{
    domain::{ProjectId, Task, TaskDomainError, TaskId, TaskRole},
    ports::TaskRepository,
};
use mockable::Clock;
use std::collections::HashSet;
use std::sync::Arc;

/// Request payload for starting a sprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateSprintRequest {
    project_id: ProjectId,
    name: String,
    goal: String,
    task_ids: Vec<TaskId>,
}

impl CreateSprintRequest {
    /// Creates a request. A blank `name` is replaced by a generated one.
    #[must_use]
    pub fn new(
        project_id: ProjectId,
        name: impl Into<String>,
        goal: impl Into<String>,
        task_ids: impl IntoIterator<Item = TaskId>,
    ) -> Self {
        Self {
            project_id,
            name: name.into(),
            goal: goal.into(),
            task_ids: task_ids.into_iter().collect(),
        }
    }
}

/// Summary of a sprint closure or reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndSprintOutcome {
    /// The completed sprint.
    pub sprint: Sprint,
    /// Sprint tasks that were finished and keep their done status.
    pub completed: Vec<TaskId>,
    /// Sprint tasks returned to the backlog.
    pub returned: Vec<TaskId>,
    /// Story sub-tasks reset to todo.
    pub reset_subtasks: Vec<TaskId>,
}

/// Sprint lifecycle orchestration service.
///
/// Multi-step operations are not transactional across calls. Creation undoes
/// the sprint record if moving the tasks fails; closure restores the sprint
/// if its first task write fails, and [`Self::reconcile_sprint`] completes a
/// closure whose last step failed.
pub struct SprintLifecycleService<T, S, A, C>
where
    T: TaskRepository,
    S: SprintRepository,
    A: SessionProvider,
    C: Clock + Send + Sync,
{
    tasks: Arc<T>,
    sprints: Arc<S>,
    session: Arc<A>,
    clock: Arc<C>,
    config: EngineConfig,
}

impl<T, S, A, C> Clone for SprintLifecycleService<T, S, A, C>
where
    T: TaskRepository,
    S: SprintRepository,
    A: SessionProvider,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            tasks: Arc::clone(&self.tasks),
            sprints: Arc::clone(&self.sprints),
            session: Arc::clone(&self.session),
            clock: Arc::clone(&self.clock),
            config: self.config.clone(),
        }
    }
}

impl<T, S, A, C> SprintLifecycleService<T, S, A, C>
where
    T: TaskRepository,
    S: SprintRepository,
    A: SessionProvider,
    C: Clock + Send + Sync,
{
    /// Creates a new sprint lifecycle service with the default configuration.
    #[must_use]
    pub fn new(tasks: Arc<T>, sprints: Arc<S>, session: Arc<A>, clock: Arc<C>) -> Self {
        Self {
            tasks,
            sprints,
            session,
            clock,
            config: EngineConfig::default(),
        }
    }

    /// Replaces the engine configuration.
    #[must_use]
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Starts a sprint with the selected backlog items.
    ///
    /// Every selected task enters the sprint with status todo. All
    /// preconditions are checked before anything is written.
    ///
    /// # Errors
    ///
    /// Returns [`SprintLifecycleError::EmptyTaskSelection`] without tasks,
    /// [`SprintLifecycleError::ActiveSprintExists`] when the project already
    /// runs a sprint, [`SprintLifecycleError::TaskNotFound`] for unknown tasks,
    /// [`SprintLifecycleError::InvalidTaskState`] for deleted, assigned,
    /// non-backlog, or foreign tasks, and
    /// [`SprintLifecycleError::StoreUnavailable`] when persistence fails.
    pub async fn create_sprint(&self, request: CreateSprintRequest) -> SprintLifecycleResult<Sprint> {
        let identity = self.require_identity()?;
        let CreateSprintRequest {
            project_id,
            name,
            goal,
            task_ids,
        } = request;

        let selection = distinct(task_ids);
        if selection.is_empty() {
            return Err(SprintLifecycleError::EmptyTaskSelection);
        }
        if self
            .sprints
            .find_active_for_project(project_id)
            .await?
            .is_some()
        {
            return Err(SprintLifecycleError::ActiveSprintExists(project_id));
        }

        let mut selected = Vec::with_capacity(selection.len());
        for task_id in selection {
            let task = self
                .tasks
                .find_by_id(task_id)
                .await?
                .ok_or(SprintLifecycleError::TaskNotFound(task_id))?;
            if task.project_id() != project_id {
                return Err(TaskDomainError::ProjectMismatch {
                    task_id,
                    expected: project_id,
                    found: task.project_id(),
                }
                .into());
            }
            task.ensure_schedulable()?;
            selected.push(task);
        }

        let sprint_name = if name.trim().is_empty() {
            let prior = self.sprints.count_for_project(project_id).await?;
            SprintName::new(self.config.default_sprint_name(prior))?
        } else {
            SprintName::new(name)?
        };
        let sprint = Sprint::start(
            NewSprint {
                project_id,
                name: sprint_name,
                goal,
            },
            &*self.clock,
        );
        for task in &mut selected {
            task.enter_sprint(sprint.id(), &*self.clock)?;
        }

        self.sprints.store(&sprint).await?;
        if let Err(err) = self.tasks.update_many(&selected).await {
            self.undo_creation(sprint.id()).await;
            return Err(err.into());
        }

        tracing::info!(
            sprint_id = %sprint.id(),
            project_id = %project_id,
            tasks = selected.len(),
            user_id = %identity.user_id(),
            "sprint started"
        );
        Ok(sprint)
    }

    /// Ends an active sprint.
    ///
    /// Finished tasks leave the sprint keeping their status; unfinished ones
    /// return to the backlog; unfinished sub-tasks of the sprint's stories are
    /// reset to todo.
    ///
    /// # Errors
    ///
    /// Returns [`SprintLifecycleError::NotFound`] for unknown sprints,
    /// [`SprintLifecycleError::AlreadyCompleted`] when the sprint is not
    /// active, and [`SprintLifecycleError::StoreUnavailable`] when a write
    /// fails. When the first task write fails the sprint is restored to
    /// active. When the release fails after sub-tasks were reset the sprint
    /// stays completed and [`Self::reconcile_sprint`] finishes the job.
    pub async fn end_sprint(&self, sprint_id: SprintId) -> SprintLifecycleResult<EndSprintOutcome> {
        let identity = self.require_identity()?;
        let original = self.find_or_not_found(sprint_id).await?;
        let mut sprint = original.clone();
        sprint.complete(&*self.clock)?;

        // Read everything first so a failed read leaves no trace.
        let plan = self.plan_for(sprint_id).await?;
        self.sprints.update(&sprint).await?;

        let outcome_ids = (plan.completed().to_vec(), plan.returned().to_vec());
        let (released, reset) = plan.into_batches();
        // Sub-tasks go first: once the members are released the sprint's
        // stories can no longer be found from the sprint.
        if let Err(err) = self.write_batch(&reset).await {
            self.restore_sprint(&original).await;
            return Err(err);
        }
        if let Err(err) = self.write_batch(&released).await {
            if reset.is_empty() {
                self.restore_sprint(&original).await;
            } else {
                tracing::warn!(
                    sprint_id = %sprint_id,
                    error = %err,
                    "sprint completed but its tasks were not released; reconciliation required"
                );
            }
            return Err(err);
        }

        let (completed, returned) = outcome_ids;
        tracing::info!(
            sprint_id = %sprint_id,
            completed = completed.len(),
            returned = returned.len(),
            reset_subtasks = reset.len(),
            user_id = %identity.user_id(),
            "sprint ended"
        );
        Ok(EndSprintOutcome {
            sprint,
            completed,
            returned,
            reset_subtasks: reset.iter().map(Task::id).collect(),
        })
    }

    /// Finishes the closure of a completed sprint whose tasks still point at
    /// it, for example after a partially failed [`Self::end_sprint`].
    ///
    /// Safe to run repeatedly; a fully closed sprint yields an empty outcome.
    ///
    /// # Errors
    ///
    /// Returns [`SprintLifecycleError::NotFound`] for unknown sprints,
    /// [`SprintLifecycleError::SprintStillActive`] for active ones, and
    /// [`SprintLifecycleError::StoreUnavailable`] when persistence fails.
    pub async fn reconcile_sprint(
        &self,
        sprint_id: SprintId,
    ) -> SprintLifecycleResult<EndSprintOutcome> {
        self.require_identity()?;
        let sprint = self.find_or_not_found(sprint_id).await?;
        if sprint.is_active() {
            return Err(SprintLifecycleError::SprintStillActive(sprint_id));
        }

        let plan = self.plan_for(sprint_id).await?;
        if !plan.is_empty() {
            tracing::info!(sprint_id = %sprint_id, "reconciling dangling sprint references");
        }
        let outcome_ids = (plan.completed().to_vec(), plan.returned().to_vec());
        let (released, reset) = plan.into_batches();
        self.write_batch(&reset).await?;
        self.write_batch(&released).await?;

        let (completed, returned) = outcome_ids;
        Ok(EndSprintOutcome {
            sprint,
            completed,
            returned,
            reset_subtasks: reset.iter().map(Task::id).collect(),
        })
    }

    /// Returns the active sprint of a project, if any.
    ///
    /// # Errors
    ///
    /// Returns [`SprintLifecycleError::StoreUnavailable`] when persistence
    /// fails.
    pub async fn active_sprint(&self, project_id: ProjectId) -> SprintLifecycleResult<Option<Sprint>> {
        Ok(self.sprints.find_active_for_project(project_id).await?)
    }

    /// Lists all sprints of a project ordered by start date.
    ///
    /// # Errors
    ///
    /// Returns [`SprintLifecycleError::StoreUnavailable`] when persistence
    /// fails.
    pub async fn list_sprints(&self, project_id: ProjectId) -> SprintLifecycleResult<Vec<Sprint>> {
        Ok(self.sprints.find_by_project(project_id).await?)
    }

    /// Fetches a sprint.
    ///
    /// # Errors
    ///
    /// Returns [`SprintLifecycleError::NotFound`] for unknown sprints and
    /// [`SprintLifecycleError::StoreUnavailable`] when persistence fails.
    pub async fn get_sprint(&self, sprint_id: SprintId) -> SprintLifecycleResult<Sprint> {
        self.find_or_not_found(sprint_id).await
    }

    fn require_identity(&self) -> SprintLifecycleResult<Identity> {
        self.session
            .current_identity()
            .ok_or(SprintLifecycleError::Unauthenticated)
    }

    async fn find_or_not_found(&self, sprint_id: SprintId) -> SprintLifecycleResult<Sprint> {
        self.sprints
            .find_by_id(sprint_id)
            .await?
            .ok_or(SprintLifecycleError::NotFound(sprint_id))
    }

    async fn plan_for(&self, sprint_id: SprintId) -> SprintLifecycleResult<TaskRelease> {
        let sprint_tasks = self.tasks.find_by_sprint(sprint_id).await?;
        let mut story_children = Vec::new();
        for story in sprint_tasks
            .iter()
            .filter(|task| task.role() == TaskRole::Story && !task.is_deleted())
        {
            story_children.extend(self.tasks.find_children(story.id()).await?);
        }
        Ok(plan_release(
            sprint_id,
            &sprint_tasks,
            &story_children,
            &*self.clock,
        ))
    }

    async fn write_batch(&self, batch: &[Task]) -> SprintLifecycleResult<()> {
        if batch.is_empty() {
            return Ok(());
        }
        self.tasks.update_many(batch).await?;
        Ok(())
    }

    async fn undo_creation(&self, sprint_id: SprintId) {
        if let Err(err) = self.sprints.remove(sprint_id).await {
            tracing::error!(
                sprint_id = %sprint_id,
                error = %err,
                "could not remove sprint after failed task assignment"
            );
        }
    }

    async fn restore_sprint(&self, original: &Sprint) {
        if let Err(err) = self.sprints.update(original).await {
            tracing::error!(
                sprint_id = %original.id(),
                error = %err,
                "could not restore sprint after failed closure; reconciliation required"
            );
        }
    }
}

/// Removes duplicate IDs while keeping the caller's order.
fn distinct(task_ids: Vec<TaskId>) -> Vec<TaskId> {
    let mut seen = HashSet::with_capacity(task_ids.len());
    task_ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

//! Point-in-time copy of a project's tasks and sprints.

use crate::sprint::domain::{Sprint, SprintId};
use crate::task::domain::{ProjectId, Task, TaskId, TaskKind, TaskRole, TaskStatus};
use std::collections::HashMap;

/// Tasks and sprints of one project as read from the stores.
///
/// The snapshot resolves the effective placement of each task: references to
/// sprints that are completed or missing are ignored, and sub-tasks whose
/// parent is deleted or missing are treated as if they had no parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSnapshot {
    project_id: ProjectId,
    tasks: Vec<Task>,
    sprints: Vec<Sprint>,
    task_index: HashMap<TaskId, usize>,
}

impl ProjectSnapshot {
    /// Builds a snapshot from the project's tasks and sprints.
    ///
    /// Records belonging to other projects are dropped.
    #[must_use]
    pub fn new(project_id: ProjectId, tasks: Vec<Task>, sprints: Vec<Sprint>) -> Self {
        let tasks: Vec<Task> = tasks
            .into_iter()
            .filter(|task| task.project_id() == project_id)
            .collect();
        let sprints = sprints
            .into_iter()
            .filter(|sprint| sprint.project_id() == project_id)
            .collect();
        let task_index = tasks
            .iter()
            .enumerate()
            .map(|(position, task)| (task.id(), position))
            .collect();
        Self {
            project_id,
            tasks,
            sprints,
            task_index,
        }
    }

    /// Returns the project the snapshot describes.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns every task, including deleted ones.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Returns every sprint of the project.
    #[must_use]
    pub fn sprints(&self) -> &[Sprint] {
        &self.sprints
    }

    /// Looks up a task by identifier.
    #[must_use]
    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.task_index.get(&id).and_then(|position| self.tasks.get(*position))
    }

    /// Looks up a sprint by identifier.
    #[must_use]
    pub fn sprint(&self, id: SprintId) -> Option<&Sprint> {
        self.sprints.iter().find(|sprint| sprint.id() == id)
    }

    /// Returns the project's active sprint, if any.
    #[must_use]
    pub fn active_sprint(&self) -> Option<&Sprint> {
        self.sprints.iter().find(|sprint| sprint.is_active())
    }

    /// Iterates over tasks that are not deleted.
    pub fn live_tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|task| !task.is_deleted())
    }

    /// Returns the live children of a task.
    #[must_use]
    pub fn children_of(&self, parent_id: TaskId) -> Vec<&Task> {
        self.live_tasks()
            .filter(|task| task.parent_task_id() == Some(parent_id))
            .collect()
    }

    /// Returns the task's sprint when that sprint is known and active.
    #[must_use]
    pub fn effective_sprint(&self, task: &Task) -> Option<SprintId> {
        task.sprint_id()
            .filter(|id| self.sprint(*id).is_some_and(Sprint::is_active))
    }

    /// Returns the status a view shows for the task.
    ///
    /// Unfinished tasks with a dangling sprint reference show as backlog.
    #[must_use]
    pub fn effective_status(&self, task: &Task) -> TaskStatus {
        let dangling = task.sprint_id().is_some() && self.effective_sprint(task).is_none();
        if dangling && !task.is_done() && !task.is_deleted() {
            TaskStatus::Backlog
        } else {
            task.status()
        }
    }

    /// Returns the task's role with orphaned sub-tasks promoted.
    #[must_use]
    pub fn effective_role(&self, task: &Task) -> TaskRole {
        match task.role() {
            TaskRole::SubTask if !self.has_live_parent(task) => {
                if task.kind() == TaskKind::UserStory {
                    TaskRole::Story
                } else {
                    TaskRole::Standalone
                }
            }
            role => role,
        }
    }

    fn has_live_parent(&self, task: &Task) -> bool {
        task.parent_task_id()
            .and_then(|parent_id| self.task(parent_id))
            .is_some_and(|parent| !parent.is_deleted())
    }
}

//! Pure planning of the task changes caused by closing a sprint.

use super::SprintId;
use crate::task::domain::{Task, TaskId, TaskRole};
use mockable::Clock;
use std::collections::HashSet;

/// Task changes produced by closing a sprint.
///
/// `released` and `reset_subtasks` hold the final state of every task that
/// must be written; they never share a task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskRelease {
    released: Vec<Task>,
    reset_subtasks: Vec<Task>,
    completed: Vec<TaskId>,
    returned: Vec<TaskId>,
}

impl TaskRelease {
    /// Returns the sprint's own tasks with their sprint reference cleared.
    #[must_use]
    pub fn released(&self) -> &[Task] {
        &self.released
    }

    /// Returns the story sub-tasks reset to todo.
    #[must_use]
    pub fn reset_subtasks(&self) -> &[Task] {
        &self.reset_subtasks
    }

    /// Returns the identifiers of sprint tasks that were finished.
    #[must_use]
    pub fn completed(&self) -> &[TaskId] {
        &self.completed
    }

    /// Returns the identifiers of sprint tasks sent back to the backlog.
    #[must_use]
    pub fn returned(&self) -> &[TaskId] {
        &self.returned
    }

    /// Returns whether the plan changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.released.is_empty() && self.reset_subtasks.is_empty()
    }

    /// Splits the plan into the two task batches to persist.
    #[must_use]
    pub fn into_batches(self) -> (Vec<Task>, Vec<Task>) {
        (self.released, self.reset_subtasks)
    }
}

/// Plans the task changes for closing `sprint_id`.
///
/// `sprint_tasks` are the tasks referencing the sprint and `story_children`
/// the children of the stories among them. Stale entries (deleted tasks,
/// tasks no longer referencing the sprint, children of other parents) are
/// ignored, so the plan can be recomputed from a fresh read at any time.
///
/// Every live sprint task loses its sprint reference; unfinished ones return
/// to the backlog. Every live, unfinished child of a sprint story is reset to
/// todo, whatever its own sprint reference.
#[must_use]
pub fn plan_release(
    sprint_id: SprintId,
    sprint_tasks: &[Task],
    story_children: &[Task],
    clock: &impl Clock,
) -> TaskRelease {
    let members: Vec<&Task> = sprint_tasks
        .iter()
        .filter(|task| task.sprint_id() == Some(sprint_id) && !task.is_deleted())
        .collect();
    let story_ids: HashSet<TaskId> = members
        .iter()
        .filter(|task| task.role() == TaskRole::Story)
        .map(|task| task.id())
        .collect();

    let mut plan = TaskRelease::default();
    let mut touched = HashSet::new();

    for member in members {
        if !touched.insert(member.id()) {
            continue;
        }
        let mut task = member.clone();
        if task.is_done() {
            plan.completed.push(task.id());
        } else {
            plan.returned.push(task.id());
        }
        task.release_from_sprint(clock);
        if task.parent_task_id().is_some_and(|parent| story_ids.contains(&parent)) {
            task.reset_to_todo(clock);
        }
        plan.released.push(task);
    }

    for child in story_children {
        let belongs_to_story = child
            .parent_task_id()
            .is_some_and(|parent| story_ids.contains(&parent));
        if !belongs_to_story || touched.contains(&child.id()) {
            continue;
        }
        let mut task = child.clone();
        if task.reset_to_todo(clock) {
            touched.insert(task.id());
            plan.reset_subtasks.push(task);
        }
    }

    plan
}

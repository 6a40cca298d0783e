//! Backlog partitioning.

use super::ProjectSnapshot;
use crate::task::domain::{Task, TaskRole, TaskStatus};

/// Work waiting to be scheduled into a sprint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BacklogView {
    /// User stories in the backlog.
    pub stories: Vec<Task>,
    /// Standalone tasks in the backlog.
    pub tasks: Vec<Task>,
}

impl BacklogView {
    /// Returns the number of backlog items.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.stories.len() + self.tasks.len()
    }

    /// Returns whether the backlog is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.stories.is_empty() && self.tasks.is_empty()
    }

    /// Returns whether the backlog contains the task.
    #[must_use]
    pub fn contains(&self, task: &Task) -> bool {
        self.stories
            .iter()
            .chain(&self.tasks)
            .any(|item| item.id() == task.id())
    }
}

/// Builds the backlog of a project.
///
/// A task belongs to the backlog when it is live, is a story or standalone
/// task, is in no active sprint, and shows status backlog. A task in an
/// active sprint never appears, whatever its own status.
#[must_use]
pub fn backlog_view(snapshot: &ProjectSnapshot) -> BacklogView {
    let mut view = BacklogView::default();
    for task in snapshot.live_tasks() {
        if snapshot.effective_sprint(task).is_some()
            || snapshot.effective_status(task) != TaskStatus::Backlog
        {
            continue;
        }
        match snapshot.effective_role(task) {
            TaskRole::Story => view.stories.push(task.clone()),
            TaskRole::Standalone => view.tasks.push(task.clone()),
            TaskRole::SubTask => {}
        }
    }
    view
}

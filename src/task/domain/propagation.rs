//! Derivation of a parent's status from its children.

use super::{Task, TaskStatus};

/// Derives a parent's status from the statuses of its children.
///
/// Deleted children are ignored. Returns `None` when no live child remains,
/// in which case the parent's status stays under direct user control.
/// Otherwise:
///
/// - every child done: [`TaskStatus::Done`]
/// - any child in progress: [`TaskStatus::InProgress`]
/// - anything else: [`TaskStatus::Todo`]
///
/// [`TaskStatus::Backlog`] is never derived.
#[must_use]
pub fn derive_status_from(statuses: impl IntoIterator<Item = TaskStatus>) -> Option<TaskStatus> {
    let mut seen_any = false;
    let mut all_done = true;
    let mut any_in_progress = false;

    for status in statuses {
        match status {
            TaskStatus::Deleted => continue,
            TaskStatus::Done => {}
            TaskStatus::InProgress => {
                any_in_progress = true;
                all_done = false;
            }
            TaskStatus::Backlog | TaskStatus::Todo => all_done = false,
        }
        seen_any = true;
    }

    if !seen_any {
        return None;
    }
    if all_done {
        Some(TaskStatus::Done)
    } else if any_in_progress {
        Some(TaskStatus::InProgress)
    } else {
        Some(TaskStatus::Todo)
    }
}

/// Derives a parent's status from a snapshot of its children.
///
/// See [`derive_status_from`] for the rule.
#[must_use]
pub fn derive_parent_status<'a>(children: impl IntoIterator<Item = &'a Task>) -> Option<TaskStatus> {
    derive_status_from(
        children
            .into_iter()
            .filter(|child| !child.is_deleted())
            .map(Task::status),
    )
}

//! Story progress and story point roll-ups.

use super::ProjectSnapshot;
use crate::sprint::domain::SprintId;
use crate::task::domain::{Task, TaskRole};
use std::fmt;

/// Completion of a story measured by its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoryProgress {
    done: usize,
    total: usize,
    story_done: bool,
}

impl StoryProgress {
    /// Returns the number of finished children.
    #[must_use]
    pub const fn done(self) -> usize {
        self.done
    }

    /// Returns the number of live children.
    #[must_use]
    pub const fn total(self) -> usize {
        self.total
    }

    /// Returns the completion percentage, rounded down.
    ///
    /// A story without children is either 0 or 100 depending on its own
    /// status.
    #[must_use]
    pub fn percent(self) -> u8 {
        let Some(ratio) = self.done.saturating_mul(100).checked_div(self.total) else {
            return if self.story_done { 100 } else { 0 };
        };
        u8::try_from(ratio).unwrap_or(100)
    }

    /// Returns whether the story counts as finished.
    #[must_use]
    pub const fn is_complete(self) -> bool {
        if self.total == 0 {
            self.story_done
        } else {
            self.done == self.total
        }
    }
}

impl fmt::Display for StoryProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} ({}%)", self.done, self.total, self.percent())
    }
}

/// Measures a story's progress from its children.
///
/// Deleted children are ignored.
#[must_use]
pub fn story_progress<'a>(story: &Task, children: impl IntoIterator<Item = &'a Task>) -> StoryProgress {
    let (done, total) = children
        .into_iter()
        .filter(|child| !child.is_deleted())
        .fold((0, 0), |(done, total), child| {
            (done + usize::from(child.is_done()), total + 1)
        });
    StoryProgress {
        done,
        total,
        story_done: story.is_done(),
    }
}

/// Story points committed to and finished in a sprint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoryPointsSummary {
    /// Sum of the points of every story in the sprint.
    pub total: u32,
    /// Sum of the points of finished stories.
    pub completed: u32,
}

/// Rolls up the story points of the stories in a sprint.
///
/// A story counts as completed when it has no children and is done, or when
/// all of its children are done.
#[must_use]
pub fn story_points(snapshot: &ProjectSnapshot, sprint_id: SprintId) -> StoryPointsSummary {
    snapshot
        .live_tasks()
        .filter(|task| {
            task.sprint_id() == Some(sprint_id)
                && snapshot.effective_role(task) == TaskRole::Story
        })
        .fold(StoryPointsSummary::default(), |summary, story| {
            let points = story.story_points().map_or(0, |points| points.value());
            let progress = story_progress(story, snapshot.children_of(story.id()));
            StoryPointsSummary {
                total: summary.total.saturating_add(points),
                completed: if progress.is_complete() {
                    summary.completed.saturating_add(points)
                } else {
                    summary.completed
                },
            }
        })
}

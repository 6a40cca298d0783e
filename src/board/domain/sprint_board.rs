//! Sprint board partitioning.

use super::{
    BoardDomainError, ProjectSnapshot, StoryPointsSummary, StoryProgress, story_points,
    story_progress,
};
use crate::sprint::domain::{Sprint, SprintId};
use crate::task::domain::{Task, TaskRole, TaskStatus};
use std::collections::HashSet;

/// Column of the sprint board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoardColumn {
    /// Work not yet started.
    Todo,
    /// Work under way.
    InProgress,
    /// Finished work.
    Done,
}

impl BoardColumn {
    /// Returns the column a status is shown in.
    ///
    /// Backlog cards sit in the todo column; deleted tasks have no column.
    #[must_use]
    pub const fn for_status(status: TaskStatus) -> Option<Self> {
        match status {
            TaskStatus::Backlog | TaskStatus::Todo => Some(Self::Todo),
            TaskStatus::InProgress => Some(Self::InProgress),
            TaskStatus::Done => Some(Self::Done),
            TaskStatus::Deleted => None,
        }
    }
}

/// A story in the sprint together with its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryGroup {
    /// The story.
    pub story: Task,
    /// The story's live children.
    pub children: Vec<Task>,
    /// Completion measured by the children.
    pub progress: StoryProgress,
}

impl StoryGroup {
    /// Returns whether some children are still unfinished.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        !self.progress.is_complete()
    }
}

/// Board of an active sprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SprintBoard {
    /// The sprint shown.
    pub sprint: Sprint,
    /// Cards in the todo column.
    pub todo: Vec<Task>,
    /// Cards in the in-progress column.
    pub in_progress: Vec<Task>,
    /// Cards in the done column.
    pub done: Vec<Task>,
    /// Stories in the sprint that have children.
    pub stories: Vec<StoryGroup>,
    /// Story point roll-up for the sprint.
    pub points: StoryPointsSummary,
}

impl SprintBoard {
    /// Returns the cards of a column.
    #[must_use]
    pub fn column(&self, column: BoardColumn) -> &[Task] {
        match column {
            BoardColumn::Todo => &self.todo,
            BoardColumn::InProgress => &self.in_progress,
            BoardColumn::Done => &self.done,
        }
    }

    /// Returns the column holding the task, if it is on the board.
    #[must_use]
    pub fn column_of(&self, task: &Task) -> Option<BoardColumn> {
        [BoardColumn::Todo, BoardColumn::InProgress, BoardColumn::Done]
            .into_iter()
            .find(|column| self.column(*column).iter().any(|card| card.id() == task.id()))
    }

    /// Returns the number of cards on the board.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.todo.len() + self.in_progress.len() + self.done.len()
    }
}

/// Builds the board of an active sprint.
///
/// Cards are the sub-tasks of the sprint's stories, whatever their own
/// sprint reference, the sprint's standalone tasks, and the sprint's stories
/// that have no children.
///
/// # Errors
///
/// Returns [`BoardDomainError::UnknownSprint`] when the sprint is not in the
/// snapshot and [`BoardDomainError::SprintNotActive`] when it is completed.
pub fn sprint_board(
    snapshot: &ProjectSnapshot,
    sprint_id: SprintId,
) -> Result<SprintBoard, BoardDomainError> {
    let sprint = snapshot
        .sprint(sprint_id)
        .ok_or(BoardDomainError::UnknownSprint(sprint_id))?;
    if !sprint.is_active() {
        return Err(BoardDomainError::SprintNotActive(sprint_id));
    }

    let mut cards: Vec<&Task> = Vec::new();
    let mut stories = Vec::new();
    for task in snapshot
        .live_tasks()
        .filter(|task| snapshot.effective_sprint(task) == Some(sprint_id))
    {
        match snapshot.effective_role(task) {
            TaskRole::Story => {
                let children = snapshot.children_of(task.id());
                if children.is_empty() {
                    cards.push(task);
                    continue;
                }
                let progress = story_progress(task, children.iter().copied());
                cards.extend(children.iter().copied());
                stories.push(StoryGroup {
                    story: task.clone(),
                    children: children.into_iter().cloned().collect(),
                    progress,
                });
            }
            TaskRole::Standalone => cards.push(task),
            TaskRole::SubTask => {}
        }
    }

    let mut board = SprintBoard {
        sprint: sprint.clone(),
        todo: Vec::new(),
        in_progress: Vec::new(),
        done: Vec::new(),
        stories,
        points: story_points(snapshot, sprint_id),
    };
    let mut placed = HashSet::new();
    for card in cards {
        if !placed.insert(card.id()) {
            continue;
        }
        let target = match BoardColumn::for_status(snapshot.effective_status(card)) {
            Some(BoardColumn::Todo) => &mut board.todo,
            Some(BoardColumn::InProgress) => &mut board.in_progress,
            Some(BoardColumn::Done) => &mut board.done,
            None => continue,
        };
        target.push(card.clone());
    }
    Ok(board)
}

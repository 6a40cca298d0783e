//! Pure view functions over a project snapshot.

mod backlog;
mod error;
mod progress;
mod snapshot;
mod sprint_board;

pub use backlog::{BacklogView, backlog_view};
pub use error::BoardDomainError;
pub use progress::{StoryPointsSummary, StoryProgress, story_points, story_progress};
pub use snapshot::ProjectSnapshot;
pub use sprint_board::{BoardColumn, SprintBoard, StoryGroup, sprint_board};

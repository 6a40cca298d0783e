//! Domain model for tasks and their hierarchy.
//!
//! Tasks are user stories, standalone tasks, or sub-tasks of another task.
//! The domain captures their attributes, the mutations a task permits, and
//! the rule that derives a parent's status from its children. Persistence
//! and collaborator concerns stay outside this boundary.

mod error;
mod ids;
mod propagation;
mod task;
mod values;

pub use error::{ParseTaskFieldError, TaskDomainError};
pub use ids::{ProjectId, TaskId};
pub use propagation::{derive_parent_status, derive_status_from};
pub use task::{NewTask, PersistedTaskData, Task};
pub use values::{StoryPoints, TaskKind, TaskPriority, TaskRole, TaskStatus, TaskTitle};

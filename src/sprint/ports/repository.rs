//! Repository port for the sprint registry.

use crate::sprint::domain::{Sprint, SprintId};
use crate::task::domain::ProjectId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for sprint repository operations.
pub type SprintRepositoryResult<T> = Result<T, SprintRepositoryError>;

/// Sprint persistence contract.
#[async_trait]
pub trait SprintRepository: Send + Sync {
    /// Stores a new sprint.
    ///
    /// # Errors
    ///
    /// Returns [`SprintRepositoryError::DuplicateSprint`] when the ID already
    /// exists, or [`SprintRepositoryError::ActiveSprintExists`] when the
    /// store itself enforces a single active sprint per project and another
    /// one is active.
    async fn store(&self, sprint: &Sprint) -> SprintRepositoryResult<()>;

    /// Persists changes to an existing sprint.
    ///
    /// # Errors
    ///
    /// Returns [`SprintRepositoryError::NotFound`] when the sprint does not
    /// exist.
    async fn update(&self, sprint: &Sprint) -> SprintRepositoryResult<()>;

    /// Removes a sprint record. Used only to undo a failed creation.
    ///
    /// # Errors
    ///
    /// Returns [`SprintRepositoryError::NotFound`] when the sprint does not
    /// exist.
    async fn remove(&self, id: SprintId) -> SprintRepositoryResult<()>;

    /// Finds a sprint by identifier.
    async fn find_by_id(&self, id: SprintId) -> SprintRepositoryResult<Option<Sprint>>;

    /// Finds the active sprint of a project, if any.
    async fn find_active_for_project(
        &self,
        project_id: ProjectId,
    ) -> SprintRepositoryResult<Option<Sprint>>;

    /// Returns all sprints of a project ordered by start date.
    async fn find_by_project(&self, project_id: ProjectId) -> SprintRepositoryResult<Vec<Sprint>>;

    /// Counts all sprints ever created for a project.
    async fn count_for_project(&self, project_id: ProjectId) -> SprintRepositoryResult<u64>;
}

/// Errors returned by sprint repository implementations.
#[derive(Debug, Clone, Error)]
pub enum SprintRepositoryError {
    /// A sprint with the same identifier already exists.
    #[error("duplicate sprint identifier: {0}")]
    DuplicateSprint(SprintId),

    /// The project already has an active sprint.
    #[error("project {0} already has an active sprint")]
    ActiveSprintExists(ProjectId),

    /// The sprint was not found.
    #[error("sprint not found: {0}")]
    NotFound(SprintId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl SprintRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

//! In-memory sprint registry.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::sprint::{
    domain::{Sprint, SprintId},
    ports::{SprintRepository, SprintRepositoryError, SprintRepositoryResult},
};
use crate::task::domain::ProjectId;

/// Thread-safe in-memory sprint repository.
///
/// Mirrors the relational store's partial unique index: storing a second
/// active sprint for a project is rejected.
#[derive(Debug, Clone, Default)]
pub struct InMemorySprintRepository {
    state: Arc<RwLock<InMemorySprintState>>,
}

#[derive(Debug, Default)]
struct InMemorySprintState {
    sprints: HashMap<SprintId, Sprint>,
    project_index: HashMap<ProjectId, Vec<SprintId>>,
}

impl InMemorySprintRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl InMemorySprintState {
    fn for_project(&self, project_id: ProjectId) -> impl Iterator<Item = &Sprint> {
        self.project_index
            .get(&project_id)
            .into_iter()
            .flatten()
            .filter_map(|id| self.sprints.get(id))
    }

    fn has_other_active(&self, sprint: &Sprint) -> bool {
        self.for_project(sprint.project_id())
            .any(|existing| existing.is_active() && existing.id() != sprint.id())
    }
}

fn lock_error(err: impl ToString) -> SprintRepositoryError {
    SprintRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl SprintRepository for InMemorySprintRepository {
    async fn store(&self, sprint: &Sprint) -> SprintRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.sprints.contains_key(&sprint.id()) {
            return Err(SprintRepositoryError::DuplicateSprint(sprint.id()));
        }
        if sprint.is_active() && state.has_other_active(sprint) {
            return Err(SprintRepositoryError::ActiveSprintExists(sprint.project_id()));
        }
        state
            .project_index
            .entry(sprint.project_id())
            .or_default()
            .push(sprint.id());
        state.sprints.insert(sprint.id(), sprint.clone());
        Ok(())
    }

    async fn update(&self, sprint: &Sprint) -> SprintRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if !state.sprints.contains_key(&sprint.id()) {
            return Err(SprintRepositoryError::NotFound(sprint.id()));
        }
        if sprint.is_active() && state.has_other_active(sprint) {
            return Err(SprintRepositoryError::ActiveSprintExists(sprint.project_id()));
        }
        state.sprints.insert(sprint.id(), sprint.clone());
        Ok(())
    }

    async fn remove(&self, id: SprintId) -> SprintRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let removed = state
            .sprints
            .remove(&id)
            .ok_or(SprintRepositoryError::NotFound(id))?;
        if let Some(ids) = state.project_index.get_mut(&removed.project_id()) {
            ids.retain(|existing| *existing != id);
        }
        Ok(())
    }

    async fn find_by_id(&self, id: SprintId) -> SprintRepositoryResult<Option<Sprint>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.sprints.get(&id).cloned())
    }

    async fn find_active_for_project(
        &self,
        project_id: ProjectId,
    ) -> SprintRepositoryResult<Option<Sprint>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .for_project(project_id)
            .find(|sprint| sprint.is_active())
            .cloned())
    }

    async fn find_by_project(&self, project_id: ProjectId) -> SprintRepositoryResult<Vec<Sprint>> {
        let state = self.state.read().map_err(lock_error)?;
        let mut sprints: Vec<Sprint> = state.for_project(project_id).cloned().collect();
        sprints.sort_by_key(Sprint::start_date);
        Ok(sprints)
    }

    async fn count_for_project(&self, project_id: ProjectId) -> SprintRepositoryResult<u64> {
        let state = self.state.read().map_err(lock_error)?;
        let count = state.for_project(project_id).count();
        u64::try_from(count).map_err(SprintRepositoryError::persistence)
    }
}

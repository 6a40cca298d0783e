//! Board queries backed by a read-through snapshot cache.

use super::{BoardError, BoardResult, RecordChange};
use crate::board::domain::{
    BacklogView, ProjectSnapshot, SprintBoard, backlog_view, sprint_board,
};
use crate::config::EngineConfig;
use crate::sprint::{domain::SprintId, ports::SprintRepository};
use crate::task::{domain::ProjectId, ports::TaskRepository};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Cached snapshots plus a per-project invalidation counter.
///
/// A load only populates the cache when no invalidation happened since it
/// started, so a change event racing a load is never lost.
#[derive(Debug, Default)]
struct SnapshotCache {
    snapshots: HashMap<ProjectId, Arc<ProjectSnapshot>>,
    generations: HashMap<ProjectId, u64>,
}

impl SnapshotCache {
    fn generation(&self, project_id: ProjectId) -> u64 {
        self.generations.get(&project_id).copied().unwrap_or_default()
    }

    fn invalidate(&mut self, project_id: ProjectId) {
        self.snapshots.remove(&project_id);
        let generation = self.generations.entry(project_id).or_default();
        *generation = generation.wrapping_add(1);
    }
}

/// Serves backlog and board views.
///
/// Snapshots are cached per project and never treated as authoritative:
/// callers invalidate them through [`Self::apply_change`] for feed events
/// and [`Self::refresh`] after their own writes.
pub struct BoardService<T, S>
where
    T: TaskRepository,
    S: SprintRepository,
{
    tasks: Arc<T>,
    sprints: Arc<S>,
    cache: Arc<RwLock<SnapshotCache>>,
    config: EngineConfig,
}

impl<T, S> Clone for BoardService<T, S>
where
    T: TaskRepository,
    S: SprintRepository,
{
    fn clone(&self) -> Self {
        Self {
            tasks: Arc::clone(&self.tasks),
            sprints: Arc::clone(&self.sprints),
            cache: Arc::clone(&self.cache),
            config: self.config.clone(),
        }
    }
}

impl<T, S> BoardService<T, S>
where
    T: TaskRepository,
    S: SprintRepository,
{
    /// Creates a board service with the default configuration.
    #[must_use]
    pub fn new(tasks: Arc<T>, sprints: Arc<S>) -> Self {
        Self {
            tasks,
            sprints,
            cache: Arc::default(),
            config: EngineConfig::default(),
        }
    }

    /// Replaces the engine configuration.
    #[must_use]
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the project's snapshot, loading it when not cached.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::StoreUnavailable`] when a store read fails.
    pub async fn snapshot(&self, project_id: ProjectId) -> BoardResult<Arc<ProjectSnapshot>> {
        if let Some(cached) = self.cached(project_id) {
            return Ok(cached);
        }
        self.refresh(project_id).await
    }

    /// Reloads the project's snapshot from the stores.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::StoreUnavailable`] when a store read fails. The
    /// previous snapshot is dropped either way. A snapshot whose load was
    /// overtaken by an invalidation is returned but not cached.
    pub async fn refresh(&self, project_id: ProjectId) -> BoardResult<Arc<ProjectSnapshot>> {
        let started = {
            let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
            cache.invalidate(project_id);
            cache.generation(project_id)
        };
        let tasks = self.tasks.find_by_project(project_id).await?;
        let sprints = self.sprints.find_by_project(project_id).await?;
        let snapshot = Arc::new(ProjectSnapshot::new(project_id, tasks, sprints));
        if self.config.cache_board_snapshots {
            let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
            if cache.generation(project_id) == started {
                cache.snapshots.insert(project_id, Arc::clone(&snapshot));
            } else {
                tracing::debug!(
                    project_id = %project_id,
                    "board snapshot superseded while loading"
                );
            }
        }
        tracing::debug!(
            project_id = %project_id,
            tasks = snapshot.tasks().len(),
            sprints = snapshot.sprints().len(),
            "board snapshot loaded"
        );
        Ok(snapshot)
    }

    /// Drops the cached snapshot of the changed record's project.
    pub fn apply_change(&self, change: &RecordChange) {
        self.invalidate(change.project_id);
        tracing::debug!(
            project_id = %change.project_id,
            record = ?change.record,
            operation = ?change.operation,
            "board change applied"
        );
    }

    /// Drops the cached snapshot of a project.
    pub fn invalidate(&self, project_id: ProjectId) {
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .invalidate(project_id);
    }

    /// Returns whether a snapshot of the project is cached.
    #[must_use]
    pub fn is_cached(&self, project_id: ProjectId) -> bool {
        self.cached(project_id).is_some()
    }

    /// Returns the project's backlog.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::StoreUnavailable`] when a store read fails.
    pub async fn backlog(&self, project_id: ProjectId) -> BoardResult<BacklogView> {
        let snapshot = self.snapshot(project_id).await?;
        Ok(backlog_view(&snapshot))
    }

    /// Returns the board of a sprint.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::SprintNotFound`] for unknown sprints,
    /// [`BoardError::SprintNotActive`] for completed ones, and
    /// [`BoardError::StoreUnavailable`] when a store read fails.
    pub async fn sprint_board(&self, sprint_id: SprintId) -> BoardResult<SprintBoard> {
        let sprint = self
            .sprints
            .find_by_id(sprint_id)
            .await?
            .ok_or(BoardError::SprintNotFound(sprint_id))?;
        let mut snapshot = self.snapshot(sprint.project_id()).await?;
        // A cached snapshot may predate the sprint or its latest change.
        if snapshot.sprint(sprint_id) != Some(&sprint) {
            snapshot = self.refresh(sprint.project_id()).await?;
        }
        Ok(sprint_board(&snapshot, sprint_id)?)
    }

    /// Returns the board of the project's active sprint, if any.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::StoreUnavailable`] when a store read fails.
    pub async fn active_board(&self, project_id: ProjectId) -> BoardResult<Option<SprintBoard>> {
        let snapshot = self.snapshot(project_id).await?;
        snapshot
            .active_sprint()
            .map(|sprint| sprint_board(&snapshot, sprint.id()).map_err(BoardError::from))
            .transpose()
    }

    fn cached(&self, project_id: ProjectId) -> Option<Arc<ProjectSnapshot>> {
        if !self.config.cache_board_snapshots {
            return None;
        }
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .snapshots
            .get(&project_id)
            .cloned()
    }
}

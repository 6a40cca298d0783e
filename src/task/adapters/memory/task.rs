//! In-memory repository for tasks.

use async_trait::async_trait;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, RwLock};

use crate::sprint::domain::SprintId;
use crate::task::{
    domain::{ProjectId, Task, TaskId},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory task repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, Task>,
    project_index: HashMap<ProjectId, Vec<TaskId>>,
    parent_index: HashMap<TaskId, Vec<TaskId>>,
    sprint_index: HashMap<SprintId, Vec<TaskId>>,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl InMemoryTaskState {
    fn index(&mut self, task: &Task) {
        if let Some(parent_id) = task.parent_task_id() {
            self.parent_index.entry(parent_id).or_default().push(task.id());
        }
        if let Some(sprint_id) = task.sprint_id() {
            self.sprint_index.entry(sprint_id).or_default().push(task.id());
        }
    }

    fn unindex(&mut self, task: &Task) {
        if let Some(parent_id) = task.parent_task_id() {
            remove_from_index(&mut self.parent_index, task.id(), &parent_id);
        }
        if let Some(sprint_id) = task.sprint_id() {
            remove_from_index(&mut self.sprint_index, task.id(), &sprint_id);
        }
    }

    fn replace(&mut self, task: &Task) {
        if let Some(previous) = self.tasks.get(&task.id()).cloned() {
            self.unindex(&previous);
        }
        self.index(task);
        self.tasks.insert(task.id(), task.clone());
    }

    fn collect<K: Eq + Hash>(&self, index: &HashMap<K, Vec<TaskId>>, key: &K) -> Vec<Task> {
        index
            .get(key)
            .map(|ids| ids.iter().filter_map(|id| self.tasks.get(id).cloned()).collect())
            .unwrap_or_default()
    }
}

/// Removes a task ID from an index, cleaning up the entry if empty.
fn remove_from_index<K: Eq + Hash>(index: &mut HashMap<K, Vec<TaskId>>, task_id: TaskId, key: &K) {
    if let Some(ids) = index.get_mut(key) {
        ids.retain(|id| *id != task_id);
        if ids.is_empty() {
            index.remove(key);
        }
    }
}

fn lock_error(err: impl ToString) -> TaskRepositoryError {
    TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }

        state
            .project_index
            .entry(task.project_id())
            .or_default()
            .push(task.id());
        state.index(task);
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if !state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::NotFound(task.id()));
        }
        state.replace(task);
        Ok(())
    }

    async fn update_many(&self, tasks: &[Task]) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        // Validate the whole batch before touching anything.
        if let Some(missing) = tasks.iter().find(|task| !state.tasks.contains_key(&task.id())) {
            return Err(TaskRepositoryError::NotFound(missing.id()));
        }
        for task in tasks {
            state.replace(task);
        }
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn find_children(&self, parent_id: TaskId) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.collect(&state.parent_index, &parent_id))
    }

    async fn find_by_sprint(&self, sprint_id: SprintId) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.collect(&state.sprint_index, &sprint_id))
    }

    async fn find_by_project(&self, project_id: ProjectId) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.collect(&state.project_index, &project_id))
    }
}

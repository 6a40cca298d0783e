//! Shared world state for sprint lifecycle BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use trellis::identity::{Identity, StaticSessionProvider, UserId};
use trellis::notification::NoopNotificationSink;
use trellis::sprint::{
    adapters::memory::InMemorySprintRepository,
    domain::Sprint,
    services::{CreateSprintRequest, SprintLifecycleError, SprintLifecycleService},
};
use trellis::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{ProjectId, Task, TaskId},
    services::TaskStoreService,
};

/// Task store type used by the BDD world.
pub type TestStore = TaskStoreService<
    InMemoryTaskRepository,
    InMemorySprintRepository,
    NoopNotificationSink,
    StaticSessionProvider,
    DefaultClock,
>;

/// Sprint lifecycle type used by the BDD world.
pub type TestLifecycle = SprintLifecycleService<
    InMemoryTaskRepository,
    InMemorySprintRepository,
    StaticSessionProvider,
    DefaultClock,
>;

/// Scenario world for sprint lifecycle behaviour tests.
pub struct SprintWorld {
    pub store: TestStore,
    pub lifecycle: TestLifecycle,
    pub project_id: ProjectId,
    pub tasks: HashMap<String, TaskId>,
    pub sprint: Option<Sprint>,
    pub last_error: Option<SprintLifecycleError>,
}

impl SprintWorld {
    /// Creates a world with a signed-in user and an empty project.
    #[must_use]
    pub fn new() -> Self {
        let tasks = Arc::new(InMemoryTaskRepository::new());
        let sprints = Arc::new(InMemorySprintRepository::new());
        let session = Arc::new(StaticSessionProvider::signed_in(Identity::new(
            UserId::new(),
            "scrum-master@example.com",
        )));
        let clock = Arc::new(DefaultClock);

        Self {
            store: TaskStoreService::new(
                Arc::clone(&tasks),
                Arc::clone(&sprints),
                Arc::new(NoopNotificationSink),
                Arc::clone(&session),
                Arc::clone(&clock),
            ),
            lifecycle: SprintLifecycleService::new(tasks, sprints, session, clock),
            project_id: ProjectId::new(),
            tasks: HashMap::new(),
            sprint: None,
            last_error: None,
        }
    }

    /// Looks up a task created earlier in the scenario by its title.
    pub fn task_id(&self, title: &str) -> Result<TaskId, eyre::Report> {
        self.tasks
            .get(title)
            .copied()
            .ok_or_else(|| eyre::eyre!("no task titled {title:?} in scenario world"))
    }

    /// Re-reads a task created earlier in the scenario.
    pub fn fetch(&self, title: &str) -> Result<Task, eyre::Report> {
        let id = self.task_id(title)?;
        run_async(self.store.get_task(id)).map_err(|err| eyre::eyre!("fetch {title:?}: {err}"))
    }

    /// Returns the sprint started in the scenario.
    pub fn current_sprint(&self) -> Result<&Sprint, eyre::Report> {
        self.sprint
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing sprint in scenario world"))
    }

    /// Starts a sprint and records the outcome.
    pub fn start_sprint(&mut self, name: &str, titles: &[String]) -> Result<(), eyre::Report> {
        let task_ids = titles
            .iter()
            .map(|title| self.task_id(title))
            .collect::<Result<Vec<_>, _>>()?;
        let request = CreateSprintRequest::new(self.project_id, name, "", task_ids);
        match run_async(self.lifecycle.create_sprint(request)) {
            Ok(sprint) => self.sprint = Some(sprint),
            Err(err) => self.last_error = Some(err),
        }
        Ok(())
    }

    /// Returns the titles of every task created so far.
    pub fn all_titles(&self) -> Vec<String> {
        let mut titles: Vec<String> = self.tasks.keys().cloned().collect();
        titles.sort();
        titles
    }
}

impl Default for SprintWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> SprintWorld {
    SprintWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

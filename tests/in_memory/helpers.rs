//! Shared wiring for in-memory integration tests.

use mockable::DefaultClock;
use rstest::fixture;
use std::sync::Arc;
use trellis::board::services::BoardService;
use trellis::identity::{Identity, StaticSessionProvider, UserId};
use trellis::notification::InMemoryNotificationSink;
use trellis::sprint::{
    adapters::memory::InMemorySprintRepository, services::SprintLifecycleService,
};
use trellis::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{ProjectId, Task, TaskKind, TaskPriority, TaskStatus},
    services::{CreateTaskRequest, TaskStoreService, TaskUpdate},
};

/// Task store over in-memory stores.
pub type Store = TaskStoreService<
    InMemoryTaskRepository,
    InMemorySprintRepository,
    InMemoryNotificationSink,
    StaticSessionProvider,
    DefaultClock,
>;

/// Sprint lifecycle over in-memory stores.
pub type Lifecycle = SprintLifecycleService<
    InMemoryTaskRepository,
    InMemorySprintRepository,
    StaticSessionProvider,
    DefaultClock,
>;

/// Board views over in-memory stores.
pub type Boards = BoardService<InMemoryTaskRepository, InMemorySprintRepository>;

/// Every service wired over one set of shared stores.
pub struct Engine {
    pub store: Store,
    pub lifecycle: Lifecycle,
    pub boards: Boards,
    pub notifications: Arc<InMemoryNotificationSink>,
    pub session: Arc<StaticSessionProvider>,
    pub project_id: ProjectId,
}

/// Provides an engine with a signed-in lead and an empty project.
#[fixture]
pub fn engine() -> Engine {
    let tasks = Arc::new(InMemoryTaskRepository::new());
    let sprints = Arc::new(InMemorySprintRepository::new());
    let notifications = Arc::new(InMemoryNotificationSink::new());
    let session = Arc::new(StaticSessionProvider::signed_in(Identity::new(
        UserId::new(),
        "lead@example.com",
    )));
    let clock = Arc::new(DefaultClock);

    Engine {
        store: TaskStoreService::new(
            Arc::clone(&tasks),
            Arc::clone(&sprints),
            Arc::clone(&notifications),
            Arc::clone(&session),
            Arc::clone(&clock),
        ),
        lifecycle: SprintLifecycleService::new(
            Arc::clone(&tasks),
            Arc::clone(&sprints),
            Arc::clone(&session),
            clock,
        ),
        boards: BoardService::new(tasks, sprints),
        notifications,
        session,
        project_id: ProjectId::new(),
    }
}

impl Engine {
    /// Creates a top-level task through the store.
    pub async fn create(&self, title: &str, kind: TaskKind, status: TaskStatus) -> Task {
        self.store
            .create_task(CreateTaskRequest::new(
                self.project_id,
                title,
                kind,
                status,
                TaskPriority::default(),
            ))
            .await
            .expect("task creation should succeed")
    }

    /// Creates a user story with story points.
    pub async fn create_story(&self, title: &str, points: u32) -> Task {
        self.store
            .create_task(
                CreateTaskRequest::new(
                    self.project_id,
                    title,
                    TaskKind::UserStory,
                    TaskStatus::Backlog,
                    TaskPriority::default(),
                )
                .with_story_points(points),
            )
            .await
            .expect("story creation should succeed")
    }

    /// Creates a sub-task of `parent` through the store.
    pub async fn create_child(&self, parent: &Task, title: &str, status: TaskStatus) -> Task {
        self.store
            .create_task(
                CreateTaskRequest::new(
                    self.project_id,
                    title,
                    TaskKind::Task,
                    status,
                    TaskPriority::default(),
                )
                .with_parent(parent.id()),
            )
            .await
            .expect("sub-task creation should succeed")
    }

    /// Moves a task to another status through the store.
    pub async fn move_to(&self, task: &Task, status: TaskStatus) -> Task {
        self.store
            .update_task(task.id(), TaskUpdate::new().with_status(status))
            .await
            .expect("status update should succeed")
    }

    /// Re-reads a task from the store.
    pub async fn fetch(&self, task: &Task) -> Task {
        self.store
            .get_task(task.id())
            .await
            .expect("task should be readable")
    }
}

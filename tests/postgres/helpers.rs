//! Shared helpers for `PostgreSQL` integration tests.
//!
//! The tests run against the database named by `TRELLIS_DATABASE_URL`. Every
//! test works in a fresh project, so tests can share one schema.

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_types::Bool;
use mockable::DefaultClock;
use std::sync::{Mutex, OnceLock, PoisonError};
use trellis::identity::UserId;
use trellis::sprint::adapters::postgres::PostgresSprintRepository;
use trellis::task::{
    adapters::postgres::PostgresTaskRepository,
    domain::{NewTask, ProjectId, Task, TaskId, TaskKind, TaskPriority, TaskStatus, TaskTitle},
};

/// Boxed error used by fallible helpers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Connection pool shared by both repositories.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Schema applied when the database has no tables yet.
pub const CREATE_SCHEMA_SQL: &str =
    include_str!("../../migrations/2026-01-05-000000_create_tasks_and_sprints/up.sql");

/// Environment variable naming the test database.
pub const DATABASE_URL_VAR: &str = "TRELLIS_DATABASE_URL";

static SCHEMA_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

#[derive(QueryableByName)]
struct SchemaPresent {
    #[diesel(sql_type = Bool)]
    present: bool,
}

/// Both repositories over one pool.
pub struct Stores {
    pub tasks: PostgresTaskRepository,
    pub sprints: PostgresSprintRepository,
    pub project_id: ProjectId,
}

/// Connects to the test database and applies the schema once.
///
/// # Errors
///
/// Returns an error when the variable is unset, the pool cannot be built, or
/// the schema cannot be applied.
pub fn connect() -> Result<Stores, BoxError> {
    let url = std::env::var(DATABASE_URL_VAR)
        .map_err(|err| format!("{DATABASE_URL_VAR} must name a test database: {err}"))?;
    let pool: PgPool = Pool::builder()
        .max_size(4)
        .build(ConnectionManager::new(url))?;
    ensure_schema(&pool)?;
    Ok(Stores {
        tasks: PostgresTaskRepository::new(pool.clone()),
        sprints: PostgresSprintRepository::new(pool),
        project_id: ProjectId::new(),
    })
}

fn ensure_schema(pool: &PgPool) -> Result<(), BoxError> {
    let _guard = SCHEMA_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    let mut connection = pool.get()?;
    let schema = diesel::sql_query("SELECT to_regclass('public.tasks') IS NOT NULL AS present")
        .get_result::<SchemaPresent>(&mut connection)?;
    if !schema.present {
        connection.batch_execute(CREATE_SCHEMA_SQL)?;
    }
    Ok(())
}

/// Builds a task in the given project.
///
/// # Errors
///
/// Returns an error when the task fails domain validation.
pub fn new_task(
    project_id: ProjectId,
    kind: TaskKind,
    status: TaskStatus,
    parent_task_id: Option<TaskId>,
) -> Result<Task, BoxError> {
    Ok(Task::new(
        NewTask {
            project_id,
            title: TaskTitle::new("Persisted task")?,
            kind,
            status,
            priority: TaskPriority::default(),
            description: None,
            story_points: None,
            deadline: None,
            parent_task_id,
            sprint_id: None,
            assignee: None,
            created_by: UserId::new(),
        },
        &DefaultClock,
    )?)
}

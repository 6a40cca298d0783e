//! `PostgreSQL` repository implementation for the sprint registry.

use super::{models::SprintRow, schema::sprints};
use crate::sprint::{
    domain::{PersistedSprintData, Sprint, SprintId, SprintName, SprintStatus},
    ports::{SprintRepository, SprintRepositoryError, SprintRepositoryResult},
};
use crate::task::domain::ProjectId;
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by sprint adapters.
pub type SprintPgPool = Pool<ConnectionManager<PgConnection>>;

/// Name of the partial unique index allowing one active sprint per project.
const ONE_ACTIVE_SPRINT_INDEX: &str = "idx_sprints_one_active_per_project";

/// `PostgreSQL`-backed sprint repository.
#[derive(Debug, Clone)]
pub struct PostgresSprintRepository {
    pool: SprintPgPool,
}

impl PostgresSprintRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: SprintPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> SprintRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> SprintRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(SprintRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(SprintRepositoryError::persistence)?
    }
}

#[async_trait]
impl SprintRepository for PostgresSprintRepository {
    async fn store(&self, sprint: &Sprint) -> SprintRepositoryResult<()> {
        let sprint_id = sprint.id();
        let project_id = sprint.project_id();
        let row = to_row(sprint);

        self.run_blocking(move |connection| {
            diesel::insert_into(sprints::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| map_write_error(err, sprint_id, project_id))?;
            Ok(())
        })
        .await
    }

    async fn update(&self, sprint: &Sprint) -> SprintRepositoryResult<()> {
        let sprint_id = sprint.id();
        let project_id = sprint.project_id();
        let row = to_row(sprint);

        self.run_blocking(move |connection| {
            let affected = diesel::update(sprints::table.find(row.id))
                .set(&row)
                .execute(connection)
                .map_err(|err| map_write_error(err, sprint_id, project_id))?;
            if affected == 0 {
                return Err(SprintRepositoryError::NotFound(sprint_id));
            }
            Ok(())
        })
        .await
    }

    async fn remove(&self, id: SprintId) -> SprintRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let affected = diesel::delete(sprints::table.find(id.into_inner()))
                .execute(connection)
                .map_err(SprintRepositoryError::persistence)?;
            if affected == 0 {
                return Err(SprintRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: SprintId) -> SprintRepositoryResult<Option<Sprint>> {
        self.run_blocking(move |connection| {
            let row = sprints::table
                .find(id.into_inner())
                .select(SprintRow::as_select())
                .first::<SprintRow>(connection)
                .optional()
                .map_err(SprintRepositoryError::persistence)?;
            row.map(row_to_sprint).transpose()
        })
        .await
    }

    async fn find_active_for_project(
        &self,
        project_id: ProjectId,
    ) -> SprintRepositoryResult<Option<Sprint>> {
        self.run_blocking(move |connection| {
            let row = sprints::table
                .filter(sprints::project_id.eq(project_id.into_inner()))
                .filter(sprints::status.eq(SprintStatus::Active.as_str()))
                .select(SprintRow::as_select())
                .first::<SprintRow>(connection)
                .optional()
                .map_err(SprintRepositoryError::persistence)?;
            row.map(row_to_sprint).transpose()
        })
        .await
    }

    async fn find_by_project(&self, project_id: ProjectId) -> SprintRepositoryResult<Vec<Sprint>> {
        self.run_blocking(move |connection| {
            sprints::table
                .filter(sprints::project_id.eq(project_id.into_inner()))
                .order(sprints::start_date.asc())
                .select(SprintRow::as_select())
                .load::<SprintRow>(connection)
                .map_err(SprintRepositoryError::persistence)?
                .into_iter()
                .map(row_to_sprint)
                .collect()
        })
        .await
    }

    async fn count_for_project(&self, project_id: ProjectId) -> SprintRepositoryResult<u64> {
        self.run_blocking(move |connection| {
            let count: i64 = sprints::table
                .filter(sprints::project_id.eq(project_id.into_inner()))
                .count()
                .get_result(connection)
                .map_err(SprintRepositoryError::persistence)?;
            u64::try_from(count).map_err(SprintRepositoryError::persistence)
        })
        .await
    }
}

fn map_write_error(
    err: DieselError,
    sprint_id: SprintId,
    project_id: ProjectId,
) -> SprintRepositoryError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
            if is_active_sprint_violation(info.as_ref()) =>
        {
            SprintRepositoryError::ActiveSprintExists(project_id)
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            SprintRepositoryError::DuplicateSprint(sprint_id)
        }
        _ => SprintRepositoryError::persistence(err),
    }
}

fn is_active_sprint_violation(info: &dyn DatabaseErrorInformation) -> bool {
    info.constraint_name()
        .is_some_and(|name| name == ONE_ACTIVE_SPRINT_INDEX)
}

fn to_row(sprint: &Sprint) -> SprintRow {
    SprintRow {
        id: sprint.id().into_inner(),
        project_id: sprint.project_id().into_inner(),
        name: sprint.name().as_str().to_owned(),
        goal: sprint.goal().to_owned(),
        start_date: sprint.start_date(),
        end_date: sprint.end_date(),
        status: sprint.status().as_str().to_owned(),
        created_at: sprint.created_at(),
        updated_at: sprint.updated_at(),
    }
}

fn row_to_sprint(row: SprintRow) -> SprintRepositoryResult<Sprint> {
    let name = SprintName::new(row.name).map_err(SprintRepositoryError::persistence)?;
    let status =
        SprintStatus::try_from(row.status.as_str()).map_err(SprintRepositoryError::persistence)?;
    Ok(Sprint::from_persisted(PersistedSprintData {
        id: SprintId::from_uuid(row.id),
        project_id: ProjectId::from_uuid(row.project_id),
        name,
        goal: row.goal,
        start_date: row.start_date,
        end_date: row.end_date,
        status,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}

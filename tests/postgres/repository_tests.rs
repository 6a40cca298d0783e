//! Task and sprint persistence against a live database.

use super::helpers::{BoxError, connect, new_task};
use mockable::DefaultClock;
use std::sync::Arc;
use trellis::identity::{Identity, StaticSessionProvider, UserId};
use trellis::sprint::{
    domain::{NewSprint, Sprint, SprintName, SprintStatus},
    ports::{SprintRepository, SprintRepositoryError},
    services::{CreateSprintRequest, SprintLifecycleService},
};
use trellis::task::{
    domain::{TaskKind, TaskStatus},
    ports::TaskRepository,
};

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires TRELLIS_DATABASE_URL"]
async fn tasks_round_trip_and_filter_by_parent() -> Result<(), BoxError> {
    let stores = connect()?;
    let story = new_task(stores.project_id, TaskKind::UserStory, TaskStatus::Backlog, None)?;
    let child = new_task(
        stores.project_id,
        TaskKind::Task,
        TaskStatus::InProgress,
        Some(story.id()),
    )?;
    stores.tasks.store(&story).await?;
    stores.tasks.store(&child).await?;

    let loaded = stores
        .tasks
        .find_by_id(child.id())
        .await?
        .ok_or("stored task should be found")?;
    assert_eq!(loaded.status(), TaskStatus::InProgress);
    assert_eq!(loaded.parent_task_id(), Some(story.id()));

    let children = stores.tasks.find_children(story.id()).await?;
    assert_eq!(children.len(), 1);
    assert_eq!(stores.tasks.find_by_project(stores.project_id).await?.len(), 2);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires TRELLIS_DATABASE_URL"]
async fn second_active_sprint_violates_the_partial_index() -> Result<(), BoxError> {
    let stores = connect()?;
    let start = |name: &str| -> Result<Sprint, BoxError> {
        Ok(Sprint::start(
            NewSprint {
                project_id: stores.project_id,
                name: SprintName::new(name)?,
                goal: String::new(),
            },
            &DefaultClock,
        ))
    };
    stores.sprints.store(&start("Sprint 1")?).await?;

    let err = stores
        .sprints
        .store(&start("Sprint 2")?)
        .await
        .err()
        .ok_or("second active sprint must be rejected")?;

    assert!(matches!(
        err,
        SprintRepositoryError::ActiveSprintExists(project) if project == stores.project_id
    ));
    assert_eq!(stores.sprints.count_for_project(stores.project_id).await?, 1);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires TRELLIS_DATABASE_URL"]
async fn sprint_closure_is_persisted() -> Result<(), BoxError> {
    let stores = connect()?;
    let tasks = Arc::new(stores.tasks);
    let sprints = Arc::new(stores.sprints);
    let session = Arc::new(StaticSessionProvider::signed_in(Identity::new(
        UserId::new(),
        "lead@example.com",
    )));
    let service = SprintLifecycleService::new(
        Arc::clone(&tasks),
        Arc::clone(&sprints),
        session,
        Arc::new(DefaultClock),
    );
    let story = new_task(stores.project_id, TaskKind::UserStory, TaskStatus::Backlog, None)?;
    let chore = new_task(stores.project_id, TaskKind::Task, TaskStatus::Backlog, None)?;
    tasks.store(&story).await?;
    tasks.store(&chore).await?;
    let child = new_task(
        stores.project_id,
        TaskKind::Task,
        TaskStatus::InProgress,
        Some(story.id()),
    )?;
    tasks.store(&child).await?;

    let sprint = service
        .create_sprint(CreateSprintRequest::new(
            stores.project_id,
            "",
            "Persist it",
            [story.id(), chore.id()],
        ))
        .await?;
    assert_eq!(tasks.find_by_sprint(sprint.id()).await?.len(), 2);

    let outcome = service.end_sprint(sprint.id()).await?;

    assert_eq!(outcome.reset_subtasks, vec![child.id()]);
    assert!(tasks.find_by_sprint(sprint.id()).await?.is_empty());
    let stored_sprint = sprints
        .find_by_id(sprint.id())
        .await?
        .ok_or("sprint should be stored")?;
    assert_eq!(stored_sprint.status(), SprintStatus::Completed);
    assert!(stored_sprint.end_date().is_some());
    let stored_child = tasks
        .find_by_id(child.id())
        .await?
        .ok_or("child should be stored")?;
    assert_eq!(stored_child.status(), TaskStatus::Todo);
    Ok(())
}

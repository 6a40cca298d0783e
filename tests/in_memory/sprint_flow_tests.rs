//! Sprint creation and closure driven through every service at once.

use super::helpers::{Engine, engine};
use rstest::rstest;
use trellis::board::domain::{BoardColumn, StoryPointsSummary};
use trellis::board::services::{ChangeOperation, RecordChange};
use trellis::failure::FailureKind;
use trellis::sprint::{
    domain::SprintStatus,
    services::{CreateSprintRequest, SprintLifecycleError},
};
use trellis::task::domain::{TaskKind, TaskStatus};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn returned_story_is_scheduled_again_and_returned_with_its_children(engine: Engine) {
    let story = engine.create_story("Login flow", 5).await;
    let first = engine
        .lifecycle
        .create_sprint(CreateSprintRequest::new(
            engine.project_id,
            "Sprint 0",
            "",
            [story.id()],
        ))
        .await
        .expect("first sprint should start");
    let open_child = engine.create_child(&story, "Form", TaskStatus::Todo).await;
    let done_child = engine.create_child(&story, "Session", TaskStatus::Done).await;
    engine
        .lifecycle
        .end_sprint(first.id())
        .await
        .expect("first sprint should end");

    let returned = engine.fetch(&story).await;
    assert_eq!(returned.status(), TaskStatus::Backlog);
    assert_eq!(returned.sprint_id(), None);

    let sprint = engine
        .lifecycle
        .create_sprint(CreateSprintRequest::new(
            engine.project_id,
            "Sprint 1",
            "",
            [story.id()],
        ))
        .await
        .expect("returned story should be schedulable");
    let scheduled = engine.fetch(&story).await;
    assert_eq!(scheduled.status(), TaskStatus::Todo);
    assert_eq!(scheduled.sprint_id(), Some(sprint.id()));

    let board = engine
        .boards
        .sprint_board(sprint.id())
        .await
        .expect("board should load");
    assert_eq!(board.column_of(&open_child), Some(BoardColumn::Todo));
    assert_eq!(board.column_of(&done_child), Some(BoardColumn::Done));
    assert_eq!(
        board.points,
        StoryPointsSummary {
            total: 5,
            completed: 0
        }
    );

    let outcome = engine
        .lifecycle
        .end_sprint(sprint.id())
        .await
        .expect("sprint should end");

    assert_eq!(outcome.sprint.status(), SprintStatus::Completed);
    assert_eq!(outcome.returned, vec![story.id()]);
    assert!(outcome.reset_subtasks.is_empty(), "open child is already todo");
    let story_after = engine.fetch(&story).await;
    assert_eq!(story_after.status(), TaskStatus::Backlog);
    assert_eq!(story_after.sprint_id(), None);
    assert_eq!(engine.fetch(&open_child).await.status(), TaskStatus::Todo);
    assert_eq!(engine.fetch(&done_child).await.status(), TaskStatus::Done);

    engine.boards.apply_change(&RecordChange::sprint(
        engine.project_id,
        sprint.id(),
        ChangeOperation::Update,
    ));
    let backlog = engine
        .boards
        .backlog(engine.project_id)
        .await
        .expect("backlog should load");
    assert!(backlog.contains(&story_after));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn closure_partitions_work_by_status(engine: Engine) {
    let finished = engine.create("Finished", TaskKind::Task, TaskStatus::Backlog).await;
    let waiting = engine.create("Waiting", TaskKind::Bug, TaskStatus::Backlog).await;
    let started = engine.create("Started", TaskKind::Task, TaskStatus::Backlog).await;
    let sprint = engine
        .lifecycle
        .create_sprint(CreateSprintRequest::new(
            engine.project_id,
            "",
            "Stabilise",
            [finished.id(), waiting.id(), started.id()],
        ))
        .await
        .expect("sprint should start");
    engine.move_to(&finished, TaskStatus::Done).await;
    engine.move_to(&started, TaskStatus::InProgress).await;

    let outcome = engine
        .lifecycle
        .end_sprint(sprint.id())
        .await
        .expect("sprint should end");

    assert_eq!(outcome.completed, vec![finished.id()]);
    assert_eq!(outcome.returned.len(), 2);
    for (task, status) in [
        (&finished, TaskStatus::Done),
        (&waiting, TaskStatus::Backlog),
        (&started, TaskStatus::Backlog),
    ] {
        let stored = engine.fetch(task).await;
        assert_eq!(stored.sprint_id(), None);
        assert_eq!(stored.status(), status);
    }

    let second = engine
        .lifecycle
        .end_sprint(sprint.id())
        .await
        .expect_err("second end must fail");
    assert!(matches!(second, SprintLifecycleError::AlreadyCompleted(id) if id == sprint.id()));
    assert_eq!(engine.fetch(&waiting).await.status(), TaskStatus::Backlog);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn one_sprint_is_active_at_a_time(engine: Engine) {
    let first_task = engine.create("First", TaskKind::Task, TaskStatus::Backlog).await;
    let second_task = engine.create("Second", TaskKind::Task, TaskStatus::Backlog).await;
    let first = engine
        .lifecycle
        .create_sprint(CreateSprintRequest::new(
            engine.project_id,
            "",
            "",
            [first_task.id()],
        ))
        .await
        .expect("first sprint should start");
    assert_eq!(first.name().as_str(), "Sprint 1");

    let blocked = engine
        .lifecycle
        .create_sprint(CreateSprintRequest::new(
            engine.project_id,
            "",
            "",
            [second_task.id()],
        ))
        .await
        .expect_err("a second active sprint is rejected");
    assert_eq!(blocked.kind(), FailureKind::InvalidState);
    assert_eq!(engine.fetch(&second_task).await.sprint_id(), None);

    engine
        .lifecycle
        .end_sprint(first.id())
        .await
        .expect("first sprint should end");
    let next = engine
        .lifecycle
        .create_sprint(CreateSprintRequest::new(
            engine.project_id,
            "",
            "",
            [second_task.id()],
        ))
        .await
        .expect("next sprint should start");

    assert_eq!(next.name().as_str(), "Sprint 2");
    let active = engine
        .lifecycle
        .active_sprint(engine.project_id)
        .await
        .expect("active sprint lookup should succeed");
    assert_eq!(active.map(|sprint| sprint.id()), Some(next.id()));
    let all = engine
        .lifecycle
        .list_sprints(engine.project_id)
        .await
        .expect("sprint listing should succeed");
    assert_eq!(all.len(), 2);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn board_reflects_sprint_changes_after_refetch(engine: Engine) {
    let chore = engine.create("Chore", TaskKind::Task, TaskStatus::Backlog).await;
    let before = engine
        .boards
        .backlog(engine.project_id)
        .await
        .expect("backlog should load");
    assert!(before.contains(&chore));

    let sprint = engine
        .lifecycle
        .create_sprint(CreateSprintRequest::new(
            engine.project_id,
            "",
            "",
            [chore.id()],
        ))
        .await
        .expect("sprint should start");
    engine.boards.apply_change(&RecordChange::task(
        engine.project_id,
        chore.id(),
        ChangeOperation::Update,
    ));

    let after = engine
        .boards
        .backlog(engine.project_id)
        .await
        .expect("backlog should reload");
    assert!(!after.contains(&chore));
    let board = engine
        .boards
        .active_board(engine.project_id)
        .await
        .expect("board should load")
        .expect("a sprint is active");
    assert_eq!(board.sprint.id(), sprint.id());
    assert_eq!(board.column(BoardColumn::Todo).len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn signed_out_users_cannot_start_sprints(engine: Engine) {
    let chore = engine.create("Chore", TaskKind::Task, TaskStatus::Backlog).await;
    engine.session.set_identity(None);

    let err = engine
        .lifecycle
        .create_sprint(CreateSprintRequest::new(
            engine.project_id,
            "",
            "",
            [chore.id()],
        ))
        .await
        .expect_err("creation requires a session");

    assert!(matches!(err, SprintLifecycleError::Unauthenticated));
    assert_eq!(err.kind(), FailureKind::Unauthenticated);
    assert!(!err.user_message().is_empty());
}

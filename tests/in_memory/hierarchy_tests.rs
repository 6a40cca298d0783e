//! Parent status propagation seen through the board views.

use super::helpers::{Engine, engine};
use rstest::rstest;
use trellis::board::domain::StoryPointsSummary;
use trellis::identity::UserId;
use trellis::notification::NotificationKind;
use trellis::sprint::services::CreateSprintRequest;
use trellis::task::{
    domain::{TaskKind, TaskPriority, TaskStatus},
    services::CreateTaskRequest,
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn story_follows_its_children_across_the_board(engine: Engine) {
    let story = engine.create_story("Checkout", 8).await;
    let sprint = engine
        .lifecycle
        .create_sprint(CreateSprintRequest::new(
            engine.project_id,
            "",
            "",
            [story.id()],
        ))
        .await
        .expect("sprint should start");
    let cart = engine.create_child(&story, "Cart", TaskStatus::Todo).await;
    let payment = engine.create_child(&story, "Payment", TaskStatus::Todo).await;

    engine.move_to(&cart, TaskStatus::InProgress).await;
    assert_eq!(engine.fetch(&story).await.status(), TaskStatus::InProgress);

    engine.move_to(&cart, TaskStatus::Done).await;
    engine.move_to(&payment, TaskStatus::Done).await;
    assert_eq!(engine.fetch(&story).await.status(), TaskStatus::Done);

    let board = engine
        .boards
        .sprint_board(sprint.id())
        .await
        .expect("board should load");
    assert_eq!(board.done.len(), 2);
    let group = board
        .stories
        .iter()
        .find(|group| group.story.id() == story.id())
        .expect("story is grouped on the board");
    assert_eq!(group.progress.to_string(), "2/2 (100%)");
    assert_eq!(
        board.points,
        StoryPointsSummary {
            total: 8,
            completed: 8
        }
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn children_of_a_deleted_story_surface_as_standalone_work(engine: Engine) {
    let story = engine.create_story("Legacy import", 3).await;
    let child = engine
        .create_child(&story, "Parse CSV", TaskStatus::Backlog)
        .await;
    assert_eq!(
        engine.fetch(&story).await.status(),
        TaskStatus::Todo,
        "backlog is never derived"
    );

    engine
        .store
        .delete_task(story.id())
        .await
        .expect("story delete should succeed");

    let orphan = engine.fetch(&child).await;
    assert_eq!(orphan.parent_task_id(), Some(story.id()));
    let backlog = engine
        .boards
        .backlog(engine.project_id)
        .await
        .expect("backlog should load");
    assert!(backlog.tasks.iter().any(|task| task.id() == child.id()));
    assert!(backlog.stories.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn assigning_a_teammate_sends_one_notification(engine: Engine) {
    let teammate = UserId::new();

    let task = engine
        .store
        .create_task(
            CreateTaskRequest::new(
                engine.project_id,
                "Review schema",
                TaskKind::Task,
                TaskStatus::Backlog,
                TaskPriority::High,
            )
            .with_assignee(teammate),
        )
        .await
        .expect("task creation should succeed");

    let sent = engine.notifications.sent();
    assert_eq!(sent.len(), 1);
    let notification = sent.first().expect("one notification");
    assert_eq!(notification.recipient, teammate);
    assert_eq!(notification.kind, NotificationKind::TaskAssigned);
    assert_eq!(engine.fetch(&task).await.assignee(), Some(teammate));
}

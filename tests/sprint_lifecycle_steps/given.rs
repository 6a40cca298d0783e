//! Given steps for sprint lifecycle BDD scenarios.

use super::world::{SprintWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use trellis::task::{
    domain::{TaskKind, TaskPriority, TaskStatus},
    services::{CreateTaskRequest, TaskUpdate},
};

fn parse_status(status: &str) -> Result<TaskStatus, eyre::Report> {
    TaskStatus::try_from(status).map_err(|err| eyre::eyre!("invalid status in scenario: {err}"))
}

#[given(r#"a backlog story "{title}" worth {points:u32} points"#)]
fn backlog_story(world: &mut SprintWorld, title: String, points: u32) -> Result<(), eyre::Report> {
    let request = CreateTaskRequest::new(
        world.project_id,
        title.clone(),
        TaskKind::UserStory,
        TaskStatus::Backlog,
        TaskPriority::default(),
    )
    .with_story_points(points);
    let story = run_async(world.store.create_task(request)).wrap_err("create backlog story")?;
    world.tasks.insert(title, story.id());
    Ok(())
}

#[given(r#"a backlog task "{title}""#)]
fn backlog_task(world: &mut SprintWorld, title: String) -> Result<(), eyre::Report> {
    let request = CreateTaskRequest::new(
        world.project_id,
        title.clone(),
        TaskKind::Task,
        TaskStatus::Backlog,
        TaskPriority::default(),
    );
    let task = run_async(world.store.create_task(request)).wrap_err("create backlog task")?;
    world.tasks.insert(title, task.id());
    Ok(())
}

#[given("an active sprint holding every backlog item")]
fn active_sprint_with_backlog(world: &mut SprintWorld) -> Result<(), eyre::Report> {
    let titles = world.all_titles();
    world.start_sprint("", &titles)?;
    world.current_sprint().map(|_| ())
}

#[given(r#"an active sprint holding "{title}""#)]
fn active_sprint_with(world: &mut SprintWorld, title: String) -> Result<(), eyre::Report> {
    world.start_sprint("", &[title])?;
    world.current_sprint().map(|_| ())
}

#[given(r#""{title}" has moved to "{status}""#)]
fn task_has_moved(
    world: &mut SprintWorld,
    title: String,
    status: String,
) -> Result<(), eyre::Report> {
    let id = world.task_id(&title)?;
    let update = TaskUpdate::new().with_status(parse_status(&status)?);
    run_async(world.store.update_task(id, update)).wrap_err("move task in scenario setup")?;
    Ok(())
}

#[given(r#""{story}" has a sub-task "{title}" in "{status}""#)]
fn story_has_subtask(
    world: &mut SprintWorld,
    story: String,
    title: String,
    status: String,
) -> Result<(), eyre::Report> {
    let parent_id = world.task_id(&story)?;
    let request = CreateTaskRequest::new(
        world.project_id,
        title.clone(),
        TaskKind::Task,
        parse_status(&status)?,
        TaskPriority::default(),
    )
    .with_parent(parent_id);
    let child = run_async(world.store.create_task(request)).wrap_err("create sub-task")?;
    world.tasks.insert(title, child.id());
    Ok(())
}

#[given("the sprint has been ended")]
fn sprint_has_been_ended(world: &mut SprintWorld) -> Result<(), eyre::Report> {
    let sprint_id = world.current_sprint()?.id();
    let outcome =
        run_async(world.lifecycle.end_sprint(sprint_id)).wrap_err("end sprint in scenario setup")?;
    world.sprint = Some(outcome.sprint);
    Ok(())
}

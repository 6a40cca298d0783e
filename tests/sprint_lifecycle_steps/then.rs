//! Then steps for sprint lifecycle BDD scenarios.

use super::world::SprintWorld;
use rstest_bdd_macros::then;
use trellis::failure::FailureKind;
use trellis::sprint::{domain::SprintStatus, services::SprintLifecycleError};
use trellis::task::domain::TaskStatus;

fn expect_status(world: &SprintWorld, title: &str, status: &str) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status)
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let task = world.fetch(title)?;
    if task.status() != expected {
        return Err(eyre::eyre!(
            "expected {title:?} to be {expected}, found {}",
            task.status()
        ));
    }
    Ok(())
}

#[then(r#"the sprint "{name}" is active"#)]
fn sprint_is_active(world: &SprintWorld, name: String) -> Result<(), eyre::Report> {
    let sprint = world.current_sprint()?;
    if sprint.name().as_str() != name {
        return Err(eyre::eyre!("expected sprint {name:?}, found {}", sprint.name()));
    }
    if sprint.status() != SprintStatus::Active {
        return Err(eyre::eyre!("expected an active sprint, found {}", sprint.status()));
    }
    Ok(())
}

#[then(r#""{title}" is "{status}" in the sprint"#)]
fn task_in_sprint(world: &SprintWorld, title: String, status: String) -> Result<(), eyre::Report> {
    expect_status(world, &title, &status)?;
    let sprint_id = world.current_sprint()?.id();
    let task = world.fetch(&title)?;
    if task.sprint_id() != Some(sprint_id) {
        return Err(eyre::eyre!("expected {title:?} to be in the sprint"));
    }
    Ok(())
}

#[then(r#""{title}" is "{status}" outside any sprint"#)]
fn task_outside_sprint(
    world: &SprintWorld,
    title: String,
    status: String,
) -> Result<(), eyre::Report> {
    expect_status(world, &title, &status)?;
    if let Some(sprint_id) = world.fetch(&title)?.sprint_id() {
        return Err(eyre::eyre!("expected {title:?} outside any sprint, found {sprint_id}"));
    }
    Ok(())
}

#[then(r#"the sub-task "{title}" is "{status}""#)]
fn subtask_status(world: &SprintWorld, title: String, status: String) -> Result<(), eyre::Report> {
    expect_status(world, &title, &status)
}

#[then("the sprint operation fails as already completed")]
fn fails_as_already_completed(world: &SprintWorld) -> Result<(), eyre::Report> {
    match world.last_error.as_ref() {
        Some(SprintLifecycleError::AlreadyCompleted(_)) => Ok(()),
        other => Err(eyre::eyre!("expected AlreadyCompleted error, got {other:?}")),
    }
}

#[then("the sprint operation fails with an invalid state")]
fn fails_with_invalid_state(world: &SprintWorld) -> Result<(), eyre::Report> {
    let err = world
        .last_error
        .as_ref()
        .ok_or_else(|| eyre::eyre!("expected the sprint operation to fail"))?;
    if err.kind() != FailureKind::InvalidState {
        return Err(eyre::eyre!("expected an invalid-state failure, got {err:?}"));
    }
    Ok(())
}

//! When steps for sprint lifecycle BDD scenarios.

use super::world::{SprintWorld, run_async};
use rstest_bdd_macros::when;

#[when(r#"a sprint named "{name}" is started with all backlog items"#)]
fn start_named_sprint(world: &mut SprintWorld, name: String) -> Result<(), eyre::Report> {
    let titles = world.all_titles();
    world.start_sprint(&name, &titles)
}

#[when(r#"a sprint is started with "{title}""#)]
fn start_sprint_with(world: &mut SprintWorld, title: String) -> Result<(), eyre::Report> {
    world.last_error = None;
    world.start_sprint("", &[title])
}

#[when("the sprint is ended")]
fn end_sprint(world: &mut SprintWorld) -> Result<(), eyre::Report> {
    let sprint_id = world.current_sprint()?.id();
    match run_async(world.lifecycle.end_sprint(sprint_id)) {
        Ok(outcome) => world.sprint = Some(outcome.sprint),
        Err(err) => world.last_error = Some(err),
    }
    Ok(())
}

//! Behaviour tests for sprint creation and closure.

#[path = "sprint_lifecycle_steps/mod.rs"]
mod sprint_lifecycle_steps_defs;

use rstest_bdd_macros::scenario;
use sprint_lifecycle_steps_defs::world::{SprintWorld, world};

#[scenario(
    path = "tests/features/sprint_lifecycle.feature",
    name = "Starting a sprint moves backlog items to todo"
)]
#[tokio::test(flavor = "multi_thread")]
async fn starting_a_sprint_moves_backlog_items_to_todo(world: SprintWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/sprint_lifecycle.feature",
    name = "Ending a sprint returns unfinished work to the backlog"
)]
#[tokio::test(flavor = "multi_thread")]
async fn ending_a_sprint_returns_unfinished_work(world: SprintWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/sprint_lifecycle.feature",
    name = "Ending a sprint twice is rejected"
)]
#[tokio::test(flavor = "multi_thread")]
async fn ending_a_sprint_twice_is_rejected(world: SprintWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/sprint_lifecycle.feature",
    name = "Only one sprint can be active"
)]
#[tokio::test(flavor = "multi_thread")]
async fn only_one_sprint_can_be_active(world: SprintWorld) {
    let _ = world;
}

//! Behaviour tests for drag and drop task ordering.

#[path = "drag_reorder_steps/mod.rs"]
mod drag_reorder_steps_defs;

use drag_reorder_steps_defs::world::{DragWorld, world};
use rstest_bdd_macros::scenario;

#[scenario(
    path = "tests/features/drag_reorder.feature",
    name = "Reorder a task within its list"
)]
#[tokio::test(flavor = "multi_thread")]
async fn reorder_within_list(world: DragWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/drag_reorder.feature",
    name = "Move a task onto another list's task"
)]
#[tokio::test(flavor = "multi_thread")]
async fn move_across_lists(world: DragWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/drag_reorder.feature",
    name = "Append a task to an empty list"
)]
#[tokio::test(flavor = "multi_thread")]
async fn append_to_empty_list(world: DragWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/drag_reorder.feature",
    name = "Keep the local order when saving fails"
)]
#[tokio::test(flavor = "multi_thread")]
async fn keep_order_on_failure(world: DragWorld) {
    let _ = world;
}

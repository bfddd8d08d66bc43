//! When steps for drag and drop BDD scenarios.

use super::world::{DragWorld, run_async};
use rstest_bdd_macros::when;
use trellis::board::reorder::{DragSession, DropTarget};

fn begin(world: &mut DragWorld, task: &str) -> Result<DragSession, eyre::Report> {
    if let Some(session) = world.session {
        return Ok(session);
    }
    let session = world.workspace.drag_start(world.task(task)?)?;
    world.session = Some(session);
    Ok(session)
}

#[when(r#"task "{active}" is dragged over task "{over}""#)]
fn dragged_over_task(
    world: &mut DragWorld,
    active: String,
    over: String,
) -> Result<(), eyre::Report> {
    let session = begin(world, &active)?;
    let target = DropTarget::Task(world.task(&over)?);
    let result = run_async(world.workspace.drag_over(session, target)).map(|_| ());
    world.last_result = Some(result);
    Ok(())
}

#[when(r#"task "{active}" is dragged over list "{list}""#)]
fn dragged_over_list(
    world: &mut DragWorld,
    active: String,
    list: String,
) -> Result<(), eyre::Report> {
    let session = begin(world, &active)?;
    let target = DropTarget::List(world.list(&list)?);
    let result = run_async(world.workspace.drag_over(session, target)).map(|_| ());
    world.last_result = Some(result);
    Ok(())
}

#[when(r#"task "{active}" is dropped on task "{over}""#)]
fn dropped_on_task(
    world: &mut DragWorld,
    active: String,
    over: String,
) -> Result<(), eyre::Report> {
    let session = begin(world, &active)?;
    let target = DropTarget::Task(world.task(&over)?);
    let result = run_async(world.workspace.drag_end(session, target)).map(|_| ());
    world.session = None;
    world.last_result = Some(result);
    Ok(())
}

#[when("the drag ends outside any target")]
fn drag_ends_outside(world: &mut DragWorld) -> Result<(), eyre::Report> {
    let session = world
        .session
        .take()
        .ok_or_else(|| eyre::eyre!("no drag in progress"))?;
    let result = run_async(world.workspace.drag_end(session, DropTarget::Nowhere)).map(|_| ());
    world.last_result = Some(result);
    Ok(())
}

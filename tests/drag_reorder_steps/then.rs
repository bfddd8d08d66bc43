//! Then steps for drag and drop BDD scenarios.

use super::world::{DragWorld, run_async, split_names};
use rstest_bdd_macros::then;
use trellis::board::services::WorkspaceError;

fn layout(world: &DragWorld, list: &str) -> Result<Vec<String>, eyre::Report> {
    let list_id = world.list(list)?;
    run_async(world.workspace.settle());
    Ok(world.workspace.store().read(|store| {
        store
            .all_tasks_in_list(list_id)
            .iter()
            .map(|task| format!("{}@{}", task.title, task.position))
            .collect()
    }))
}

#[then(r#"list "{list}" shows "{expected}""#)]
fn list_shows(world: &DragWorld, list: String, expected: String) -> Result<(), eyre::Report> {
    let actual = layout(world, &list)?;
    let wanted = split_names(&expected);
    if actual != wanted {
        return Err(eyre::eyre!(
            "list {list}: expected {wanted:?}, found {actual:?}"
        ));
    }
    Ok(())
}

#[then(r#"list "{list}" shows no tasks"#)]
fn list_shows_nothing(world: &DragWorld, list: String) -> Result<(), eyre::Report> {
    let actual = layout(world, &list)?;
    if !actual.is_empty() {
        return Err(eyre::eyre!("list {list}: expected no tasks, found {actual:?}"));
    }
    Ok(())
}

#[then("the workspace reports a persistence error")]
fn reports_persistence_error(world: &DragWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing drag result"))?;
    if !matches!(result, Err(WorkspaceError::Persistence(_))) {
        return Err(eyre::eyre!("expected persistence error, got {result:?}"));
    }
    let message = world
        .workspace
        .store()
        .read(|store| store.view().last_error().map(str::to_owned));
    if message.is_none() {
        return Err(eyre::eyre!("expected an error message in the view state"));
    }
    Ok(())
}

//! Given steps for drag and drop BDD scenarios.

use super::world::{DragWorld, run_async, split_names};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use trellis::board::domain::BoardDraft;

#[given(r#"a board with lists "{first}" and "{second}""#)]
fn board_with_lists(
    world: &mut DragWorld,
    first: String,
    second: String,
) -> Result<(), eyre::Report> {
    run_async(world.workspace.start()).wrap_err("start workspace")?;
    let board = run_async(world.workspace.create_board(BoardDraft::new("Scenario board")?))
        .wrap_err("create board")?;
    run_async(world.workspace.select_board(board.id)).wrap_err("select board")?;
    for title in [first, second] {
        let list = run_async(world.workspace.create_list(&title)).wrap_err("create list")?;
        world.lists.insert(title, list.id);
    }
    Ok(())
}

#[given(r#"list "{list}" holds tasks "{titles}""#)]
fn list_holds_tasks(
    world: &mut DragWorld,
    list: String,
    titles: String,
) -> Result<(), eyre::Report> {
    let list_id = world.list(&list)?;
    for title in split_names(&titles) {
        let task = run_async(world.workspace.create_task(list_id, title, ""))
            .wrap_err_with(|| format!("create task {title}"))?;
        world.tasks.insert(title.to_owned(), task.id);
    }
    run_async(world.workspace.settle());
    Ok(())
}

#[given("the backend rejects the next request")]
fn backend_rejects_next_request(world: &mut DragWorld) {
    world.backend.fail_next_call("write refused");
}

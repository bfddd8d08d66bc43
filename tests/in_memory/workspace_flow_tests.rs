//! Single-client flows against the in-memory backend.

use super::helpers::{Workspace, layout, pairs, workspace};
use rstest::rstest;
use trellis::board::{
    domain::{BoardDraft, BoardPatch, Priority, TaskFilter, TaskPatch},
    reorder::DropTarget,
    store::LoadState,
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn board_lifecycle_from_creation_to_reorder(workspace: Workspace) -> eyre::Result<()> {
    workspace.start().await?;
    let board = workspace
        .create_board(BoardDraft::new("Roadmap")?.with_description("Q3 goals"))
        .await?;
    workspace.select_board(board.id).await?;
    let backlog = workspace.create_list("Backlog").await?;
    let first = workspace.create_task(backlog.id, "Design", "").await?;
    workspace.create_task(backlog.id, "Build", "").await?;
    let last = workspace.create_task(backlog.id, "Ship", "").await?;
    workspace.settle().await;

    let session = workspace.drag_start(last.id)?;
    workspace.drag_end(session, DropTarget::Task(first.id)).await?;
    workspace.settle().await;

    assert_eq!(
        layout(&workspace, backlog.id),
        pairs(&[("Ship", 0), ("Design", 1), ("Build", 2)])
    );
    let state = workspace.store().read(|store| store.view().load_state().clone());
    assert_eq!(state, LoadState::Ready);
    workspace.shutdown();
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn renamed_board_is_visible_in_the_board_list(workspace: Workspace) -> eyre::Result<()> {
    workspace.start().await?;
    let board = workspace.create_board(BoardDraft::new("Draft")?).await?;

    workspace
        .update_board(board.id, BoardPatch::default().with_title("Final"))
        .await?;
    workspace.settle().await;

    let titles: Vec<String> = workspace.store().read(|store| {
        store
            .boards()
            .iter()
            .map(|entry| entry.title.clone())
            .collect()
    });
    assert_eq!(titles, ["Final"]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn search_and_priority_filters_compose(workspace: Workspace) -> eyre::Result<()> {
    workspace.start().await?;
    let board = workspace.create_board(BoardDraft::new("Roadmap")?).await?;
    workspace.select_board(board.id).await?;
    let todo = workspace.create_list("Todo").await?;
    let bug = workspace.create_task(todo.id, "Fix bug", "").await?;
    let docs = workspace.create_task(todo.id, "Write docs", "").await?;
    workspace.settle().await;
    workspace
        .update_task(bug.id, TaskPatch::default().with_priority(Priority::High))
        .await?;
    workspace
        .update_task(docs.id, TaskPatch::default().with_priority(Priority::Low))
        .await?;
    workspace.settle().await;

    let visible = |ws: &Workspace| -> Vec<String> {
        ws.store().read(|store| {
            store
                .tasks_for_list(todo.id)
                .iter()
                .map(|task| task.title.clone())
                .collect()
        })
    };

    workspace.set_search_query("bug");
    assert_eq!(visible(&workspace), ["Fix bug"]);
    workspace.set_search_query("");
    workspace.set_filters(TaskFilter::default().with_priority(Priority::Low));
    assert_eq!(visible(&workspace), ["Write docs"]);
    workspace.set_search_query("bug");
    assert!(visible(&workspace).is_empty());
    workspace.clear_filters();
    assert_eq!(visible(&workspace), ["Fix bug", "Write docs"]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_a_list_cascades_locally_and_remotely(workspace: Workspace) -> eyre::Result<()> {
    workspace.start().await?;
    let board = workspace.create_board(BoardDraft::new("Roadmap")?).await?;
    workspace.select_board(board.id).await?;
    let doomed = workspace.create_list("Doomed").await?;
    let card = workspace.create_task(doomed.id, "Card", "").await?;
    workspace.add_checklist_item(card.id, "step").await?;
    workspace.settle().await;

    workspace.delete_list(doomed.id).await?;
    workspace.settle().await;

    let (tasks, items) = workspace.store().read(|store| {
        (
            store.all_tasks_in_list(doomed.id).len(),
            store.checklist_items_for_task(card.id).len(),
        )
    });
    assert_eq!((tasks, items), (0, 0));

    workspace.select_board(board.id).await?;
    workspace.load_task_details(card.id).await?;
    let reloaded = workspace
        .store()
        .read(|store| store.checklist_items_for_task(card.id).len());
    assert_eq!(reloaded, 0);
    Ok(())
}

//! Two clients converging through the shared change feed.

use super::helpers::{Clients, clients, layout, open_shared_board, pairs, settle_both};
use rstest::rstest;
use std::time::Duration;
use trellis::board::{
    domain::{BoardDraft, Member, Priority, Task, TaskPatch},
    reorder::DropTarget,
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn created_task_reaches_the_other_client(clients: Clients) -> eyre::Result<()> {
    let shared = open_shared_board(&clients).await?;

    let card = clients
        .alice
        .create_task(shared.todo.id, "Card", "from alice")
        .await?;
    settle_both(&clients).await;

    let seen = clients
        .bob
        .store()
        .read(|store| store.get::<Task>(card.id).cloned());
    assert_eq!(seen, Some(card));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn cross_list_drag_converges_on_both_clients(clients: Clients) -> eyre::Result<()> {
    let shared = open_shared_board(&clients).await?;
    let moving = clients.alice.create_task(shared.todo.id, "T", "").await?;
    clients.alice.create_task(shared.done.id, "A", "").await?;
    clients.alice.create_task(shared.done.id, "B", "").await?;
    let u = clients.alice.create_task(shared.done.id, "U", "").await?;
    settle_both(&clients).await;

    let session = clients.bob.drag_start(moving.id)?;
    clients.bob.drag_over(session, DropTarget::Task(u.id)).await?;
    clients.bob.drag_end(session, DropTarget::Nowhere).await?;
    settle_both(&clients).await;

    let expected = pairs(&[("A", 0), ("B", 1), ("T", 2), ("U", 3)]);
    assert_eq!(layout(&clients.bob, shared.done.id), expected);
    assert_eq!(layout(&clients.alice, shared.done.id), expected);
    assert!(layout(&clients.alice, shared.todo.id).is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn remote_update_overwrites_local_copy(clients: Clients) -> eyre::Result<()> {
    let shared = open_shared_board(&clients).await?;
    let card = clients
        .alice
        .create_task(shared.todo.id, "Draft", "")
        .await?;
    settle_both(&clients).await;

    clients
        .bob
        .update_task(card.id, TaskPatch::default().with_priority(Priority::High))
        .await?;
    settle_both(&clients).await;

    let merged = clients
        .alice
        .store()
        .read(|store| store.get::<Task>(card.id).cloned())
        .ok_or_else(|| eyre::eyre!("task missing on alice"))?;
    assert_eq!(merged.title, "Draft");
    assert_eq!(merged.priority, Priority::High);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn remote_list_delete_cascades(clients: Clients) -> eyre::Result<()> {
    let shared = open_shared_board(&clients).await?;
    let card = clients.alice.create_task(shared.todo.id, "Card", "").await?;
    settle_both(&clients).await;

    clients.alice.delete_list(shared.todo.id).await?;
    settle_both(&clients).await;

    let (list_gone, task_gone) = clients.bob.store().read(|store| {
        (
            store.lists_for_board(shared.board.id).len() == 1,
            store.get::<Task>(card.id).is_none(),
        )
    });
    assert!(list_gone && task_gone);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn other_board_changes_do_not_leak(clients: Clients) -> eyre::Result<()> {
    let shared = open_shared_board(&clients).await?;
    let elsewhere = clients.bob.create_board(BoardDraft::new("Elsewhere")?).await?;
    clients.bob.select_board(elsewhere.id).await?;

    let card = clients.alice.create_task(shared.todo.id, "Hidden", "").await?;
    settle_both(&clients).await;

    let (leaked, boards) = clients.bob.store().read(|store| {
        (store.get::<Task>(card.id).is_some(), store.boards().len())
    });
    assert!(!leaked);
    assert_eq!(boards, 2);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn members_are_shared_across_boards(clients: Clients) -> eyre::Result<()> {
    clients.alice.start().await?;
    clients.bob.start().await?;

    let member = clients
        .alice
        .create_member("Grace", Some("grace@example.com"), "#0af")
        .await?;
    settle_both(&clients).await;

    let seen = clients
        .bob
        .store()
        .read(|store| store.get::<Member>(member.id).cloned());
    assert_eq!(seen, Some(member));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn dropped_feed_recovers_and_resumes(clients: Clients) -> eyre::Result<()> {
    let shared = open_shared_board(&clients).await?;
    let before = clients.feed.subscriber_count();

    clients.feed.disconnect_all("network blip").await;
    settle_both(&clients).await;
    let interrupted = clients
        .bob
        .store()
        .read(|store| store.view().last_error().map(str::to_owned));
    assert!(interrupted.is_some_and(|message| message.contains("network blip")));

    let mut recovered = false;
    for _ in 0..200 {
        if clients.feed.subscriber_count() == before {
            recovered = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert!(recovered, "subscriptions were not re-established");

    let card = clients.alice.create_task(shared.todo.id, "After", "").await?;
    settle_both(&clients).await;
    assert!(
        clients
            .bob
            .store()
            .read(|store| store.get::<Task>(card.id).is_some())
    );
    Ok(())
}

//! Shared fixtures for in-memory integration tests.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use trellis::board::{
    adapters::memory::{InMemoryBoardBackend, InMemoryChangeFeed},
    domain::{Board, BoardDraft, List, ListId},
    services::BoardWorkspace,
};
use trellis::config::{EngineConfig, FeedConfig};

/// Backend type shared by the integration tests.
pub type Backend = InMemoryBoardBackend<DefaultClock>;

/// Workspace type shared by the integration tests.
pub type Workspace = BoardWorkspace<Backend, InMemoryChangeFeed, DefaultClock>;

/// Two clients sharing one backend and one change feed.
pub struct Clients {
    pub backend: Arc<Backend>,
    pub feed: InMemoryChangeFeed,
    pub alice: Workspace,
    pub bob: Workspace,
}

/// Config with millisecond reconnect delays.
#[must_use]
pub fn fast_config() -> EngineConfig {
    EngineConfig {
        feed: FeedConfig {
            reconnect_initial_delay_ms: 1,
            reconnect_max_delay_ms: 10,
            reconnect_max_attempts: 0,
            queue_capacity: 64,
        },
        ..EngineConfig::default()
    }
}

fn client(backend: &Arc<Backend>, feed: &InMemoryChangeFeed) -> Workspace {
    BoardWorkspace::new(
        Arc::clone(backend),
        Arc::new(feed.clone()),
        Arc::new(DefaultClock),
        &fast_config(),
    )
}

/// Provides two unstarted clients over a fresh backend.
#[fixture]
pub fn clients() -> Clients {
    let feed = InMemoryChangeFeed::new();
    let backend = Arc::new(InMemoryBoardBackend::new(feed.clone(), DefaultClock));
    Clients {
        alice: client(&backend, &feed),
        bob: client(&backend, &feed),
        backend,
        feed,
    }
}

/// Provides a single unstarted client.
#[fixture]
pub fn workspace() -> Workspace {
    let feed = InMemoryChangeFeed::new();
    let backend = Arc::new(InMemoryBoardBackend::new(feed.clone(), DefaultClock));
    client(&backend, &feed)
}

/// A board with two lists that both clients have open.
pub struct SharedBoard {
    pub board: Board,
    pub todo: List,
    pub done: List,
}

/// Starts both clients, creates a board with "Todo" and "Done" lists, and
/// selects it on both sides.
///
/// # Errors
///
/// Returns an error if any workspace intent fails.
pub async fn open_shared_board(clients: &Clients) -> eyre::Result<SharedBoard> {
    clients.alice.start().await?;
    clients.bob.start().await?;
    let board = clients
        .alice
        .create_board(BoardDraft::new("Launch")?)
        .await?;
    clients.alice.select_board(board.id).await?;
    let todo = clients.alice.create_list("Todo").await?;
    let done = clients.alice.create_list("Done").await?;
    clients.bob.select_board(board.id).await?;
    settle_both(clients).await;
    Ok(SharedBoard { board, todo, done })
}

/// Drains both clients' notification queues.
pub async fn settle_both(clients: &Clients) {
    clients.alice.settle().await;
    clients.bob.settle().await;
}

/// Returns `(title, position)` pairs of a list as `workspace` sees it.
#[must_use]
pub fn layout(workspace: &Workspace, list_id: ListId) -> Vec<(String, i64)> {
    workspace.store().read(|store| {
        store
            .all_tasks_in_list(list_id)
            .iter()
            .map(|task| (task.title.clone(), task.position))
            .collect()
    })
}

/// Builds expected `(title, position)` pairs.
#[must_use]
pub fn pairs(items: &[(&str, i64)]) -> Vec<(String, i64)> {
    items
        .iter()
        .map(|(title, position)| ((*title).to_owned(), *position))
        .collect()
}

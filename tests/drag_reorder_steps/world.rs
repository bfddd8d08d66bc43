//! Shared world state for drag and drop BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use trellis::board::{
    adapters::memory::{InMemoryBoardBackend, InMemoryChangeFeed},
    domain::{ListId, TaskId},
    reorder::DragSession,
    services::{BoardWorkspace, WorkspaceError},
};
use trellis::config::EngineConfig;

/// Workspace type used by the BDD world.
pub type TestWorkspace =
    BoardWorkspace<InMemoryBoardBackend<DefaultClock>, InMemoryChangeFeed, DefaultClock>;

/// Scenario world for drag and drop behaviour tests.
pub struct DragWorld {
    pub backend: Arc<InMemoryBoardBackend<DefaultClock>>,
    pub workspace: TestWorkspace,
    pub lists: HashMap<String, ListId>,
    pub tasks: HashMap<String, TaskId>,
    pub session: Option<DragSession>,
    pub last_result: Option<Result<(), WorkspaceError>>,
}

impl DragWorld {
    /// Creates a world over a fresh in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        let feed = InMemoryChangeFeed::new();
        let backend = Arc::new(InMemoryBoardBackend::new(feed.clone(), DefaultClock));
        let workspace = BoardWorkspace::new(
            Arc::clone(&backend),
            Arc::new(feed),
            Arc::new(DefaultClock),
            &EngineConfig::default(),
        );
        Self {
            backend,
            workspace,
            lists: HashMap::new(),
            tasks: HashMap::new(),
            session: None,
            last_result: None,
        }
    }

    /// Looks up a list created by an earlier step.
    ///
    /// # Errors
    ///
    /// Returns an error when no list has that title.
    pub fn list(&self, title: &str) -> eyre::Result<ListId> {
        self.lists
            .get(title)
            .copied()
            .ok_or_else(|| eyre::eyre!("unknown list {title}"))
    }

    /// Looks up a task created by an earlier step.
    ///
    /// # Errors
    ///
    /// Returns an error when no task has that title.
    pub fn task(&self, title: &str) -> eyre::Result<TaskId> {
        self.tasks
            .get(title)
            .copied()
            .ok_or_else(|| eyre::eyre!("unknown task {title}"))
    }
}

impl Default for DragWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> DragWorld {
    DragWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// Splits a comma-separated step argument.
#[must_use]
pub fn split_names(names: &str) -> Vec<&str> {
    names
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .collect()
}

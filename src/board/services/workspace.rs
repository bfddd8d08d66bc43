//! Workspace lifecycle, board selection, and the shared intent plumbing.

use crate::board::{
    domain::{
        Board, BoardDomainError, BoardId, BoardScope, ChecklistItem, Comment, DueStatus,
        EntityKind, Label, List, Member, Positioned, Record, Task, TaskFilter, TaskLabel,
    },
    feed::{FeedSupervisor, FeedTopic},
    ports::{
        BackendError, BackendResult, BoardBackend, ChangeFeed, ChangeFeedError, EntityBackend,
        PositionBackend,
    },
    reorder::PositionPlan,
    store::{EntityStore, LoadState, SharedStore, StoreEvent, Stored},
};
use crate::config::EngineConfig;
use mockable::Clock;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Kinds whose subscriptions follow the selected board.
const BOARD_SCOPED_KINDS: [EntityKind; 6] = [
    EntityKind::List,
    EntityKind::Task,
    EntityKind::Label,
    EntityKind::TaskLabel,
    EntityKind::ChecklistItem,
    EntityKind::Comment,
];

/// Kinds subscribed for the whole session.
const GLOBAL_KINDS: [EntityKind; 2] = [EntityKind::Board, EntityKind::Member];

/// Service-level errors for workspace intents.
#[derive(Debug, Error)]
pub enum WorkspaceError {
    /// Input failed validation; nothing changed.
    #[error(transparent)]
    Validation(#[from] BoardDomainError),

    /// The backend rejected the request. Optimistic changes stay applied.
    #[error("persistence failed: {0}")]
    Persistence(#[from] BackendError),

    /// A change feed subscription could not be established.
    #[error("live updates failed: {0}")]
    Reconciliation(#[from] ChangeFeedError),

    /// The addressed record is not loaded.
    #[error("{kind} record not loaded: {id}")]
    NotFound {
        /// Kind of the missing record.
        kind: EntityKind,
        /// Identifier of the missing record.
        id: String,
    },

    /// The intent needs a selected board.
    #[error("no board selected")]
    NoBoardSelected,
}

impl WorkspaceError {
    pub(super) fn not_loaded(kind: EntityKind, id: impl fmt::Display) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

/// Result type for workspace intents.
pub type WorkspaceResult<T> = Result<T, WorkspaceError>;

/// Orchestrates the entity store, the backend, and the change feed.
///
/// Every intent validates its input first, then applies an optimistic store
/// mutation, then issues one backend request. Creates are the exception:
/// identifiers come from the backend, so the returned record is applied
/// when the call completes. Backend failures are logged, published to the
/// store's error channel, and returned; optimistic changes are not rolled
/// back.
pub struct BoardWorkspace<B, F, C>
where
    B: BoardBackend,
    F: ChangeFeed,
    C: Clock + Send + Sync,
{
    pub(super) store: SharedStore,
    pub(super) backend: Arc<B>,
    pub(super) feeds: FeedSupervisor<F>,
    pub(super) clock: Arc<C>,
}

impl<B, F, C> Clone for BoardWorkspace<B, F, C>
where
    B: BoardBackend,
    F: ChangeFeed,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            backend: Arc::clone(&self.backend),
            feeds: self.feeds.clone(),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<B, F, C> BoardWorkspace<B, F, C>
where
    B: BoardBackend,
    F: ChangeFeed,
    C: Clock + Send + Sync,
{
    /// Creates a workspace over an empty store. Nothing is loaded or
    /// subscribed until [`BoardWorkspace::start`].
    #[must_use]
    pub fn new(backend: Arc<B>, feed: Arc<F>, clock: Arc<C>, config: &EngineConfig) -> Self {
        let store = SharedStore::default();
        let feeds = FeedSupervisor::new(feed, store.clone(), &config.feed);
        Self {
            store,
            backend,
            feeds,
            clock,
        }
    }

    /// Returns the shared store for rendering.
    #[must_use]
    pub const fn store(&self) -> &SharedStore {
        &self.store
    }

    /// Returns the change feed supervisor.
    #[must_use]
    pub const fn feeds(&self) -> &FeedSupervisor<F> {
        &self.feeds
    }

    /// Loads boards, templates, and members, then subscribes to the
    /// session-wide topics.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::Persistence`] when an initial load fails;
    /// the store's load state becomes [`LoadState::Failed`]. Subscription
    /// failures are reported but do not fail startup.
    pub async fn start(&self) -> WorkspaceResult<()> {
        let loaded = async {
            self.load_boards().await?;
            self.load_templates().await?;
            self.load_members().await
        }
        .await;
        if let Err(err) = loaded {
            self.store.set_load_state(LoadState::Failed(err.to_string()));
            return Err(err);
        }
        for kind in GLOBAL_KINDS {
            self.subscribe(FeedTopic::global(kind)).await;
        }
        info!("workspace started");
        Ok(())
    }

    /// Selects `board_id` and loads its lists, tasks, labels, and label
    /// associations, replacing the previous board's subscriptions.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::Persistence`] when a load fails; the load
    /// state becomes [`LoadState::Failed`] and no board-scoped subscription
    /// is opened.
    pub async fn select_board(&self, board_id: BoardId) -> WorkspaceResult<()> {
        self.feeds.unsubscribe_board_scoped();
        self.store.apply(StoreEvent::ViewChanged, |store| {
            store.select_board(Some(board_id));
            store.set_load_state(LoadState::Loading);
            store.clear_error();
            store.replace_all::<ChecklistItem>(Vec::new());
            store.replace_all::<Comment>(Vec::new());
        });

        if let Err(err) = self.load_board_contents(board_id).await {
            warn!(%board_id, error = %err, "board load failed");
            self.store.set_load_state(LoadState::Failed(err.to_string()));
            return Err(err.into());
        }

        for kind in BOARD_SCOPED_KINDS {
            self.subscribe(FeedTopic::board(kind, board_id)).await;
        }
        self.store.set_load_state(LoadState::Ready);
        info!(%board_id, "board selected");
        Ok(())
    }

    /// Waits until every change notification queued so far is applied.
    pub async fn settle(&self) {
        self.feeds.settle().await;
    }

    /// Drops every subscription.
    pub fn shutdown(&self) {
        self.feeds.shutdown();
    }

    /// Sets the search text.
    pub fn set_search_query(&self, query: impl Into<String>) {
        self.store.set_search_query(query);
    }

    /// Replaces the filter predicate.
    pub fn set_filters(&self, filters: TaskFilter) {
        self.store.set_filters(filters);
    }

    /// Clears search text and filters.
    pub fn clear_filters(&self) {
        self.store.clear_filters();
    }

    /// Classifies `task` against the workspace clock.
    #[must_use]
    pub fn due_status(&self, task: &Task) -> DueStatus {
        task.due_status(&*self.clock)
    }

    pub(super) fn current_board_id(&self) -> WorkspaceResult<BoardId> {
        self.store
            .read(|store| store.view().current_board())
            .ok_or(WorkspaceError::NoBoardSelected)
    }

    async fn load_board_contents(&self, board_id: BoardId) -> BackendResult<()> {
        let lists = <B as EntityBackend<List>>::list(&*self.backend, &board_id).await?;
        let tasks = <B as EntityBackend<Task>>::list(&*self.backend, &board_id).await?;
        let labels = <B as EntityBackend<Label>>::list(&*self.backend, &board_id).await?;
        let joins = self.backend.list_task_labels(board_id).await?;
        info!(
            %board_id,
            lists = lists.len(),
            tasks = tasks.len(),
            labels = labels.len(),
            "board contents loaded"
        );
        self.store.apply(StoreEvent::Changed(EntityKind::Task), |store| {
            store.replace_all(lists);
            store.replace_all(tasks);
            store.replace_all(labels);
            store.replace_all::<TaskLabel>(joins);
        });
        Ok(())
    }

    /// Loads working boards, keeping templates.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::Persistence`] when the backend fails.
    pub async fn load_boards(&self) -> WorkspaceResult<()> {
        let boards = self.loaded(
            "load boards",
            <B as EntityBackend<Board>>::list(&*self.backend, &BoardScope::Active).await,
        )?;
        info!(count = boards.len(), "boards loaded");
        self.store
            .replace_where(|board: &Board| !board.is_template, boards);
        Ok(())
    }

    /// Loads template boards, keeping working boards.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::Persistence`] when the backend fails.
    pub async fn load_templates(&self) -> WorkspaceResult<()> {
        let templates = self.loaded(
            "load templates",
            <B as EntityBackend<Board>>::list(&*self.backend, &BoardScope::Templates).await,
        )?;
        info!(count = templates.len(), "templates loaded");
        self.store
            .replace_where(|board: &Board| board.is_template, templates);
        Ok(())
    }

    /// Loads every member.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::Persistence`] when the backend fails.
    pub async fn load_members(&self) -> WorkspaceResult<()> {
        let members = self.loaded(
            "load members",
            <B as EntityBackend<Member>>::list(&*self.backend, &()).await,
        )?;
        info!(count = members.len(), "members loaded");
        self.store.replace_all(members);
        Ok(())
    }

    async fn subscribe(&self, topic: FeedTopic) {
        if let Err(err) = self.feeds.subscribe(topic).await {
            debug!(%topic, error = %err, "subscription deferred to reconnect");
        }
    }

    fn loaded<T>(&self, action: &str, result: BackendResult<T>) -> WorkspaceResult<T> {
        result.map_err(|err| {
            warn!(action, error = %err, "backend load failed");
            self.store.report_error(format!("{action} failed: {err}"));
            WorkspaceError::Persistence(err)
        })
    }

    pub(super) fn persisted<T>(
        &self,
        action: &str,
        result: BackendResult<T>,
    ) -> WorkspaceResult<T> {
        result.map_err(|err| {
            warn!(action, error = %err, "backend request failed; keeping local change");
            self.store.report_error(format!("{action} failed: {err}"));
            WorkspaceError::Persistence(err)
        })
    }

    /// Creates a record through the backend and applies the returned copy.
    pub(super) async fn create_record<E>(
        &self,
        action: &str,
        draft: E::Draft,
    ) -> WorkspaceResult<E>
    where
        E: Stored + Record,
        B: EntityBackend<E>,
    {
        let created = self.persisted(
            action,
            <B as EntityBackend<E>>::create(&*self.backend, draft).await,
        )?;
        debug!(entity = %E::KIND, id = %created.id(), "created");
        self.store.upsert(created.clone());
        Ok(created)
    }

    /// Applies `patch` to the loaded record, then persists it.
    pub(super) async fn update_record<E>(
        &self,
        action: &str,
        id: E::Id,
        patch: E::Patch,
    ) -> WorkspaceResult<E>
    where
        E: Stored + Record,
        B: EntityBackend<E>,
    {
        let found = self.store.apply(StoreEvent::Changed(E::KIND), |store| {
            let mut record = store.get::<E>(id)?.clone();
            record.apply_patch(&patch);
            store.upsert(record);
            Some(())
        });
        found.ok_or_else(|| WorkspaceError::not_loaded(E::KIND, id))?;
        let saved = self.persisted(
            action,
            <B as EntityBackend<E>>::update(&*self.backend, id, patch).await,
        )?;
        self.store.upsert(saved.clone());
        Ok(saved)
    }

    /// Removes the record locally (with cascade), then deletes it remotely.
    pub(super) async fn delete_record<E>(&self, action: &str, id: E::Id) -> WorkspaceResult<()>
    where
        E: Stored + Record,
        B: EntityBackend<E>,
    {
        self.store.remove::<E>(id);
        self.persisted(action, <B as EntityBackend<E>>::delete(&*self.backend, id).await)
    }

    /// Applies `plan` through `plan_with` under one store lock, then sends
    /// the batch to the backend.
    pub(super) async fn reposition<E>(
        &self,
        action: &str,
        plan_with: impl FnOnce(&EntityStore) -> PositionPlan<E>,
    ) -> WorkspaceResult<PositionPlan<E>>
    where
        E: Stored + Record + Positioned,
        B: PositionBackend<E>,
    {
        let plan = self.store.reposition(plan_with);
        if plan.is_empty() {
            return Ok(plan);
        }
        debug!(entity = %E::KIND, moves = plan.len(), action, "persisting positions");
        let batch = plan.updates().to_vec();
        self.persisted(
            action,
            <B as PositionBackend<E>>::update_positions(&*self.backend, batch).await,
        )?;
        Ok(plan)
    }
}

//! Thread-safe handle over [`EntityStore`] with change notifications.

use super::{EntityStore, LoadState, Stored};
use crate::board::domain::{BoardId, EntityKind, Positioned, PositionUpdateOf, TaskFilter};
use crate::board::reorder::PositionPlan;
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::broadcast;
use tracing::trace;

const EVENT_CAPACITY: usize = 256;

/// Notification emitted after the store changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    /// The collection of the given kind changed.
    Changed(EntityKind),
    /// Search, filters, selection, load state, or the error channel changed.
    ViewChanged,
}

/// Cloneable handle to the shared entity store.
///
/// Every clone observes the same store. Writers hold the lock only for the
/// duration of one primitive, so readers always see a state in which the
/// ordering invariants hold.
#[derive(Debug, Clone)]
pub struct SharedStore {
    inner: Arc<RwLock<EntityStore>>,
    events: broadcast::Sender<StoreEvent>,
}

impl Default for SharedStore {
    fn default() -> Self {
        Self::new(EntityStore::default())
    }
}

impl SharedStore {
    /// Wraps `store` in a shared handle.
    #[must_use]
    pub fn new(store: EntityStore) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(RwLock::new(store)),
            events,
        }
    }

    /// Subscribes to change notifications.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    /// Runs `f` against a consistent snapshot of the store.
    #[must_use]
    pub fn read<T>(&self, f: impl FnOnce(&EntityStore) -> T) -> T {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    /// Clones the current store contents.
    #[must_use]
    pub fn snapshot(&self) -> EntityStore {
        self.read(Clone::clone)
    }

    /// Runs `f` with exclusive access and announces `event` afterwards.
    pub(crate) fn apply<T>(&self, event: StoreEvent, f: impl FnOnce(&mut EntityStore) -> T) -> T {
        let outcome = {
            let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
            f(&mut guard)
        };
        self.announce(event);
        outcome
    }

    /// See [`EntityStore::replace_all`].
    pub fn replace_all<E: Stored>(&self, records: Vec<E>) {
        self.apply(StoreEvent::Changed(E::KIND), |store| {
            store.replace_all(records);
        });
    }

    /// See [`EntityStore::replace_where`].
    pub fn replace_where<E: Stored>(&self, in_scope: impl Fn(&E) -> bool, records: Vec<E>) {
        self.apply(StoreEvent::Changed(E::KIND), |store| {
            store.replace_where(in_scope, records);
        });
    }

    /// See [`EntityStore::upsert`].
    pub fn upsert<E: Stored>(&self, record: E) {
        self.apply(StoreEvent::Changed(E::KIND), |store| {
            store.upsert(record);
        });
    }

    /// See [`EntityStore::upsert_all`].
    pub fn upsert_all<E: Stored>(&self, records: Vec<E>) {
        self.apply(StoreEvent::Changed(E::KIND), |store| {
            store.upsert_all(records);
        });
    }

    /// See [`EntityStore::remove`].
    pub fn remove<E: Stored>(&self, id: E::Id) {
        self.apply(StoreEvent::Changed(E::KIND), |store| {
            store.remove::<E>(id);
        });
    }

    /// See [`EntityStore::apply_positions`].
    pub fn apply_positions<E: Stored + Positioned>(&self, updates: &[PositionUpdateOf<E>]) {
        self.apply(StoreEvent::Changed(E::KIND), |store| {
            store.apply_positions::<E>(updates);
        });
    }

    /// Computes a position plan against the current state and applies it
    /// under the same write lock, so no other writer can interleave between
    /// reading positions and writing them back.
    #[must_use]
    pub fn reposition<E: Stored + Positioned>(
        &self,
        plan: impl FnOnce(&EntityStore) -> PositionPlan<E>,
    ) -> PositionPlan<E> {
        self.apply(StoreEvent::Changed(E::KIND), |store| {
            let planned = plan(store);
            if !planned.is_empty() {
                store.apply_positions::<E>(planned.updates());
            }
            planned
        })
    }

    /// See [`EntityStore::set_search_query`].
    pub fn set_search_query(&self, query: impl Into<String>) {
        self.apply(StoreEvent::ViewChanged, |store| {
            store.set_search_query(query);
        });
    }

    /// See [`EntityStore::set_filters`].
    pub fn set_filters(&self, filters: TaskFilter) {
        self.apply(StoreEvent::ViewChanged, |store| store.set_filters(filters));
    }

    /// See [`EntityStore::clear_filters`].
    pub fn clear_filters(&self) {
        self.apply(StoreEvent::ViewChanged, EntityStore::clear_filters);
    }

    /// See [`EntityStore::select_board`].
    pub fn select_board(&self, board_id: Option<BoardId>) {
        self.apply(StoreEvent::ViewChanged, |store| store.select_board(board_id));
    }

    /// See [`EntityStore::set_load_state`].
    pub fn set_load_state(&self, state: LoadState) {
        self.apply(StoreEvent::ViewChanged, |store| store.set_load_state(state));
    }

    /// See [`EntityStore::report_error`].
    pub fn report_error(&self, message: impl Into<String>) {
        self.apply(StoreEvent::ViewChanged, |store| store.report_error(message));
    }

    /// See [`EntityStore::clear_error`].
    pub fn clear_error(&self) {
        self.apply(StoreEvent::ViewChanged, EntityStore::clear_error);
    }

    fn announce(&self, event: StoreEvent) {
        if self.events.send(event).is_err() {
            trace!(?event, "no store subscribers");
        }
    }
}

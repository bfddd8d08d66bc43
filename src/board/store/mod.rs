//! Entity store: the single in-memory source of truth for rendering.
//!
//! The store holds one [`Collection`] per entity kind plus [`ViewState`].
//! Every mutating primitive ([`EntityStore::replace_all`],
//! [`EntityStore::upsert`], [`EntityStore::remove`] and their batch forms)
//! finishes by calling the kind's [`Stored::normalize`] step, so ordering is
//! an invariant of the store rather than a side effect of how callers
//! happened to insert. Primitives are total: they never fail, and applying
//! the same record twice is indistinguishable from applying it once.

mod collection;
mod shared;
mod view_state;

pub use collection::Collection;
pub use shared::{SharedStore, StoreEvent};
pub use view_state::{LoadState, ViewState};

use crate::board::domain::{
    Board, BoardId, ChecklistItem, Comment, Entity, Label, LabelId, List, ListId, Member,
    Positioned, PositionUpdateOf, Task, TaskFilter, TaskId, TaskLabel,
};
use crate::board::view;
use std::collections::HashSet;
use tracing::trace;

/// An entity kind the store knows how to hold.
///
/// Implementations select the backing collection and describe the kind's
/// ordering rule, ownership check, and cascade.
pub trait Stored: Entity {
    /// Returns the collection holding this kind.
    fn collection(store: &EntityStore) -> &Collection<Self>;

    /// Returns the collection holding this kind, mutably.
    fn collection_mut(store: &mut EntityStore) -> &mut Collection<Self>;

    /// Re-establishes canonical order after a mutation. Records in
    /// `favored` were just written and win contested positions.
    fn normalize(collection: &mut Collection<Self>, _favored: &HashSet<Self::Id>) {
        collection.sort_by_order_key();
    }

    /// Returns whether the record's owner is present in the store.
    fn is_attached(_store: &EntityStore, _record: &Self) -> bool {
        true
    }

    /// Removes or detaches records that depend on `removed`.
    fn cascade(_store: &mut EntityStore, _removed: &Self) {}
}

/// Normalized in-memory collections for every entity kind.
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    boards: Collection<Board>,
    lists: Collection<List>,
    tasks: Collection<Task>,
    labels: Collection<Label>,
    members: Collection<Member>,
    checklist_items: Collection<ChecklistItem>,
    comments: Collection<Comment>,
    task_labels: Collection<TaskLabel>,
    view: ViewState,
}

impl EntityStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole collection of `E` with `records`.
    ///
    /// This is the authoritative bulk load; duplicate ids keep the last
    /// occurrence. Returns the resulting record count.
    pub fn replace_all<E: Stored>(&mut self, records: Vec<E>) -> usize {
        self.replace_where(|_: &E| true, records)
    }

    /// Replaces the records of `E` matching `in_scope` with `records`,
    /// leaving the rest of the collection untouched.
    ///
    /// Used for authoritative loads of one parent scope, such as the
    /// checklist of a single task. Returns the resulting record count.
    pub fn replace_where<E: Stored>(
        &mut self,
        in_scope: impl Fn(&E) -> bool,
        records: Vec<E>,
    ) -> usize {
        let collection = E::collection_mut(self);
        collection.drain_where(in_scope);
        for record in records {
            collection.put(record);
        }
        E::normalize(collection, &HashSet::new());
        collection.len()
    }

    /// Inserts `record`, or overwrites the stored copy with the same id.
    ///
    /// Records carry every field, so merging an incoming record means
    /// adopting its values. A record whose owner is absent is ignored; if a
    /// stale copy exists it is removed, since the record has left the loaded
    /// scope. Returns whether the store changed.
    pub fn upsert<E: Stored>(&mut self, record: E) -> bool {
        self.upsert_all(vec![record]) > 0
    }

    /// Upserts a batch, normalizing once with every written record favored.
    ///
    /// Returns how many records changed or were removed as detached.
    pub fn upsert_all<E: Stored>(&mut self, records: Vec<E>) -> usize {
        let mut changed = 0;
        let mut favored = HashSet::with_capacity(records.len());
        for record in records {
            let id = record.id();
            if !E::is_attached(self, &record) {
                trace!(kind = %E::KIND, %id, "ignoring record outside the loaded scope");
                if self.remove::<E>(id) {
                    changed += 1;
                }
                continue;
            }
            if E::collection_mut(self).put(record) {
                changed += 1;
            }
            favored.insert(id);
        }
        if changed > 0 {
            E::normalize(E::collection_mut(self), &favored);
        }
        changed
    }

    /// Removes the record with `id` and cascades to its dependents.
    ///
    /// Removing an absent id is a no-op. Returns whether a record was
    /// removed.
    pub fn remove<E: Stored>(&mut self, id: E::Id) -> bool {
        let Some(removed) = E::collection_mut(self).take(id) else {
            return false;
        };
        E::cascade(self, &removed);
        true
    }

    /// Moves records as described by `updates`. Unknown ids and moves into
    /// an unloaded parent are skipped.
    ///
    /// Returns how many records changed.
    pub fn apply_positions<E: Stored + Positioned>(
        &mut self,
        updates: &[PositionUpdateOf<E>],
    ) -> usize {
        let moved: Vec<E> = updates
            .iter()
            .filter_map(|update| {
                let mut record = E::collection(self).get(update.id)?.clone();
                record.place(update.parent_id, update.position);
                E::is_attached(self, &record).then_some(record)
            })
            .collect();
        self.upsert_all(moved)
    }

    /// Looks up a record by id.
    #[must_use]
    pub fn get<E: Stored>(&self, id: E::Id) -> Option<&E> {
        E::collection(self).get(id)
    }

    /// Returns every record of kind `E` in canonical order.
    #[must_use]
    pub fn records<E: Stored>(&self) -> &[E] {
        E::collection(self).as_slice()
    }

    /// Returns the scalar UI state.
    #[must_use]
    pub const fn view(&self) -> &ViewState {
        &self.view
    }

    /// Working boards, newest first.
    #[must_use]
    pub fn boards(&self) -> Vec<&Board> {
        let mut boards: Vec<&Board> = self.boards.iter().filter(|b| !b.is_template).collect();
        boards.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        boards
    }

    /// Template boards, ordered by category.
    #[must_use]
    pub fn templates(&self) -> Vec<&Board> {
        let mut templates: Vec<&Board> = self.boards.iter().filter(|b| b.is_template).collect();
        templates.sort_by(|a, b| a.template_category.cmp(&b.template_category));
        templates
    }

    /// The selected board, when it is loaded.
    #[must_use]
    pub fn current_board(&self) -> Option<&Board> {
        self.view
            .current_board
            .and_then(|board_id| self.boards.get(board_id))
    }

    /// Lists of `board_id`, left to right.
    #[must_use]
    pub fn lists_for_board(&self, board_id: BoardId) -> Vec<&List> {
        self.lists
            .iter()
            .filter(|list| list.board_id == board_id)
            .collect()
    }

    /// Every task of `list_id` by position, ignoring search and filters.
    #[must_use]
    pub fn all_tasks_in_list(&self, list_id: ListId) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|task| task.list_id == list_id)
            .collect()
    }

    /// Visible tasks of `list_id` under the current search and filters.
    #[must_use]
    pub fn tasks_for_list(&self, list_id: ListId) -> Vec<&Task> {
        view::tasks_for_list(self, list_id)
    }

    /// Labels scoped to `board_id`, in creation order.
    #[must_use]
    pub fn labels_for_board(&self, board_id: BoardId) -> Vec<&Label> {
        self.labels
            .iter()
            .filter(|label| label.board_id == board_id)
            .collect()
    }

    /// Label ids attached to `task_id`.
    pub fn label_ids_for_task(&self, task_id: TaskId) -> impl Iterator<Item = LabelId> + '_ {
        self.task_labels
            .iter()
            .filter(move |join| join.task_id == task_id)
            .map(|join| join.label_id)
    }

    /// Labels attached to `task_id`, skipping joins to unloaded labels.
    #[must_use]
    pub fn labels_for_task(&self, task_id: TaskId) -> Vec<&Label> {
        self.label_ids_for_task(task_id)
            .filter_map(|label_id| self.labels.get(label_id))
            .collect()
    }

    /// Members ordered by name.
    #[must_use]
    pub fn members(&self) -> Vec<&Member> {
        let mut members: Vec<&Member> = self.members.iter().collect();
        members.sort_by(|a, b| a.name.cmp(&b.name));
        members
    }

    /// Checklist of `task_id`, by position.
    #[must_use]
    pub fn checklist_items_for_task(&self, task_id: TaskId) -> Vec<&ChecklistItem> {
        self.checklist_items
            .iter()
            .filter(|item| item.task_id == task_id)
            .collect()
    }

    /// Completed and total checklist counts for `task_id`.
    #[must_use]
    pub fn checklist_progress(&self, task_id: TaskId) -> (usize, usize) {
        let items = self.checklist_items_for_task(task_id);
        let done = items.iter().filter(|item| item.completed).count();
        (done, items.len())
    }

    /// Comments on `task_id`, oldest first.
    #[must_use]
    pub fn comments_for_task(&self, task_id: TaskId) -> Vec<&Comment> {
        self.comments
            .iter()
            .filter(|comment| comment.task_id == task_id)
            .collect()
    }

    /// Sets the search text.
    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.view.search_query = query.into();
    }

    /// Sets the filter predicate.
    pub fn set_filters(&mut self, filters: TaskFilter) {
        self.view.filters = filters;
    }

    /// Clears both the search text and the filter predicate.
    pub fn clear_filters(&mut self) {
        self.view.search_query.clear();
        self.view.filters = TaskFilter::default();
    }

    /// Selects a board (or none).
    pub const fn select_board(&mut self, board_id: Option<BoardId>) {
        self.view.current_board = board_id;
    }

    /// Records the load progress of the selected board.
    pub fn set_load_state(&mut self, state: LoadState) {
        self.view.load_state = state;
    }

    /// Publishes a non-fatal error message to the UI error channel.
    pub fn report_error(&mut self, message: impl Into<String>) {
        self.view.last_error = Some(message.into());
    }

    /// Dismisses the current error message.
    pub fn clear_error(&mut self) {
        self.view.last_error = None;
    }
}

impl Stored for Board {
    fn collection(store: &EntityStore) -> &Collection<Self> {
        &store.boards
    }

    fn collection_mut(store: &mut EntityStore) -> &mut Collection<Self> {
        &mut store.boards
    }

    fn cascade(store: &mut EntityStore, removed: &Self) {
        for list in store.lists.drain_where(|list| list.board_id == removed.id) {
            List::cascade(store, &list);
        }
        for label in store.labels.drain_where(|label| label.board_id == removed.id) {
            Label::cascade(store, &label);
        }
        if store.view.current_board == Some(removed.id) {
            store.view.current_board = None;
        }
    }
}

impl Stored for List {
    fn collection(store: &EntityStore) -> &Collection<Self> {
        &store.lists
    }

    fn collection_mut(store: &mut EntityStore) -> &mut Collection<Self> {
        &mut store.lists
    }

    fn normalize(collection: &mut Collection<Self>, favored: &HashSet<Self::Id>) {
        collection.normalize_positions(favored);
    }

    fn is_attached(store: &EntityStore, record: &Self) -> bool {
        store.view.shows_board(record.board_id)
    }

    fn cascade(store: &mut EntityStore, removed: &Self) {
        for task in store.tasks.drain_where(|task| task.list_id == removed.id) {
            Task::cascade(store, &task);
        }
    }
}

impl Stored for Task {
    fn collection(store: &EntityStore) -> &Collection<Self> {
        &store.tasks
    }

    fn collection_mut(store: &mut EntityStore) -> &mut Collection<Self> {
        &mut store.tasks
    }

    fn normalize(collection: &mut Collection<Self>, favored: &HashSet<Self::Id>) {
        collection.normalize_positions(favored);
    }

    fn is_attached(store: &EntityStore, record: &Self) -> bool {
        store.lists.get(record.list_id).is_some()
    }

    fn cascade(store: &mut EntityStore, removed: &Self) {
        store
            .checklist_items
            .drain_where(|item| item.task_id == removed.id);
        store
            .comments
            .drain_where(|comment| comment.task_id == removed.id);
        store
            .task_labels
            .drain_where(|join| join.task_id == removed.id);
    }
}

impl Stored for Label {
    fn collection(store: &EntityStore) -> &Collection<Self> {
        &store.labels
    }

    fn collection_mut(store: &mut EntityStore) -> &mut Collection<Self> {
        &mut store.labels
    }

    fn is_attached(store: &EntityStore, record: &Self) -> bool {
        store.view.shows_board(record.board_id)
    }

    fn cascade(store: &mut EntityStore, removed: &Self) {
        store
            .task_labels
            .drain_where(|join| join.label_id == removed.id);
        store.view.filters.labels.remove(&removed.id);
    }
}

impl Stored for Member {
    fn collection(store: &EntityStore) -> &Collection<Self> {
        &store.members
    }

    fn collection_mut(store: &mut EntityStore) -> &mut Collection<Self> {
        &mut store.members
    }

    fn cascade(store: &mut EntityStore, removed: &Self) {
        store.tasks.update_where(
            |task| task.assigned_to == Some(removed.id),
            |task| task.assigned_to = None,
        );
    }
}

impl Stored for ChecklistItem {
    fn collection(store: &EntityStore) -> &Collection<Self> {
        &store.checklist_items
    }

    fn collection_mut(store: &mut EntityStore) -> &mut Collection<Self> {
        &mut store.checklist_items
    }

    fn normalize(collection: &mut Collection<Self>, favored: &HashSet<Self::Id>) {
        collection.normalize_positions(favored);
    }

    fn is_attached(store: &EntityStore, record: &Self) -> bool {
        store.tasks.get(record.task_id).is_some()
    }
}

impl Stored for Comment {
    fn collection(store: &EntityStore) -> &Collection<Self> {
        &store.comments
    }

    fn collection_mut(store: &mut EntityStore) -> &mut Collection<Self> {
        &mut store.comments
    }

    fn is_attached(store: &EntityStore, record: &Self) -> bool {
        store.tasks.get(record.task_id).is_some()
    }
}

impl Stored for TaskLabel {
    fn collection(store: &EntityStore) -> &Collection<Self> {
        &store.task_labels
    }

    fn collection_mut(store: &mut EntityStore) -> &mut Collection<Self> {
        &mut store.task_labels
    }

    fn is_attached(store: &EntityStore, record: &Self) -> bool {
        store.tasks.get(record.task_id).is_some()
    }
}

//! Positional reorder engine.
//!
//! Turns drag gestures into [`PositionPlan`]s: batches of `{id, parent,
//! position}` triples that the workspace applies to the store and sends to
//! the backend unchanged. Planning is pure; it reads a store snapshot and
//! never mutates it.
//!
//! Every computation works on the unfiltered contents of a container, so
//! hidden siblings keep consistent positions while a search is active.

use crate::board::domain::{
    List, ListId, Positioned, PositionUpdate, PositionUpdateOf, Task, TaskId, index_position,
};
use crate::board::store::EntityStore;
use tracing::debug;

/// Ordered batch of position reassignments for records of kind `E`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionPlan<E: Positioned> {
    updates: Vec<PositionUpdateOf<E>>,
}

impl<E: Positioned> Default for PositionPlan<E> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<E: Positioned> PositionPlan<E> {
    /// A plan that changes nothing.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            updates: Vec::new(),
        }
    }

    /// Wraps an explicit batch.
    #[must_use]
    pub const fn from_updates(updates: Vec<PositionUpdateOf<E>>) -> Self {
        Self { updates }
    }

    /// Returns whether the plan changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }

    /// Returns the number of reassignments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.updates.len()
    }

    /// Returns the reassignments in application order.
    #[must_use]
    pub fn updates(&self) -> &[PositionUpdateOf<E>] {
        &self.updates
    }

    /// Consumes the plan, yielding the batch for the backend.
    #[must_use]
    pub fn into_updates(self) -> Vec<PositionUpdateOf<E>> {
        self.updates
    }
}

/// An in-progress task drag. Starting a drag mutates nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragSession {
    active: TaskId,
}

impl DragSession {
    /// Captures the dragged task.
    #[must_use]
    pub const fn new(active: TaskId) -> Self {
        Self { active }
    }

    /// Returns the dragged task.
    #[must_use]
    pub const fn active(&self) -> TaskId {
        self.active
    }
}

/// What the pointer is over during a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    /// Another task card (or the dragged card itself).
    Task(TaskId),
    /// A list container with no card under the pointer.
    List(ListId),
    /// Outside any valid target.
    Nowhere,
}

/// Moves the element at `from` so it ends up at index `to`, shifting the
/// elements in between. Out-of-range indices leave `items` untouched.
pub fn array_move<T>(items: &mut Vec<T>, from: usize, to: usize) {
    if from >= items.len() || to >= items.len() || from == to {
        return;
    }
    let moved = items.remove(from);
    items.insert(to, moved);
}

/// Plans a single-element move inside one container: `active` takes the
/// slot of `over` and every sibling is renumbered to its 0-based index.
///
/// `siblings` must be the full container in position order. Returns an
/// empty plan when either record is missing or they coincide.
#[must_use]
pub fn plan_move_within<E: Positioned>(
    siblings: &[&E],
    active: E::Id,
    over: E::Id,
) -> PositionPlan<E> {
    if active == over {
        return PositionPlan::empty();
    }
    let index_of = |id: E::Id| siblings.iter().position(|record| record.id() == id);
    let (Some(from), Some(to)) = (index_of(active), index_of(over)) else {
        return PositionPlan::empty();
    };

    let mut reordered = siblings.to_vec();
    array_move(&mut reordered, from, to);
    let updates = reordered
        .iter()
        .enumerate()
        .map(|(index, record)| {
            PositionUpdate::new(record.id(), record.parent_id(), index_position(index))
        })
        .collect();
    PositionPlan::from_updates(updates)
}

/// Begins a drag on `task_id` when the task is loaded.
#[must_use]
pub fn drag_start(store: &EntityStore, task_id: TaskId) -> Option<DragSession> {
    store.get::<Task>(task_id).map(|_| DragSession::new(task_id))
}

/// Plans the provisional placement while hovering `target`.
///
/// Hovering a task in another list moves the dragged task into that list at
/// the hovered task's position; siblings at or after that slot shift up by
/// one. Hovering a different list container appends the dragged task. Any
/// other hover, including one over the task's current list, is a no-op.
#[must_use]
pub fn plan_drag_over(
    store: &EntityStore,
    session: DragSession,
    target: DropTarget,
) -> PositionPlan<Task> {
    let Some(active) = store.get::<Task>(session.active()) else {
        return PositionPlan::empty();
    };
    let plan = match target {
        DropTarget::Task(over_id) => match store.get::<Task>(over_id) {
            Some(over) if over.list_id != active.list_id => {
                insert_at(store, active.id, over.list_id, over.position)
            }
            _ => PositionPlan::empty(),
        },
        DropTarget::List(list_id)
            if list_id != active.list_id && store.get::<List>(list_id).is_some() =>
        {
            append_to(store, active.id, list_id)
        }
        DropTarget::List(_) | DropTarget::Nowhere => PositionPlan::empty(),
    };
    if !plan.is_empty() {
        debug!(task = %active.id, ?target, moves = plan.len(), "drag-over plan");
    }
    plan
}

/// Plans the final placement when the drag ends over `target`.
///
/// Only a drop onto another task in the dragged task's current list
/// changes anything: the list is reordered and fully renumbered. Cross-list
/// placement was already committed during drag-over.
#[must_use]
pub fn plan_drag_end(
    store: &EntityStore,
    session: DragSession,
    target: DropTarget,
) -> PositionPlan<Task> {
    let DropTarget::Task(over_id) = target else {
        return PositionPlan::empty();
    };
    let (Some(active), Some(over)) = (
        store.get::<Task>(session.active()),
        store.get::<Task>(over_id),
    ) else {
        return PositionPlan::empty();
    };
    if active.list_id != over.list_id {
        return PositionPlan::empty();
    }
    let plan = plan_move_within(&store.all_tasks_in_list(active.list_id), active.id, over.id);
    if !plan.is_empty() {
        debug!(task = %active.id, over = %over.id, moves = plan.len(), "drag-end plan");
    }
    plan
}

fn insert_at(
    store: &EntityStore,
    task_id: TaskId,
    list_id: ListId,
    position: i64,
) -> PositionPlan<Task> {
    let shifted = store
        .all_tasks_in_list(list_id)
        .into_iter()
        .filter(|sibling| sibling.id != task_id && sibling.position >= position)
        .map(|sibling| {
            PositionUpdate::new(sibling.id, list_id, sibling.position.saturating_add(1))
        });
    let updates = std::iter::once(PositionUpdate::new(task_id, list_id, position))
        .chain(shifted)
        .collect();
    PositionPlan::from_updates(updates)
}

fn append_to(store: &EntityStore, task_id: TaskId, list_id: ListId) -> PositionPlan<Task> {
    let siblings = store.all_tasks_in_list(list_id);
    let count = index_position(siblings.len());
    let position = if siblings.iter().any(|sibling| sibling.position == count) {
        siblings
            .iter()
            .map(|sibling| sibling.position)
            .max()
            .map_or(count, |max| max.saturating_add(1))
    } else {
        count
    };
    PositionPlan::from_updates(vec![PositionUpdate::new(task_id, list_id, position)])
}

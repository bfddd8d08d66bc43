//! Derived view filter: the visible task subset of a list.
//!
//! Recomputed on every read from the store snapshot and the current search
//! and filter scalars. Filtering never reorders; output stays in position
//! order.

use crate::board::domain::{ListId, Task, TaskFilter};
use crate::board::store::EntityStore;

/// Returns the tasks of `list_id` that pass the store's search text and
/// filter predicate, in position order.
#[must_use]
pub fn tasks_for_list(store: &EntityStore, list_id: ListId) -> Vec<&Task> {
    let view = store.view();
    let needle = view.search_query().to_lowercase();
    let filters = view.filters();
    store
        .all_tasks_in_list(list_id)
        .into_iter()
        .filter(|task| matches_search(task, &needle))
        .filter(|task| matches_filters(store, task, filters))
        .collect()
}

fn matches_search(task: &Task, needle: &str) -> bool {
    needle.is_empty()
        || task.title.to_lowercase().contains(needle)
        || task.description.to_lowercase().contains(needle)
}

fn matches_filters(store: &EntityStore, task: &Task, filters: &TaskFilter) -> bool {
    if filters.priority.is_some_and(|priority| task.priority != priority) {
        return false;
    }
    if filters.assignee.is_some_and(|assignee| !assignee.matches(task)) {
        return false;
    }
    if !filters.labels.is_empty()
        && !store
            .label_ids_for_task(task.id)
            .any(|label_id| filters.labels.contains(&label_id))
    {
        return false;
    }
    filters.due.is_none_or(|range| range.contains(task.due_date))
}

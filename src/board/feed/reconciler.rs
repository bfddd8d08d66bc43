//! Folds change notifications into the store.
//!
//! Inserts and updates both go through the store's upsert primitive and
//! deletes through its remove primitive, the same ones local optimistic
//! edits use. A notification describing the current state is a no-op, so
//! the echo of this client's own write converges silently.

use super::notification::{Change, Notification};
use crate::board::store::{SharedStore, StoreEvent, Stored};
use tracing::debug;

/// Applies one notification. Returns whether the store changed.
#[must_use]
pub fn apply_notification(store: &SharedStore, notification: Notification) -> bool {
    match notification {
        Notification::Board(change) => apply_change(store, change),
        Notification::List(change) => apply_change(store, change),
        Notification::Task(change) => apply_change(store, change),
        Notification::Label(change) => apply_change(store, change),
        Notification::Member(change) => apply_change(store, change),
        Notification::ChecklistItem(change) => apply_change(store, change),
        Notification::Comment(change) => apply_change(store, change),
        Notification::TaskLabel(change) => apply_change(store, change),
    }
}

/// Applies one typed change. Returns whether the store changed.
#[must_use]
pub fn apply_change<E: Stored>(store: &SharedStore, change: Change<E>) -> bool {
    let kind = change.kind();
    let id = change.id();
    let changed = store.apply(StoreEvent::Changed(E::KIND), |entities| match change {
        Change::Insert(record) | Change::Update(record) => entities.upsert(record),
        Change::Delete(removed) => entities.remove::<E>(removed),
    });
    debug!(entity = %E::KIND, change = %kind, %id, changed, "applied notification");
    changed
}

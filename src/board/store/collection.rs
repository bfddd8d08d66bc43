//! Ordered, id-addressable record collection backing each entity kind.

use crate::board::domain::{Entity, Positioned};
use std::collections::{HashMap, HashSet};

/// Records of one kind in canonical display order.
///
/// Reads are public; every mutation goes through
/// [`EntityStore`](super::EntityStore) so ordering is re-established after
/// each change.
#[derive(Debug, Clone)]
pub struct Collection<E: Entity> {
    records: Vec<E>,
}

impl<E: Entity> Default for Collection<E> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

impl<E: Entity> Collection<E> {
    /// Returns the records in canonical order.
    #[must_use]
    pub fn as_slice(&self) -> &[E] {
        &self.records
    }

    /// Iterates records in canonical order.
    pub fn iter(&self) -> std::slice::Iter<'_, E> {
        self.records.iter()
    }

    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns whether the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Looks up a record by identifier.
    #[must_use]
    pub fn get(&self, id: E::Id) -> Option<&E> {
        self.records.iter().find(|record| record.id() == id)
    }

    /// Inserts or overwrites a record. Returns `false` when the stored copy
    /// already equals `record`.
    pub(crate) fn put(&mut self, record: E) -> bool {
        let id = record.id();
        match self.records.iter_mut().find(|existing| existing.id() == id) {
            Some(existing) if *existing == record => false,
            Some(existing) => {
                *existing = record;
                true
            }
            None => {
                self.records.push(record);
                true
            }
        }
    }

    /// Removes and returns the record with `id`.
    pub(crate) fn take(&mut self, id: E::Id) -> Option<E> {
        let index = self.records.iter().position(|record| record.id() == id)?;
        Some(self.records.remove(index))
    }

    /// Removes every record matching `predicate`, returning them in order.
    pub(crate) fn drain_where(&mut self, predicate: impl Fn(&E) -> bool) -> Vec<E> {
        let (removed, kept): (Vec<E>, Vec<E>) = std::mem::take(&mut self.records)
            .into_iter()
            .partition(|record| predicate(record));
        self.records = kept;
        removed
    }

    /// Mutates every record matching `predicate`, returning how many changed.
    pub(crate) fn update_where(
        &mut self,
        predicate: impl Fn(&E) -> bool,
        mut update: impl FnMut(&mut E),
    ) -> usize {
        let mut changed = 0;
        for record in self.records.iter_mut().filter(|record| predicate(record)) {
            update(record);
            changed += 1;
        }
        changed
    }

    /// Stable sort by [`Entity::order_key`]; keyless records keep arrival
    /// order.
    pub(crate) fn sort_by_order_key(&mut self) {
        self.records.sort_by_key(Entity::order_key);
    }
}

impl<E: Positioned> Collection<E> {
    /// Restores the position invariant: within each parent scope, positions
    /// ascend strictly.
    ///
    /// When two siblings claim one slot, a record in `favored` keeps it and
    /// the other moves up one, carrying any sibling it then collides with.
    /// Gaps are left alone.
    pub(crate) fn normalize_positions(&mut self, favored: &HashSet<E::Id>) {
        self.records
            .sort_by_key(|record| (record.position(), !favored.contains(&record.id())));

        let mut last_in_scope: HashMap<E::Parent, i64> = HashMap::new();
        for record in &mut self.records {
            let parent = record.parent_id();
            if let Some(previous) = last_in_scope.get(&parent).copied()
                && record.position() <= previous
            {
                record.place(parent, previous.saturating_add(1));
            }
            last_in_scope.insert(parent, record.position());
        }

        self.records.sort_by_key(Positioned::position);
    }
}

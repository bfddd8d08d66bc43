//! Traits shared by every record kind held in the entity store.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;

/// Discriminant naming each entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// [`super::Board`] records.
    Board,
    /// [`super::List`] records.
    List,
    /// [`super::Task`] records.
    Task,
    /// [`super::Label`] records.
    Label,
    /// [`super::Member`] records.
    Member,
    /// [`super::ChecklistItem`] records.
    ChecklistItem,
    /// [`super::Comment`] records.
    Comment,
    /// [`super::TaskLabel`] join records.
    TaskLabel,
}

impl EntityKind {
    /// Returns the canonical storage name of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Board => "boards",
            Self::List => "lists",
            Self::Task => "tasks",
            Self::Label => "labels",
            Self::Member => "members",
            Self::ChecklistItem => "checklist_items",
            Self::Comment => "comments",
            Self::TaskLabel => "task_labels",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key type usable as an entity or parent identifier.
pub trait EntityKey:
    Copy + Eq + Hash + Ord + fmt::Debug + fmt::Display + Send + Sync + 'static
{
}

impl<T> EntityKey for T where
    T: Copy + Eq + Hash + Ord + fmt::Debug + fmt::Display + Send + Sync + 'static
{
}

/// A record with a stable identity that the store can hold.
pub trait Entity: Clone + fmt::Debug + PartialEq + Send + Sync + 'static {
    /// Identifier type of the record.
    type Id: EntityKey;

    /// Kind discriminant.
    const KIND: EntityKind;

    /// Returns the record identifier.
    fn id(&self) -> Self::Id;

    /// Returns the canonical sort key.
    ///
    /// Records without a key keep their arrival order.
    fn order_key(&self) -> Option<i64> {
        None
    }
}

/// A record ordered by an explicit `position` inside a parent scope.
pub trait Positioned: Entity {
    /// Identifier of the owning scope.
    type Parent: EntityKey;

    /// Returns the owning scope.
    fn parent_id(&self) -> Self::Parent;

    /// Returns the position within the owning scope.
    fn position(&self) -> i64;

    /// Moves the record to `position` inside `parent`.
    fn place(&mut self, parent: Self::Parent, position: i64);
}

/// A record kind the persistence collaborator can create and update.
pub trait Record: Entity {
    /// Validated creation payload.
    type Draft: Clone + fmt::Debug + Send + Sync + 'static;
    /// Partial update; `None` fields are left untouched.
    type Patch: Clone + fmt::Debug + Default + Send + Sync + 'static;
    /// Filter used to list records from the backend.
    type Scope: Clone + fmt::Debug + Send + Sync + 'static;

    /// Merges the set fields of `patch` into the record.
    fn apply_patch(&mut self, patch: &Self::Patch);
}

//! Position reassignment triple shared by the reorder engine, the store, and
//! the persistence batch call.

use super::{Entity, Positioned};
use serde::{Deserialize, Serialize};

/// Moves record `id` to `position` inside `parent_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PositionUpdate<I, P> {
    /// Record being moved.
    pub id: I,
    /// Owning scope after the move.
    pub parent_id: P,
    /// Position after the move.
    pub position: i64,
}

impl<I, P> PositionUpdate<I, P> {
    /// Creates a position update.
    #[must_use]
    pub const fn new(id: I, parent_id: P, position: i64) -> Self {
        Self {
            id,
            parent_id,
            position,
        }
    }
}

/// Position update for records of kind `E`.
pub type PositionUpdateOf<E> = PositionUpdate<<E as Entity>::Id, <E as Positioned>::Parent>;

/// Converts a zero-based sequence index into a position value.
#[must_use]
pub fn index_position(index: usize) -> i64 {
    i64::try_from(index).unwrap_or(i64::MAX)
}

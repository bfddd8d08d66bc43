//! Identifier newtypes for board entities.
//!
//! Identifiers are minted by the persistence collaborator when a record is
//! created; the engine only wraps and compares them. Each kind gets its own
//! type so a list id can never be passed where a task id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier.
            ///
            /// Only persistence adapters and tests should mint identifiers.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wraps an identifier assigned by the persistence layer.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the wrapped UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl AsRef<Uuid> for $name {
            fn as_ref(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(
    /// Unique identifier for a board.
    BoardId
);
entity_id!(
    /// Unique identifier for a list (a board column).
    ListId
);
entity_id!(
    /// Unique identifier for a task card.
    TaskId
);
entity_id!(
    /// Unique identifier for a board-scoped label.
    LabelId
);
entity_id!(
    /// Unique identifier for a team member.
    MemberId
);
entity_id!(
    /// Unique identifier for a checklist item.
    ChecklistItemId
);
entity_id!(
    /// Unique identifier for a task comment.
    CommentId
);

/// Composite key of a task-to-label association.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TaskLabelKey {
    /// Labelled task.
    pub task_id: TaskId,
    /// Attached label.
    pub label_id: LabelId,
}

impl TaskLabelKey {
    /// Creates an association key.
    #[must_use]
    pub const fn new(task_id: TaskId, label_id: LabelId) -> Self {
        Self { task_id, label_id }
    }
}

impl fmt::Display for TaskLabelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.task_id, self.label_id)
    }
}

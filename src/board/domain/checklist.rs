//! Checklist items: ordered sub-steps of a task.

use super::{
    BoardDomainError, ChecklistItemId, Entity, EntityKind, Positioned, Record, TaskId, Title,
};
use serde::{Deserialize, Serialize};

/// One checkable step of a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    /// Item identifier.
    pub id: ChecklistItemId,
    /// Owning task.
    pub task_id: TaskId,
    /// Step text.
    pub title: String,
    /// Whether the step is done.
    #[serde(default)]
    pub completed: bool,
    /// Order within the task.
    pub position: i64,
}

impl Entity for ChecklistItem {
    type Id = ChecklistItemId;
    const KIND: EntityKind = EntityKind::ChecklistItem;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn order_key(&self) -> Option<i64> {
        Some(self.position)
    }
}

impl Positioned for ChecklistItem {
    type Parent = TaskId;

    fn parent_id(&self) -> Self::Parent {
        self.task_id
    }

    fn position(&self) -> i64 {
        self.position
    }

    fn place(&mut self, parent: Self::Parent, position: i64) {
        self.task_id = parent;
        self.position = position;
    }
}

impl Record for ChecklistItem {
    type Draft = ChecklistItemDraft;
    type Patch = ChecklistItemPatch;
    type Scope = TaskId;

    fn apply_patch(&mut self, patch: &Self::Patch) {
        if let Some(title) = &patch.title {
            self.title.clone_from(title);
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
    }
}

/// Validated payload for creating a checklist item, appended last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistItemDraft {
    /// Owning task.
    pub task_id: TaskId,
    /// Step text.
    pub title: String,
}

impl ChecklistItemDraft {
    /// Creates a checklist item draft.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyTitle`] for a blank title.
    pub fn new(task_id: TaskId, title: impl Into<String>) -> Result<Self, BoardDomainError> {
        Ok(Self {
            task_id,
            title: Title::new(title)?.into_inner(),
        })
    }
}

/// Partial checklist item update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChecklistItemPatch {
    /// New title.
    pub title: Option<String>,
    /// New completion flag.
    pub completed: Option<bool>,
}

impl ChecklistItemPatch {
    /// Sets the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the completion flag.
    #[must_use]
    pub const fn with_completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    /// Validates and normalizes the set fields.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyTitle`] for a blank title.
    pub fn validated(self) -> Result<Self, BoardDomainError> {
        Ok(Self {
            title: self
                .title
                .map(|raw| Title::new(raw).map(Title::into_inner))
                .transpose()?,
            completed: self.completed,
        })
    }
}

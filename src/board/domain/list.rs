//! List records: ordered columns within a board.

use super::{BoardDomainError, BoardId, Entity, EntityKind, ListId, Positioned, Record, Title};
use serde::{Deserialize, Serialize};

/// Ordered container of tasks within a board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct List {
    /// List identifier.
    pub id: ListId,
    /// Owning board.
    pub board_id: BoardId,
    /// Column title.
    pub title: String,
    /// Left-to-right order within the board.
    pub position: i64,
}

impl Entity for List {
    type Id = ListId;
    const KIND: EntityKind = EntityKind::List;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn order_key(&self) -> Option<i64> {
        Some(self.position)
    }
}

impl Positioned for List {
    type Parent = BoardId;

    fn parent_id(&self) -> Self::Parent {
        self.board_id
    }

    fn position(&self) -> i64 {
        self.position
    }

    fn place(&mut self, parent: Self::Parent, position: i64) {
        self.board_id = parent;
        self.position = position;
    }
}

impl Record for List {
    type Draft = ListDraft;
    type Patch = ListPatch;
    type Scope = BoardId;

    fn apply_patch(&mut self, patch: &Self::Patch) {
        if let Some(title) = &patch.title {
            self.title.clone_from(title);
        }
    }
}

/// Validated payload for creating a list. The backend appends it after the
/// board's last list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListDraft {
    /// Owning board.
    pub board_id: BoardId,
    /// Column title.
    pub title: String,
}

impl ListDraft {
    /// Creates a list draft.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyTitle`] for a blank title.
    pub fn new(board_id: BoardId, title: impl Into<String>) -> Result<Self, BoardDomainError> {
        Ok(Self {
            board_id,
            title: Title::new(title)?.into_inner(),
        })
    }
}

/// Partial list update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPatch {
    /// New title.
    pub title: Option<String>,
}

impl ListPatch {
    /// Sets the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Validates and normalizes the set fields.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyTitle`] for a blank title.
    pub fn validated(self) -> Result<Self, BoardDomainError> {
        let title = self
            .title
            .map(|raw| Title::new(raw).map(Title::into_inner))
            .transpose()?;
        Ok(Self { title })
    }
}

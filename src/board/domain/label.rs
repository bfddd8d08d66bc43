//! Board-scoped labels.

use super::{BoardDomainError, BoardId, DisplayName, Entity, EntityKind, HexColor, LabelId, Record};
use serde::{Deserialize, Serialize};

/// Colored tag scoped to one board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    /// Label identifier.
    pub id: LabelId,
    /// Owning board.
    pub board_id: BoardId,
    /// Label name.
    pub name: String,
    /// Badge color.
    pub color: String,
}

impl Entity for Label {
    type Id = LabelId;
    const KIND: EntityKind = EntityKind::Label;

    fn id(&self) -> Self::Id {
        self.id
    }
}

impl Record for Label {
    type Draft = LabelDraft;
    type Patch = LabelPatch;
    type Scope = BoardId;

    fn apply_patch(&mut self, patch: &Self::Patch) {
        if let Some(name) = &patch.name {
            self.name.clone_from(name);
        }
        if let Some(color) = &patch.color {
            self.color.clone_from(color);
        }
    }
}

/// Validated payload for creating a label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelDraft {
    /// Owning board.
    pub board_id: BoardId,
    /// Label name.
    pub name: String,
    /// Badge color.
    pub color: String,
}

impl LabelDraft {
    /// Creates a label draft.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError`] for a blank name or malformed color.
    pub fn new(
        board_id: BoardId,
        name: impl Into<String>,
        color: impl Into<String>,
    ) -> Result<Self, BoardDomainError> {
        Ok(Self {
            board_id,
            name: DisplayName::new(name)?.into_inner(),
            color: HexColor::new(color)?.into_inner(),
        })
    }
}

/// Partial label update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelPatch {
    /// New name.
    pub name: Option<String>,
    /// New color.
    pub color: Option<String>,
}

impl LabelPatch {
    /// Sets the name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the color.
    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Validates and normalizes the set fields.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError`] for a blank name or malformed color.
    pub fn validated(self) -> Result<Self, BoardDomainError> {
        Ok(Self {
            name: self
                .name
                .map(|raw| DisplayName::new(raw).map(DisplayName::into_inner))
                .transpose()?,
            color: self
                .color
                .map(|raw| HexColor::new(raw).map(HexColor::into_inner))
                .transpose()?,
        })
    }
}

//! Board records and their intent payloads.

use super::{BoardDomainError, BoardId, Entity, EntityKind, HexColor, Record, Title};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Board background. A board shows either a solid color or an image, never
/// both.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Background {
    /// Solid `#rrggbb` color.
    Color(String),
    /// Gradient or image reference (CSS gradient or URL).
    Image(String),
}

impl Background {
    /// Creates a validated solid-color background.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::InvalidColor`] for malformed colors.
    pub fn color(value: impl Into<String>) -> Result<Self, BoardDomainError> {
        HexColor::new(value).map(|color| Self::Color(color.into_inner()))
    }

    /// Creates a validated image or gradient background.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyBackgroundImage`] for blank input.
    pub fn image(value: impl Into<String>) -> Result<Self, BoardDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(BoardDomainError::EmptyBackgroundImage);
        }
        Ok(Self::Image(trimmed.to_owned()))
    }
}

/// Top-level container of lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// Board identifier.
    pub id: BoardId,
    /// Board title.
    pub title: String,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Optional background.
    pub background: Option<Background>,
    /// Whether the board is a reusable template.
    pub is_template: bool,
    /// Template grouping, meaningful only for templates.
    pub template_category: Option<String>,
    /// Creation timestamp assigned by the backend.
    pub created_at: DateTime<Utc>,
}

impl Entity for Board {
    type Id = BoardId;
    const KIND: EntityKind = EntityKind::Board;

    fn id(&self) -> Self::Id {
        self.id
    }
}

impl Record for Board {
    type Draft = BoardDraft;
    type Patch = BoardPatch;
    type Scope = BoardScope;

    fn apply_patch(&mut self, patch: &Self::Patch) {
        if let Some(title) = &patch.title {
            self.title.clone_from(title);
        }
        if let Some(description) = &patch.description {
            self.description.clone_from(description);
        }
        if let Some(background) = &patch.background {
            self.background.clone_from(background);
        }
    }
}

/// Which boards to list from the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoardScope {
    /// Working boards, newest first.
    Active,
    /// Template boards, ordered by category.
    Templates,
}

/// Validated payload for creating a board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardDraft {
    /// Board title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
}

impl BoardDraft {
    /// Creates a board draft.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyTitle`] for a blank title.
    pub fn new(title: impl Into<String>) -> Result<Self, BoardDomainError> {
        Ok(Self {
            title: Title::new(title)?.into_inner(),
            description: None,
        })
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Partial board update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardPatch {
    /// New title.
    pub title: Option<String>,
    /// New description; `Some(None)` clears it.
    pub description: Option<Option<String>>,
    /// New background; `Some(None)` clears it.
    pub background: Option<Option<Background>>,
}

impl BoardPatch {
    /// Sets the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets or clears the description.
    #[must_use]
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = Some(description);
        self
    }

    /// Sets or clears the background.
    #[must_use]
    pub fn with_background(mut self, background: Option<Background>) -> Self {
        self.background = Some(background);
        self
    }

    /// Validates and normalizes the set fields.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError`] for a blank title or a malformed
    /// background.
    pub fn validated(self) -> Result<Self, BoardDomainError> {
        let title = self
            .title
            .map(|raw| Title::new(raw).map(Title::into_inner))
            .transpose()?;
        let background = match self.background {
            Some(Some(Background::Color(color))) => Some(Some(Background::color(color)?)),
            Some(Some(Background::Image(image))) => Some(Some(Background::image(image)?)),
            other => other,
        };
        Ok(Self {
            title,
            description: self.description,
            background,
        })
    }
}

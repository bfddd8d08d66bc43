//! Team members. Members are global rather than board-scoped.

use super::{BoardDomainError, DisplayName, Email, Entity, EntityKind, HexColor, MemberId, Record};
use serde::{Deserialize, Serialize};

/// Person who can be assigned tasks and author comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Member identifier.
    pub id: MemberId,
    /// Display name.
    pub name: String,
    /// Optional contact email.
    pub email: Option<String>,
    /// Avatar badge color.
    pub color: String,
}

impl Entity for Member {
    type Id = MemberId;
    const KIND: EntityKind = EntityKind::Member;

    fn id(&self) -> Self::Id {
        self.id
    }
}

impl Record for Member {
    type Draft = MemberDraft;
    type Patch = MemberPatch;
    type Scope = ();

    fn apply_patch(&mut self, patch: &Self::Patch) {
        if let Some(name) = &patch.name {
            self.name.clone_from(name);
        }
        if let Some(email) = &patch.email {
            self.email.clone_from(email);
        }
        if let Some(color) = &patch.color {
            self.color.clone_from(color);
        }
    }
}

/// Validated payload for creating a member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberDraft {
    /// Display name.
    pub name: String,
    /// Optional email.
    pub email: Option<String>,
    /// Badge color.
    pub color: String,
}

impl MemberDraft {
    /// Creates a member draft.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError`] for a blank name, malformed email, or
    /// malformed color.
    pub fn new(
        name: impl Into<String>,
        email: Option<String>,
        color: impl Into<String>,
    ) -> Result<Self, BoardDomainError> {
        Ok(Self {
            name: DisplayName::new(name)?.into_inner(),
            email: email.map(|raw| Email::new(raw).map(Email::into_inner)).transpose()?,
            color: HexColor::new(color)?.into_inner(),
        })
    }
}

/// Partial member update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberPatch {
    /// New name.
    pub name: Option<String>,
    /// New or cleared email.
    pub email: Option<Option<String>>,
    /// New color.
    pub color: Option<String>,
}

impl MemberPatch {
    /// Sets the name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets or clears the email.
    #[must_use]
    pub fn with_email(mut self, email: Option<String>) -> Self {
        self.email = Some(email);
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
    /// Returns [`BoardDomainError`] for any malformed field.
    pub fn validated(self) -> Result<Self, BoardDomainError> {
        let email = match self.email {
            Some(Some(raw)) => Some(Some(Email::new(raw)?.into_inner())),
            other => other,
        };
        Ok(Self {
            name: self
                .name
                .map(|raw| DisplayName::new(raw).map(DisplayName::into_inner))
                .transpose()?,
            email,
            color: self
                .color
                .map(|raw| HexColor::new(raw).map(HexColor::into_inner))
                .transpose()?,
        })
    }
}

//! Validated scalar values accepted from user intents.
//!
//! Records arriving from the persistence layer carry plain strings; these
//! wrappers exist for the intent boundary, where input must be checked
//! before anything touches the store.

use super::BoardDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Non-empty, trimmed title for boards, lists, tasks, and checklist items.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Title(String);

impl Title {
    /// Creates a validated title.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyTitle`] when the value is blank.
    pub fn new(value: impl Into<String>) -> Result<Self, BoardDomainError> {
        non_blank(value.into())
            .map(Self)
            .ok_or(BoardDomainError::EmptyTitle)
    }

    /// Returns the title text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the title, returning the owned text.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Non-empty, trimmed display name for labels and members.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisplayName(String);

impl DisplayName {
    /// Creates a validated display name.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyName`] when the value is blank.
    pub fn new(value: impl Into<String>) -> Result<Self, BoardDomainError> {
        non_blank(value.into())
            .map(Self)
            .ok_or(BoardDomainError::EmptyName)
    }

    /// Returns the name text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the name, returning the owned text.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Lowercased `#rgb` or `#rrggbb` color literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HexColor(String);

impl HexColor {
    /// Creates a validated color.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::InvalidColor`] when the value is not a
    /// three- or six-digit hex literal prefixed with `#`.
    pub fn new(value: impl Into<String>) -> Result<Self, BoardDomainError> {
        let raw = value.into();
        let normalized = raw.trim().to_ascii_lowercase();
        let digits = normalized.strip_prefix('#').unwrap_or_default();
        let is_valid = matches!(digits.len(), 3 | 6)
            && digits.chars().all(|ch| ch.is_ascii_hexdigit());
        if !is_valid {
            return Err(BoardDomainError::InvalidColor(raw));
        }
        Ok(Self(normalized))
    }

    /// Returns the color literal.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the color, returning the owned literal.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Minimal member email: one `@` with text on both sides and no whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Creates a validated email address.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::InvalidEmail`] for malformed input.
    pub fn new(value: impl Into<String>) -> Result<Self, BoardDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        let mut parts = trimmed.split('@');
        let local = parts.next().unwrap_or_default();
        let domain = parts.next().unwrap_or_default();
        let is_valid = !local.is_empty()
            && !domain.is_empty()
            && parts.next().is_none()
            && !trimmed.chars().any(char::is_whitespace);
        if !is_valid {
            return Err(BoardDomainError::InvalidEmail(raw));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Consumes the address, returning the owned text.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Non-empty comment body. Inner whitespace and line breaks are preserved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentBody(String);

impl CommentBody {
    /// Creates a validated comment body.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyComment`] when the value is blank.
    pub fn new(value: impl Into<String>) -> Result<Self, BoardDomainError> {
        non_blank(value.into())
            .map(Self)
            .ok_or(BoardDomainError::EmptyComment)
    }

    /// Consumes the body, returning the owned text.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

fn non_blank(raw: String) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

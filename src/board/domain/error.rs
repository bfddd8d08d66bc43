//! Error types for board domain validation and parsing.

use thiserror::Error;

/// Errors returned while validating user-supplied board values.
///
/// These are raised before any store mutation is attempted, so a rejected
/// intent never leaves a trace in local state.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BoardDomainError {
    /// A title is empty after trimming.
    #[error("title must not be empty")]
    EmptyTitle,

    /// A label or member name is empty after trimming.
    #[error("name must not be empty")]
    EmptyName,

    /// Comment content is empty after trimming.
    #[error("comment content must not be empty")]
    EmptyComment,

    /// A color is not a `#rgb` or `#rrggbb` hex literal.
    #[error("invalid color '{0}', expected #rgb or #rrggbb")]
    InvalidColor(String),

    /// An email address has no local part or domain.
    #[error("invalid email address '{0}'")]
    InvalidEmail(String),

    /// A background image reference is empty.
    #[error("background image reference must not be empty")]
    EmptyBackgroundImage,

    /// A due-date range ends before it starts.
    #[error("due-date range ends ({to}) before it starts ({from})")]
    InvertedDueRange {
        /// Inclusive lower bound.
        from: chrono::NaiveDate,
        /// Inclusive upper bound.
        to: chrono::NaiveDate,
    },
}

/// Error returned while parsing a task priority.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown priority: {0}")]
pub struct ParsePriorityError(pub String);

/// Error returned while parsing an assignee filter value.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown assignee filter: {0}, expected 'unassigned' or a member id")]
pub struct ParseAssigneeError(pub String);

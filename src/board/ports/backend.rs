//! Persistence collaborator contracts.
//!
//! The backend owns durable storage and identifier assignment. Calls are
//! single attempts; the workspace never retries them.

use crate::board::domain::{
    Board, BoardId, ChecklistItem, Comment, EntityKind, Label, List, Member, Positioned,
    PositionUpdateOf, Record, Task, TaskLabel,
};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Result type for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;

/// CRUD contract for one record kind.
#[async_trait]
pub trait EntityBackend<E: Record>: Send + Sync {
    /// Lists the records in `scope`.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] when the backend cannot serve the request.
    async fn list(&self, scope: &E::Scope) -> BackendResult<Vec<E>>;

    /// Creates a record and returns it with its assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::NotFound`] when the draft's parent does not
    /// exist.
    async fn create(&self, draft: E::Draft) -> BackendResult<E>;

    /// Applies `patch` and returns the stored record.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::NotFound`] when the record does not exist.
    async fn update(&self, id: E::Id, patch: E::Patch) -> BackendResult<E>;

    /// Deletes the record and everything it owns.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::NotFound`] when the record does not exist.
    async fn delete(&self, id: E::Id) -> BackendResult<()>;
}

/// Batch position writes for ordered record kinds.
#[async_trait]
pub trait PositionBackend<E: Record + Positioned>: EntityBackend<E> {
    /// Applies each reassignment as an independent write. The batch is not
    /// atomic: earlier writes stay applied when a later one fails.
    ///
    /// # Errors
    ///
    /// Returns the first [`BackendError`] encountered.
    async fn update_positions(&self, updates: Vec<PositionUpdateOf<E>>) -> BackendResult<()>;
}

/// Template instantiation.
#[async_trait]
pub trait BoardTemplateBackend: EntityBackend<Board> {
    /// Creates a working board titled `title` with a copy of the template's
    /// lists.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::NotFound`] when `template` does not exist.
    async fn create_from_template(&self, template: BoardId, title: String) -> BackendResult<Board>;
}

/// Task-label association storage.
#[async_trait]
pub trait TaskLabelBackend: Send + Sync {
    /// Lists the associations of every task on `board`.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] when the backend cannot serve the request.
    async fn list_task_labels(&self, board: BoardId) -> BackendResult<Vec<TaskLabel>>;

    /// Attaches a label to a task. Attaching twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::NotFound`] when the task or label is missing.
    async fn attach_label(&self, association: TaskLabel) -> BackendResult<()>;

    /// Detaches a label from a task. Detaching an absent pair is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] when the backend cannot serve the request.
    async fn detach_label(&self, association: TaskLabel) -> BackendResult<()>;
}

/// Every persistence capability the workspace needs.
pub trait BoardBackend:
    BoardTemplateBackend
    + PositionBackend<List>
    + PositionBackend<Task>
    + EntityBackend<Label>
    + EntityBackend<Member>
    + PositionBackend<ChecklistItem>
    + EntityBackend<Comment>
    + TaskLabelBackend
    + 'static
{
}

impl<T> BoardBackend for T where
    T: BoardTemplateBackend
        + PositionBackend<List>
        + PositionBackend<Task>
        + EntityBackend<Label>
        + EntityBackend<Member>
        + PositionBackend<ChecklistItem>
        + EntityBackend<Comment>
        + TaskLabelBackend
        + 'static
{
}

/// Errors returned by persistence collaborators.
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    /// The addressed record does not exist.
    #[error("{kind} record not found: {id}")]
    NotFound {
        /// Kind of the missing record.
        kind: EntityKind,
        /// Identifier of the missing record.
        id: String,
    },

    /// The backend refused the request.
    #[error("request rejected: {0}")]
    Rejected(String),

    /// The backend could not be reached or failed internally.
    #[error("backend unavailable: {0}")]
    Unavailable(Arc<dyn std::error::Error + Send + Sync>),
}

impl BackendError {
    /// Builds a [`BackendError::NotFound`].
    pub fn not_found(kind: EntityKind, id: impl fmt::Display) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// Wraps a transport or storage failure.
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Arc::new(err))
    }
}

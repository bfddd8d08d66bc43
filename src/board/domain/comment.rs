//! Task comments, ordered by creation time.

use super::{
    BoardDomainError, CommentBody, CommentId, Entity, EntityKind, MemberId, Record, TaskId,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Append-only discussion entry on a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Comment identifier.
    pub id: CommentId,
    /// Owning task.
    pub task_id: TaskId,
    /// Authoring member.
    pub member_id: MemberId,
    /// Comment text.
    pub content: String,
    /// Creation timestamp; defines display order.
    pub created_at: DateTime<Utc>,
}

impl Entity for Comment {
    type Id = CommentId;
    const KIND: EntityKind = EntityKind::Comment;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn order_key(&self) -> Option<i64> {
        Some(self.created_at.timestamp_micros())
    }
}

impl Record for Comment {
    type Draft = CommentDraft;
    type Patch = CommentPatch;
    type Scope = TaskId;

    fn apply_patch(&mut self, patch: &Self::Patch) {
        if let Some(content) = &patch.content {
            self.content.clone_from(content);
        }
    }
}

/// Validated payload for posting a comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentDraft {
    /// Owning task.
    pub task_id: TaskId,
    /// Authoring member.
    pub member_id: MemberId,
    /// Comment text.
    pub content: String,
}

impl CommentDraft {
    /// Creates a comment draft.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyComment`] for blank content.
    pub fn new(
        task_id: TaskId,
        member_id: MemberId,
        content: impl Into<String>,
    ) -> Result<Self, BoardDomainError> {
        Ok(Self {
            task_id,
            member_id,
            content: CommentBody::new(content)?.into_inner(),
        })
    }
}

/// Comment edit. Only the content may change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentPatch {
    /// New content.
    pub content: Option<String>,
}

impl CommentPatch {
    /// Creates an edit replacing the content.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyComment`] for blank content.
    pub fn content(content: impl Into<String>) -> Result<Self, BoardDomainError> {
        Ok(Self {
            content: Some(CommentBody::new(content)?.into_inner()),
        })
    }
}

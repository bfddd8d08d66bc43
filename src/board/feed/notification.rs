//! Change notifications delivered by the change feed.

use crate::board::domain::{
    Board, BoardId, ChecklistItem, Comment, Entity, EntityKind, Label, List, Member, Task,
    TaskLabel,
};
use std::fmt;
use tokio::sync::oneshot;

/// Operation a notification describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// A record was created.
    Insert,
    /// A record was modified.
    Update,
    /// A record was deleted.
    Delete,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Delete => "delete",
        })
    }
}

/// One change to a record of kind `E`. Inserts and updates carry the full
/// current record, never a diff.
#[derive(Debug, Clone, PartialEq)]
pub enum Change<E: Entity> {
    /// A record was created.
    Insert(E),
    /// A record was modified.
    Update(E),
    /// The record with this id was deleted.
    Delete(E::Id),
}

impl<E: Entity> Change<E> {
    /// Returns the operation.
    #[must_use]
    pub const fn kind(&self) -> ChangeKind {
        match self {
            Self::Insert(_) => ChangeKind::Insert,
            Self::Update(_) => ChangeKind::Update,
            Self::Delete(_) => ChangeKind::Delete,
        }
    }

    /// Returns the id of the affected record.
    #[must_use]
    pub fn id(&self) -> E::Id {
        match self {
            Self::Insert(record) | Self::Update(record) => record.id(),
            Self::Delete(id) => *id,
        }
    }
}

/// A change to any entity kind, tagged by kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// Board change.
    Board(Change<Board>),
    /// List change.
    List(Change<List>),
    /// Task change.
    Task(Change<Task>),
    /// Label change.
    Label(Change<Label>),
    /// Member change.
    Member(Change<Member>),
    /// Checklist item change.
    ChecklistItem(Change<ChecklistItem>),
    /// Comment change.
    Comment(Change<Comment>),
    /// Task-label association change.
    TaskLabel(Change<TaskLabel>),
}

impl Notification {
    /// Returns the entity kind the notification concerns.
    #[must_use]
    pub const fn entity_kind(&self) -> EntityKind {
        match self {
            Self::Board(_) => EntityKind::Board,
            Self::List(_) => EntityKind::List,
            Self::Task(_) => EntityKind::Task,
            Self::Label(_) => EntityKind::Label,
            Self::Member(_) => EntityKind::Member,
            Self::ChecklistItem(_) => EntityKind::ChecklistItem,
            Self::Comment(_) => EntityKind::Comment,
            Self::TaskLabel(_) => EntityKind::TaskLabel,
        }
    }

    /// Returns the operation.
    #[must_use]
    pub const fn change_kind(&self) -> ChangeKind {
        match self {
            Self::Board(change) => change.kind(),
            Self::List(change) => change.kind(),
            Self::Task(change) => change.kind(),
            Self::Label(change) => change.kind(),
            Self::Member(change) => change.kind(),
            Self::ChecklistItem(change) => change.kind(),
            Self::Comment(change) => change.kind(),
            Self::TaskLabel(change) => change.kind(),
        }
    }
}

macro_rules! notification_from_change {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<Change<$variant>> for Notification {
                fn from(change: Change<$variant>) -> Self {
                    Self::$variant(change)
                }
            }
        )*
    };
}

notification_from_change!(Board, List, Task, Label, Member, ChecklistItem, Comment, TaskLabel);

/// Parent filter of a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedScope {
    /// Every record of the kind.
    Global,
    /// Records belonging to one board.
    Board(BoardId),
}

/// What a subscription listens to: one entity kind, optionally narrowed to
/// a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FeedTopic {
    /// Entity kind.
    pub kind: EntityKind,
    /// Parent filter.
    pub scope: FeedScope,
}

impl FeedTopic {
    /// A process-wide topic.
    #[must_use]
    pub const fn global(kind: EntityKind) -> Self {
        Self {
            kind,
            scope: FeedScope::Global,
        }
    }

    /// A topic narrowed to `board_id`.
    #[must_use]
    pub const fn board(kind: EntityKind, board_id: BoardId) -> Self {
        Self {
            kind,
            scope: FeedScope::Board(board_id),
        }
    }

    /// Returns whether a change scoped to `board` should reach this topic.
    /// Changes with no board (members, board records) match global topics
    /// only.
    #[must_use]
    pub fn accepts(&self, kind: EntityKind, board: Option<BoardId>) -> bool {
        if self.kind != kind {
            return false;
        }
        match self.scope {
            FeedScope::Global => true,
            FeedScope::Board(scoped) => board == Some(scoped),
        }
    }
}

impl fmt::Display for FeedTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.scope {
            FeedScope::Global => write!(f, "{}", self.kind),
            FeedScope::Board(board_id) => write!(f, "{}@{board_id}", self.kind),
        }
    }
}

/// Item travelling through the reconciler's single arrival-ordered queue.
#[derive(Debug)]
pub enum FeedEvent {
    /// A change to apply.
    Notification(Notification),
    /// The subscription for `topic` dropped.
    Disconnected {
        /// Topic whose delivery stopped.
        topic: FeedTopic,
        /// Transport-provided reason.
        reason: String,
    },
    /// Completes once every earlier event has been applied.
    Barrier(oneshot::Sender<()>),
}

impl From<Notification> for FeedEvent {
    fn from(notification: Notification) -> Self {
        Self::Notification(notification)
    }
}

//! Domain model for the board state engine.
//!
//! Records mirror what the persistence collaborator stores: plain data with
//! identifiers assigned upstream. Validation lives on drafts, patches, and
//! the scalar wrappers such as [`Title`] and [`HexColor`], so a malformed
//! intent is rejected before any record changes.

mod board;
mod checklist;
mod comment;
mod entity;
mod error;
mod filter;
mod ids;
mod label;
mod list;
mod member;
mod position;
mod task;
mod values;

pub use board::{Background, Board, BoardDraft, BoardPatch, BoardScope};
pub use checklist::{ChecklistItem, ChecklistItemDraft, ChecklistItemPatch};
pub use comment::{Comment, CommentDraft, CommentPatch};
pub use entity::{Entity, EntityKey, EntityKind, Positioned, Record};
pub use error::{BoardDomainError, ParseAssigneeError, ParsePriorityError};
pub use filter::{AssigneeFilter, DueDateRange, TaskFilter};
pub use ids::{
    BoardId, ChecklistItemId, CommentId, LabelId, ListId, MemberId, TaskId, TaskLabelKey,
};
pub use label::{Label, LabelDraft, LabelPatch};
pub use list::{List, ListDraft, ListPatch};
pub use member::{Member, MemberDraft, MemberPatch};
pub use position::{PositionUpdate, PositionUpdateOf, index_position};
pub use task::{DueStatus, Priority, Task, TaskDraft, TaskLabel, TaskPatch};
pub use values::{CommentBody, DisplayName, Email, HexColor, Title};

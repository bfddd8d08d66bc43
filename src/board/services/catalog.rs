//! Label and member intents.

use super::{BoardWorkspace, WorkspaceError, WorkspaceResult};
use crate::board::{
    domain::{
        EntityKind, Label, LabelDraft, LabelId, LabelPatch, Member, MemberDraft, MemberId,
        MemberPatch, Task, TaskId, TaskLabel, TaskLabelKey,
    },
    ports::{BoardBackend, ChangeFeed},
};
use mockable::Clock;

impl<B, F, C> BoardWorkspace<B, F, C>
where
    B: BoardBackend,
    F: ChangeFeed,
    C: Clock + Send + Sync,
{
    /// Creates a label on the selected board.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::NoBoardSelected`], a validation error, or
    /// [`WorkspaceError::Persistence`].
    pub async fn create_label(&self, name: &str, color: &str) -> WorkspaceResult<Label> {
        let board_id = self.current_board_id()?;
        let draft = LabelDraft::new(board_id, name, color)?;
        self.create_record("create label", draft).await
    }

    /// Edits a label.
    ///
    /// # Errors
    ///
    /// Returns a validation error, [`WorkspaceError::NotFound`], or
    /// [`WorkspaceError::Persistence`].
    pub async fn update_label(&self, id: LabelId, patch: LabelPatch) -> WorkspaceResult<Label> {
        let checked = patch.validated()?;
        self.update_record("update label", id, checked).await
    }

    /// Deletes a label. Tasks keep existing; only the associations go.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::Persistence`] when the backend fails.
    pub async fn delete_label(&self, id: LabelId) -> WorkspaceResult<()> {
        self.delete_record::<Label>("delete label", id).await
    }

    /// Attaches `label_id` to `task_id`.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::NotFound`] when the task or label is not
    /// loaded, or [`WorkspaceError::Persistence`].
    pub async fn attach_label(&self, task_id: TaskId, label_id: LabelId) -> WorkspaceResult<()> {
        let (task_loaded, label_loaded) = self.store.read(|store| {
            (
                store.get::<Task>(task_id).is_some(),
                store.get::<Label>(label_id).is_some(),
            )
        });
        if !task_loaded {
            return Err(WorkspaceError::not_loaded(EntityKind::Task, task_id));
        }
        if !label_loaded {
            return Err(WorkspaceError::not_loaded(EntityKind::Label, label_id));
        }
        let association = TaskLabel::new(task_id, label_id);
        self.store.upsert(association);
        self.persisted("attach label", self.backend.attach_label(association).await)
    }

    /// Detaches `label_id` from `task_id`.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::Persistence`] when the backend fails.
    pub async fn detach_label(&self, task_id: TaskId, label_id: LabelId) -> WorkspaceResult<()> {
        self.store
            .remove::<TaskLabel>(TaskLabelKey::new(task_id, label_id));
        let association = TaskLabel::new(task_id, label_id);
        self.persisted("detach label", self.backend.detach_label(association).await)
    }

    /// Creates a member.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank name, malformed email or
    /// color, or [`WorkspaceError::Persistence`].
    pub async fn create_member(
        &self,
        name: &str,
        email: Option<&str>,
        color: &str,
    ) -> WorkspaceResult<Member> {
        let draft = MemberDraft::new(name, email.map(str::to_owned), color)?;
        self.create_record("create member", draft).await
    }

    /// Edits a member.
    ///
    /// # Errors
    ///
    /// Returns a validation error, [`WorkspaceError::NotFound`], or
    /// [`WorkspaceError::Persistence`].
    pub async fn update_member(&self, id: MemberId, patch: MemberPatch) -> WorkspaceResult<Member> {
        let checked = patch.validated()?;
        self.update_record("update member", id, checked).await
    }

    /// Deletes a member, unassigning their tasks.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::Persistence`] when the backend fails.
    pub async fn delete_member(&self, id: MemberId) -> WorkspaceResult<()> {
        self.delete_record::<Member>("delete member", id).await
    }
}

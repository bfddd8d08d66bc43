//! Task detail intents: checklist items and comments.

use super::{BoardWorkspace, WorkspaceError, WorkspaceResult};
use crate::board::{
    domain::{
        ChecklistItem, ChecklistItemDraft, ChecklistItemId, ChecklistItemPatch, Comment,
        CommentDraft, CommentId, CommentPatch, EntityKind, MemberId, TaskId,
    },
    ports::{BoardBackend, ChangeFeed, EntityBackend},
    reorder::{self, PositionPlan},
    store::StoreEvent,
};
use mockable::Clock;
use tracing::info;

impl<B, F, C> BoardWorkspace<B, F, C>
where
    B: BoardBackend,
    F: ChangeFeed,
    C: Clock + Send + Sync,
{
    /// Loads the checklist and comments of `task_id`.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::Persistence`] when the backend fails.
    pub async fn load_task_details(&self, task_id: TaskId) -> WorkspaceResult<()> {
        let items = self.persisted(
            "load checklist",
            <B as EntityBackend<ChecklistItem>>::list(&*self.backend, &task_id).await,
        )?;
        let comments = self.persisted(
            "load comments",
            <B as EntityBackend<Comment>>::list(&*self.backend, &task_id).await,
        )?;
        info!(%task_id, items = items.len(), comments = comments.len(), "task details loaded");
        self.store
            .apply(StoreEvent::Changed(EntityKind::ChecklistItem), |store| {
                store.replace_where(|item: &ChecklistItem| item.task_id == task_id, items);
                store.replace_where(|comment: &Comment| comment.task_id == task_id, comments);
            });
        Ok(())
    }

    /// Appends a checklist item to `task_id`.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank title or
    /// [`WorkspaceError::Persistence`].
    pub async fn add_checklist_item(
        &self,
        task_id: TaskId,
        title: &str,
    ) -> WorkspaceResult<ChecklistItem> {
        let draft = ChecklistItemDraft::new(task_id, title)?;
        self.create_record("add checklist item", draft).await
    }

    /// Edits a checklist item.
    ///
    /// # Errors
    ///
    /// Returns a validation error, [`WorkspaceError::NotFound`], or
    /// [`WorkspaceError::Persistence`].
    pub async fn update_checklist_item(
        &self,
        id: ChecklistItemId,
        patch: ChecklistItemPatch,
    ) -> WorkspaceResult<ChecklistItem> {
        let checked = patch.validated()?;
        self.update_record("update checklist item", id, checked)
            .await
    }

    /// Flips the completed flag of a checklist item.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::NotFound`] when the item is not loaded, or
    /// [`WorkspaceError::Persistence`].
    pub async fn toggle_checklist_item(
        &self,
        id: ChecklistItemId,
    ) -> WorkspaceResult<ChecklistItem> {
        let completed = self
            .store
            .read(|store| store.get::<ChecklistItem>(id).map(|item| item.completed))
            .ok_or_else(|| WorkspaceError::not_loaded(EntityKind::ChecklistItem, id))?;
        let patch = ChecklistItemPatch::default().with_completed(!completed);
        self.update_record("toggle checklist item", id, patch).await
    }

    /// Deletes a checklist item.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::Persistence`] when the backend fails.
    pub async fn delete_checklist_item(&self, id: ChecklistItemId) -> WorkspaceResult<()> {
        self.delete_record::<ChecklistItem>("delete checklist item", id)
            .await
    }

    /// Moves checklist item `active` into the slot of `over` within
    /// `task_id`, renumbering the checklist contiguously.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::Persistence`] when the backend fails.
    pub async fn reorder_checklist_items(
        &self,
        task_id: TaskId,
        active: ChecklistItemId,
        over: ChecklistItemId,
    ) -> WorkspaceResult<PositionPlan<ChecklistItem>> {
        self.reposition("reorder checklist", |store| {
            reorder::plan_move_within(&store.checklist_items_for_task(task_id), active, over)
        })
        .await
    }

    /// Posts a comment on `task_id` authored by `member_id`.
    ///
    /// # Errors
    ///
    /// Returns a validation error for blank content or
    /// [`WorkspaceError::Persistence`].
    pub async fn add_comment(
        &self,
        task_id: TaskId,
        member_id: MemberId,
        content: &str,
    ) -> WorkspaceResult<Comment> {
        let draft = CommentDraft::new(task_id, member_id, content)?;
        self.create_record("add comment", draft).await
    }

    /// Replaces the text of a comment.
    ///
    /// # Errors
    ///
    /// Returns a validation error for blank content,
    /// [`WorkspaceError::NotFound`], or [`WorkspaceError::Persistence`].
    pub async fn edit_comment(&self, id: CommentId, content: &str) -> WorkspaceResult<Comment> {
        let patch = CommentPatch::content(content)?;
        self.update_record("edit comment", id, patch).await
    }

    /// Deletes a comment.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::Persistence`] when the backend fails.
    pub async fn delete_comment(&self, id: CommentId) -> WorkspaceResult<()> {
        self.delete_record::<Comment>("delete comment", id).await
    }
}

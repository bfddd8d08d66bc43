//! List and task intents, including drag reordering.

use super::{BoardWorkspace, WorkspaceError, WorkspaceResult};
use crate::board::{
    domain::{EntityKind, List, ListDraft, ListId, ListPatch, Task, TaskDraft, TaskId, TaskPatch},
    ports::{BoardBackend, ChangeFeed},
    reorder::{self, DragSession, DropTarget, PositionPlan},
};
use mockable::Clock;

impl<B, F, C> BoardWorkspace<B, F, C>
where
    B: BoardBackend,
    F: ChangeFeed,
    C: Clock + Send + Sync,
{
    /// Appends a list titled `title` to the selected board.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::NoBoardSelected`], a validation error for a
    /// blank title, or [`WorkspaceError::Persistence`].
    pub async fn create_list(&self, title: &str) -> WorkspaceResult<List> {
        let board_id = self.current_board_id()?;
        let draft = ListDraft::new(board_id, title)?;
        self.create_record("create list", draft).await
    }

    /// Renames a list.
    ///
    /// # Errors
    ///
    /// Returns a validation error, [`WorkspaceError::NotFound`], or
    /// [`WorkspaceError::Persistence`].
    pub async fn update_list(&self, id: ListId, patch: ListPatch) -> WorkspaceResult<List> {
        let checked = patch.validated()?;
        self.update_record("update list", id, checked).await
    }

    /// Deletes a list and its tasks.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::Persistence`] when the backend fails.
    pub async fn delete_list(&self, id: ListId) -> WorkspaceResult<()> {
        self.delete_record::<List>("delete list", id).await
    }

    /// Moves list `active` into the slot of list `over` and renumbers the
    /// board's lists contiguously.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::NoBoardSelected`] or
    /// [`WorkspaceError::Persistence`].
    pub async fn reorder_lists(
        &self,
        active: ListId,
        over: ListId,
    ) -> WorkspaceResult<PositionPlan<List>> {
        let board_id = self.current_board_id()?;
        self.reposition("reorder lists", |store| {
            reorder::plan_move_within(&store.lists_for_board(board_id), active, over)
        })
        .await
    }

    /// Appends a task to `list_id`.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank title or
    /// [`WorkspaceError::Persistence`].
    pub async fn create_task(
        &self,
        list_id: ListId,
        title: &str,
        description: &str,
    ) -> WorkspaceResult<Task> {
        let draft = TaskDraft::new(list_id, title)?.with_description(description);
        self.create_record("create task", draft).await
    }

    /// Edits a task.
    ///
    /// # Errors
    ///
    /// Returns a validation error, [`WorkspaceError::NotFound`], or
    /// [`WorkspaceError::Persistence`].
    pub async fn update_task(&self, id: TaskId, patch: TaskPatch) -> WorkspaceResult<Task> {
        let checked = patch.validated()?;
        self.update_record("update task", id, checked).await
    }

    /// Deletes a task with its checklist, comments, and label associations.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::Persistence`] when the backend fails.
    pub async fn delete_task(&self, id: TaskId) -> WorkspaceResult<()> {
        self.delete_record::<Task>("delete task", id).await
    }

    /// Begins dragging `task_id`. Mutates nothing.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::NotFound`] when the task is not loaded.
    pub fn drag_start(&self, task_id: TaskId) -> WorkspaceResult<DragSession> {
        self.store
            .read(|store| reorder::drag_start(store, task_id))
            .ok_or_else(|| WorkspaceError::not_loaded(EntityKind::Task, task_id))
    }

    /// Applies the provisional placement for hovering `target` and persists
    /// it.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::Persistence`] when the backend fails; the
    /// local placement stays applied.
    pub async fn drag_over(
        &self,
        session: DragSession,
        target: DropTarget,
    ) -> WorkspaceResult<PositionPlan<Task>> {
        self.reposition("move task", |store| {
            reorder::plan_drag_over(store, session, target)
        })
        .await
    }

    /// Applies the final placement for dropping onto `target` and persists
    /// it.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::Persistence`] when the backend fails; the
    /// local order stays applied.
    pub async fn drag_end(
        &self,
        session: DragSession,
        target: DropTarget,
    ) -> WorkspaceResult<PositionPlan<Task>> {
        self.reposition("reorder tasks", |store| {
            reorder::plan_drag_end(store, session, target)
        })
        .await
    }
}

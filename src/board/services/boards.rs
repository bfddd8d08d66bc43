//! Board intents.

use super::{BoardWorkspace, WorkspaceResult};
use crate::board::{
    domain::{Board, BoardDraft, BoardId, BoardPatch, Title},
    ports::{BoardBackend, ChangeFeed},
};
use mockable::Clock;
use tracing::info;

impl<B, F, C> BoardWorkspace<B, F, C>
where
    B: BoardBackend,
    F: ChangeFeed,
    C: Clock + Send + Sync,
{
    /// Creates a working board.
    ///
    /// # Errors
    ///
    /// Returns [`super::WorkspaceError::Validation`] for a blank title or
    /// [`super::WorkspaceError::Persistence`] when the backend fails.
    pub async fn create_board(&self, draft: BoardDraft) -> WorkspaceResult<Board> {
        self.create_record("create board", draft).await
    }

    /// Creates a working board from a template, copying its lists.
    ///
    /// # Errors
    ///
    /// Returns [`super::WorkspaceError::Validation`] for a blank title or
    /// [`super::WorkspaceError::Persistence`] when the backend fails.
    pub async fn create_board_from_template(
        &self,
        template: BoardId,
        title: &str,
    ) -> WorkspaceResult<Board> {
        let checked = Title::new(title)?;
        let board = self.persisted(
            "create board from template",
            self.backend
                .create_from_template(template, checked.into_inner())
                .await,
        )?;
        info!(board_id = %board.id, %template, "board created from template");
        self.store.upsert(board.clone());
        Ok(board)
    }

    /// Edits a board.
    ///
    /// # Errors
    ///
    /// Returns [`super::WorkspaceError::Validation`] for an invalid patch,
    /// [`super::WorkspaceError::NotFound`] when the board is not loaded, or
    /// [`super::WorkspaceError::Persistence`] when the backend fails.
    pub async fn update_board(&self, id: BoardId, patch: BoardPatch) -> WorkspaceResult<Board> {
        let checked = patch.validated()?;
        self.update_record("update board", id, checked).await
    }

    /// Deletes a board with its lists and labels. Deleting the selected
    /// board clears the selection and its subscriptions.
    ///
    /// # Errors
    ///
    /// Returns [`super::WorkspaceError::Persistence`] when the backend fails.
    pub async fn delete_board(&self, id: BoardId) -> WorkspaceResult<()> {
        let selected = self.store.read(|store| store.view().current_board()) == Some(id);
        if selected {
            self.feeds.unsubscribe_board_scoped();
        }
        self.delete_record::<Board>("delete board", id).await
    }
}

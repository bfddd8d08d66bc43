//! UI-facing scalar state kept beside the entity collections.

use crate::board::domain::{BoardId, TaskFilter};

/// Progress of the authoritative load for the selected board.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// Initial fetch in flight.
    Loading,
    /// Collections reflect the last authoritative load.
    Ready,
    /// Initial fetch failed; the view should render its error state.
    Failed(String),
}

/// Search text, filter predicate, selection, and the error channel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub(super) search_query: String,
    pub(super) filters: TaskFilter,
    pub(super) current_board: Option<BoardId>,
    pub(super) load_state: LoadState,
    pub(super) last_error: Option<String>,
}

impl ViewState {
    /// Returns the search text.
    #[must_use]
    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// Returns the filter predicate.
    #[must_use]
    pub const fn filters(&self) -> &TaskFilter {
        &self.filters
    }

    /// Returns the selected board.
    #[must_use]
    pub const fn current_board(&self) -> Option<BoardId> {
        self.current_board
    }

    /// Returns the load progress of the selected board.
    #[must_use]
    pub const fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    /// Returns the most recent non-fatal error message.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Returns whether records scoped to `board_id` belong in the store:
    /// true for the selected board, or for any board when none is selected.
    #[must_use]
    pub fn shows_board(&self, board_id: BoardId) -> bool {
        self.current_board.is_none_or(|current| current == board_id)
    }

    /// Returns whether search text or any filter criterion is set.
    #[must_use]
    pub fn has_active_filters(&self) -> bool {
        !self.search_query.is_empty() || self.filters.is_active()
    }
}

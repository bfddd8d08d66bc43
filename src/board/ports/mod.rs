//! Port contracts for the persistence and change-notification
//! collaborators.
//!
//! Ports define infrastructure-agnostic interfaces used by the board
//! workspace; adapters live under `board::adapters`.

pub mod backend;
pub mod change_feed;

pub use backend::{
    BackendError, BackendResult, BoardBackend, BoardTemplateBackend, EntityBackend,
    PositionBackend, TaskLabelBackend,
};
pub use change_feed::{ChangeFeed, ChangeFeedError, ChangeFeedResult, FeedSubscription};

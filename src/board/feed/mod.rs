//! Change feed reconciler.
//!
//! Notifications from every subscription funnel into one queue and are
//! applied strictly in arrival order through the store's upsert and remove
//! primitives. Board and member topics live for the whole session; list,
//! task, label, and join topics are scoped to the selected board and torn
//! down when the selection changes.

mod notification;
mod reconciler;
mod supervisor;

pub use notification::{Change, ChangeKind, FeedEvent, FeedScope, FeedTopic, Notification};
pub use reconciler::{apply_change, apply_notification};
pub use supervisor::{Backoff, FeedSupervisor};

//! Change notification collaborator contract.

use crate::board::feed::{FeedEvent, FeedTopic};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;

/// Result type for change feed operations.
pub type ChangeFeedResult<T> = Result<T, ChangeFeedError>;

/// Source of insert/update/delete notifications.
#[async_trait]
pub trait ChangeFeed: Send + Sync + 'static {
    /// Starts delivering notifications for `topic` into `sink`.
    ///
    /// Notifications carry full records. When delivery stops unexpectedly
    /// the feed sends [`FeedEvent::Disconnected`] into `sink`.
    ///
    /// # Errors
    ///
    /// Returns [`ChangeFeedError`] when the subscription cannot be
    /// established.
    async fn subscribe(
        &self,
        topic: FeedTopic,
        sink: mpsc::Sender<FeedEvent>,
    ) -> ChangeFeedResult<FeedSubscription>;
}

/// Handle to a live subscription. Dropping it releases the subscription.
pub struct FeedSubscription {
    topic: FeedTopic,
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl FeedSubscription {
    /// Wraps a subscription released by calling `cancel`.
    #[must_use]
    pub fn new(topic: FeedTopic, cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            topic,
            cancel: Some(Box::new(cancel)),
        }
    }

    /// A subscription with nothing to release.
    #[must_use]
    pub const fn detached(topic: FeedTopic) -> Self {
        Self {
            topic,
            cancel: None,
        }
    }

    /// Returns the subscribed topic.
    #[must_use]
    pub const fn topic(&self) -> FeedTopic {
        self.topic
    }

    /// Releases the subscription now.
    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for FeedSubscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for FeedSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeedSubscription")
            .field("topic", &self.topic)
            .field("live", &self.cancel.is_some())
            .finish()
    }
}

/// Errors returned by change feed collaborators.
#[derive(Debug, Clone, Error)]
pub enum ChangeFeedError {
    /// The feed refused or could not accept the subscription.
    #[error("change feed unavailable: {0}")]
    Unavailable(String),

    /// Transport-level failure.
    #[error("change feed transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl ChangeFeedError {
    /// Wraps a transport failure.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}

//! In-memory change feed that fans notifications out to subscribers.

use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tokio::sync::mpsc;
use tracing::trace;

use crate::board::{
    domain::BoardId,
    feed::{FeedEvent, FeedTopic, Notification},
    ports::{ChangeFeed, ChangeFeedError, ChangeFeedResult, FeedSubscription},
};

/// Thread-safe in-memory change feed.
///
/// Clones share subscribers, so a backend and any number of workspaces can
/// hold the same feed. Suitable for tests and single-process use.
#[derive(Debug, Clone, Default)]
pub struct InMemoryChangeFeed {
    state: Arc<Mutex<FeedState>>,
}

#[derive(Debug, Default)]
struct FeedState {
    next_id: u64,
    subscribers: Vec<Subscriber>,
    unavailable: Option<String>,
}

#[derive(Debug)]
struct Subscriber {
    id: u64,
    topic: FeedTopic,
    sink: mpsc::Sender<FeedEvent>,
}

fn lock(state: &Mutex<FeedState>) -> MutexGuard<'_, FeedState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl InMemoryChangeFeed {
    /// Creates a feed with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        lock(&self.state).subscribers.len()
    }

    /// Makes new subscriptions fail with `reason`, or accept again on
    /// `None`.
    pub fn set_unavailable(&self, reason: Option<String>) {
        lock(&self.state).unavailable = reason;
    }

    /// Delivers `notification` to every subscriber whose topic accepts it.
    pub async fn publish(&self, notification: Notification, board: Option<BoardId>) {
        let kind = notification.entity_kind();
        let sinks: Vec<mpsc::Sender<FeedEvent>> = lock(&self.state)
            .subscribers
            .iter()
            .filter(|subscriber| subscriber.topic.accepts(kind, board))
            .map(|subscriber| subscriber.sink.clone())
            .collect();
        for sink in sinks {
            if sink.send(notification.clone().into()).await.is_err() {
                trace!(%kind, "subscriber queue closed");
            }
        }
    }

    /// Delivers a batch in order.
    pub async fn publish_all(&self, batch: Vec<(Notification, Option<BoardId>)>) {
        for (notification, board) in batch {
            self.publish(notification, board).await;
        }
    }

    /// Drops every subscription, telling each subscriber why.
    pub async fn disconnect_all(&self, reason: &str) {
        let dropped = std::mem::take(&mut lock(&self.state).subscribers);
        for subscriber in dropped {
            let event = FeedEvent::Disconnected {
                topic: subscriber.topic,
                reason: reason.to_owned(),
            };
            if subscriber.sink.send(event).await.is_err() {
                trace!(topic = %subscriber.topic, "subscriber queue closed");
            }
        }
    }

    fn release(state: &Weak<Mutex<FeedState>>, id: u64) {
        if let Some(shared) = state.upgrade() {
            lock(&shared)
                .subscribers
                .retain(|subscriber| subscriber.id != id);
        }
    }
}

#[async_trait]
impl ChangeFeed for InMemoryChangeFeed {
    async fn subscribe(
        &self,
        topic: FeedTopic,
        sink: mpsc::Sender<FeedEvent>,
    ) -> ChangeFeedResult<FeedSubscription> {
        let id = {
            let mut state = lock(&self.state);
            if let Some(reason) = &state.unavailable {
                return Err(ChangeFeedError::Unavailable(reason.clone()));
            }
            let assigned = state.next_id;
            state.next_id += 1;
            state.subscribers.push(Subscriber {
                id: assigned,
                topic,
                sink,
            });
            assigned
        };
        let weak = Arc::downgrade(&self.state);
        Ok(FeedSubscription::new(topic, move || Self::release(&weak, id)))
    }
}

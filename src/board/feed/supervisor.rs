//! Subscription lifetimes, the arrival-ordered queue, and reconnects.

use super::notification::{FeedEvent, FeedScope, FeedTopic};
use super::reconciler::apply_notification;
use crate::board::ports::{ChangeFeed, ChangeFeedError, FeedSubscription};
use crate::board::store::SharedStore;
use crate::config::FeedConfig;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

/// Exponential reconnect schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    initial: Duration,
    max: Duration,
    max_attempts: u32,
}

impl Backoff {
    /// Creates a schedule. `max_attempts == 0` retries forever.
    #[must_use]
    pub const fn new(initial: Duration, max: Duration, max_attempts: u32) -> Self {
        Self {
            initial,
            max,
            max_attempts,
        }
    }

    /// Builds the schedule described by `config`.
    #[must_use]
    pub const fn from_config(config: &FeedConfig) -> Self {
        Self::new(
            Duration::from_millis(config.reconnect_initial_delay_ms),
            Duration::from_millis(config.reconnect_max_delay_ms),
            config.reconnect_max_attempts,
        )
    }

    /// Delay before the 1-based `attempt`, or `None` once the budget is
    /// spent.
    #[must_use]
    pub fn delay(&self, attempt: u32) -> Option<Duration> {
        if attempt == 0 || (self.max_attempts != 0 && attempt > self.max_attempts) {
            return None;
        }
        let factor = 2_u32.saturating_pow(attempt - 1);
        Some(self.initial.saturating_mul(factor).min(self.max))
    }
}

#[derive(Default)]
struct Subscriptions {
    desired: HashSet<FeedTopic>,
    active: HashMap<FeedTopic, FeedSubscription>,
}

struct Inner<F> {
    feed: Arc<F>,
    store: SharedStore,
    backoff: Backoff,
    sink: mpsc::Sender<FeedEvent>,
    queue: Mutex<Option<mpsc::Receiver<FeedEvent>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
    subscriptions: Mutex<Subscriptions>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Owns change-feed subscriptions and the single queue that applies their
/// notifications to the store in arrival order.
///
/// The queue worker starts on the first subscription, so constructing a
/// supervisor outside a Tokio runtime is fine.
pub struct FeedSupervisor<F: ChangeFeed> {
    inner: Arc<Inner<F>>,
}

impl<F: ChangeFeed> Clone for FeedSupervisor<F> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<F: ChangeFeed> std::fmt::Debug for FeedSupervisor<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let subscriptions = lock(&self.inner.subscriptions);
        f.debug_struct("FeedSupervisor")
            .field("desired", &subscriptions.desired)
            .field("active", &subscriptions.active.len())
            .finish_non_exhaustive()
    }
}

impl<F: ChangeFeed> FeedSupervisor<F> {
    /// Creates a supervisor feeding `store` from `feed`.
    #[must_use]
    pub fn new(feed: Arc<F>, store: SharedStore, config: &FeedConfig) -> Self {
        let (sink, queue) = mpsc::channel(config.queue_capacity.max(1));
        Self {
            inner: Arc::new(Inner {
                feed,
                store,
                backoff: Backoff::from_config(config),
                sink,
                queue: Mutex::new(Some(queue)),
                worker: Mutex::new(None),
                subscriptions: Mutex::new(Subscriptions::default()),
            }),
        }
    }

    /// Subscribes to `topic`. Subscribing to an active topic is a no-op.
    ///
    /// A failed attempt leaves the topic wanted and schedules reconnects.
    ///
    /// # Errors
    ///
    /// Returns the [`ChangeFeedError`] of the first attempt.
    pub async fn subscribe(&self, topic: FeedTopic) -> Result<(), ChangeFeedError> {
        self.inner.ensure_worker();
        {
            let mut subscriptions = lock(&self.inner.subscriptions);
            subscriptions.desired.insert(topic);
            if subscriptions.active.contains_key(&topic) {
                return Ok(());
            }
        }
        match self.inner.feed.subscribe(topic, self.inner.sink.clone()).await {
            Ok(subscription) => {
                self.inner.install(topic, subscription);
                info!(%topic, "subscribed to change feed");
                Ok(())
            }
            Err(err) => {
                warn!(%topic, error = %err, "change feed subscription failed");
                self.inner
                    .store
                    .report_error(format!("live updates unavailable for {topic}: {err}"));
                Inner::schedule_reconnect(&self.inner, topic);
                Err(err)
            }
        }
    }

    /// Stops listening to `topic`.
    pub fn unsubscribe(&self, topic: FeedTopic) {
        let removed = {
            let mut subscriptions = lock(&self.inner.subscriptions);
            subscriptions.desired.remove(&topic);
            subscriptions.active.remove(&topic)
        };
        if let Some(subscription) = removed {
            subscription.unsubscribe();
            info!(%topic, "unsubscribed from change feed");
        }
    }

    /// Stops every board-scoped subscription, keeping process-wide ones.
    pub fn unsubscribe_board_scoped(&self) {
        let topics: Vec<FeedTopic> = {
            let subscriptions = lock(&self.inner.subscriptions);
            subscriptions
                .desired
                .iter()
                .chain(subscriptions.active.keys())
                .filter(|topic| matches!(topic.scope, FeedScope::Board(_)))
                .copied()
                .collect()
        };
        for topic in topics {
            self.unsubscribe(topic);
        }
    }

    /// Returns the topics with a live subscription.
    #[must_use]
    pub fn active_topics(&self) -> Vec<FeedTopic> {
        lock(&self.inner.subscriptions)
            .active
            .keys()
            .copied()
            .collect()
    }

    /// Waits until every event queued before this call has been applied.
    pub async fn settle(&self) {
        self.inner.ensure_worker();
        let (done, applied) = oneshot::channel();
        if self.inner.sink.send(FeedEvent::Barrier(done)).await.is_err() {
            return;
        }
        if applied.await.is_err() {
            trace!("feed worker stopped before barrier");
        }
    }

    /// Drops every subscription and stops the queue worker.
    pub fn shutdown(&self) {
        let active: Vec<FeedSubscription> = {
            let mut subscriptions = lock(&self.inner.subscriptions);
            subscriptions.desired.clear();
            subscriptions.active.drain().map(|(_, sub)| sub).collect()
        };
        for subscription in active {
            subscription.unsubscribe();
        }
        if let Some(worker) = lock(&self.inner.worker).take() {
            worker.abort();
        }
        info!("change feed supervisor stopped");
    }
}

impl<F: ChangeFeed> Inner<F> {
    fn ensure_worker(self: &Arc<Self>) {
        let Some(queue) = lock(&self.queue).take() else {
            return;
        };
        let handle = tokio::spawn(run_queue(self.store.clone(), queue, Arc::downgrade(self)));
        *lock(&self.worker) = Some(handle);
    }

    fn install(&self, topic: FeedTopic, subscription: FeedSubscription) {
        let stale = {
            let mut subscriptions = lock(&self.subscriptions);
            if subscriptions.desired.contains(&topic) {
                subscriptions.active.insert(topic, subscription)
            } else {
                Some(subscription)
            }
        };
        if let Some(dropped) = stale {
            dropped.unsubscribe();
        }
    }

    fn wants(&self, topic: FeedTopic) -> bool {
        lock(&self.subscriptions).desired.contains(&topic)
    }

    fn schedule_reconnect(this: &Arc<Self>, topic: FeedTopic) {
        if let Some(stale) = lock(&this.subscriptions).active.remove(&topic) {
            stale.unsubscribe();
        }
        let weak = Arc::downgrade(this);
        let backoff = this.backoff;
        tokio::spawn(async move {
            let mut attempt = 1;
            loop {
                let Some(delay) = backoff.delay(attempt) else {
                    if let Some(inner) = weak.upgrade() {
                        warn!(%topic, attempts = attempt - 1, "giving up on change feed reconnect");
                        inner
                            .store
                            .report_error(format!("live updates stopped for {topic}"));
                    }
                    return;
                };
                tokio::time::sleep(delay).await;
                let Some(inner) = weak.upgrade() else {
                    return;
                };
                if !inner.wants(topic) {
                    return;
                }
                match inner.feed.subscribe(topic, inner.sink.clone()).await {
                    Ok(subscription) => {
                        inner.install(topic, subscription);
                        info!(%topic, attempt, "change feed reconnected");
                        return;
                    }
                    Err(err) => {
                        debug!(%topic, attempt, error = %err, "reconnect attempt failed");
                        attempt += 1;
                    }
                }
            }
        });
    }
}

impl<F> Drop for Inner<F> {
    fn drop(&mut self) {
        if let Some(worker) = lock(&self.worker).take() {
            worker.abort();
        }
    }
}

async fn run_queue<F: ChangeFeed>(
    store: SharedStore,
    mut queue: mpsc::Receiver<FeedEvent>,
    supervisor: Weak<Inner<F>>,
) {
    while let Some(event) = queue.recv().await {
        match event {
            FeedEvent::Notification(notification) => {
                if !apply_notification(&store, notification) {
                    trace!("notification matched current state");
                }
            }
            FeedEvent::Disconnected { topic, reason } => {
                warn!(%topic, %reason, "change feed disconnected");
                store.report_error(format!("live updates interrupted for {topic}: {reason}"));
                if let Some(inner) = supervisor.upgrade()
                    && inner.wants(topic)
                {
                    Inner::schedule_reconnect(&inner, topic);
                }
            }
            FeedEvent::Barrier(done) => {
                if done.send(()).is_err() {
                    trace!("barrier waiter went away");
                }
            }
        }
    }
    debug!("change feed queue closed");
}

//! A single-writer snapshot store with push subscriptions.
//!
//! [`FeedPublisher`] holds the latest snapshot of one feed behind an `Arc`.
//! Publishing swaps in a new `Arc` and hands a clone of it to every
//! subscriber, so a consumer that is halfway through rendering an old
//! snapshot keeps a consistent view while the store moves on.
//!
//! ```text
//! publish(S) ──→ current = Arc<S> ──→ FeedEvent::Snapshot(Arc<S>) ──→ subscribers
//!                     │
//!          (no publish for stale_after)
//!                     ▼
//! clear() ──→ current = Arc<S::default()> ──→ FeedEvent::Cleared ──→ subscribers
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// What a subscriber receives.
#[derive(Debug)]
pub enum FeedEvent<S> {
    /// The feed's new full snapshot.
    Snapshot(Arc<S>),
    /// The feed went quiet and was reset to empty. Sent once per outage.
    Cleared,
}

// Derived Clone would require `S: Clone`; only the Arc is cloned.
impl<S> Clone for FeedEvent<S> {
    fn clone(&self) -> Self {
        match self {
            Self::Snapshot(s) => Self::Snapshot(Arc::clone(s)),
            Self::Cleared => Self::Cleared,
        }
    }
}

/// Receiving end of a feed subscription.
pub type FeedReceiver<S> = mpsc::UnboundedReceiver<FeedEvent<S>>;

/// Staleness settings for one feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedConfig {
    /// How long the feed may go without a publish before it is cleared.
    pub stale_after: Duration,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            stale_after: Duration::from_secs(12),
        }
    }
}

impl FeedConfig {
    /// Returns a copy with a zero `stale_after` replaced by the default.
    /// A zero window would clear the feed on every sweep.
    pub fn validated(mut self) -> Self {
        if self.stale_after.is_zero() {
            warn!("feed stale_after is zero, using default");
            self.stale_after = Self::default().stale_after;
        }
        self
    }
}

/// Latest snapshot of one feed plus everyone listening to it.
pub struct FeedPublisher<S> {
    name: &'static str,
    config: FeedConfig,
    current: Arc<S>,
    subscribers: Vec<mpsc::UnboundedSender<FeedEvent<S>>>,
    /// `None` until the first publish and again after every clear.
    last_update: Option<Instant>,
}

impl<S: Default> FeedPublisher<S> {
    /// Creates an empty feed. `name` only appears in logs.
    pub fn new(name: &'static str, config: FeedConfig) -> Self {
        Self {
            name,
            config: config.validated(),
            current: Arc::new(S::default()),
            subscribers: Vec::new(),
            last_update: None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    /// The current snapshot. Cheap: clones the `Arc`, not the data.
    pub fn snapshot(&self) -> Arc<S> {
        Arc::clone(&self.current)
    }

    /// When the feed was last published to, if it has live data.
    pub fn last_update(&self) -> Option<Instant> {
        self.last_update
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Registers a subscriber. If the feed currently holds data the
    /// receiver starts with that snapshot queued.
    pub fn subscribe(&mut self) -> FeedReceiver<S> {
        let (tx, rx) = mpsc::unbounded_channel();
        if self.last_update.is_some() {
            let _ = tx.send(FeedEvent::Snapshot(self.snapshot()));
        }
        self.subscribers.push(tx);
        rx
    }

    /// Replaces the snapshot and notifies subscribers.
    pub fn publish(&mut self, snapshot: S, now: Instant) {
        self.current = Arc::new(snapshot);
        self.last_update = Some(now);
        self.notify(FeedEvent::Snapshot(self.snapshot()));
    }

    /// Refreshes the staleness timer without publishing anything.
    pub fn touch(&mut self, now: Instant) {
        self.last_update = Some(now);
    }

    /// Resets the feed to empty and sends [`FeedEvent::Cleared`].
    ///
    /// Does nothing if the feed is already cleared, so an outage that
    /// spans many sweeps notifies only once. Returns whether it cleared.
    pub fn clear(&mut self) -> bool {
        if self.last_update.take().is_none() {
            return false;
        }
        self.current = Arc::new(S::default());
        info!(feed = self.name, "feed cleared");
        self.notify(FeedEvent::Cleared);
        true
    }

    /// Returns `true` if the feed holds data older than `stale_after`.
    pub fn is_stale(&self, now: Instant) -> bool {
        self.last_update
            .is_some_and(|t| now.saturating_duration_since(t) > self.config.stale_after)
    }

    /// Clears the feed if it is stale. Returns whether it cleared.
    pub fn expire(&mut self, now: Instant) -> bool {
        if self.is_stale(now) {
            debug!(feed = self.name, "no data within stale window");
            self.clear()
        } else {
            false
        }
    }

    /// Sends to every subscriber, dropping those whose receiver is gone.
    fn notify(&mut self, event: FeedEvent<S>) {
        let before = self.subscribers.len();
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
        let dropped = before - self.subscribers.len();
        if dropped > 0 {
            debug!(feed = self.name, dropped, "pruned closed subscribers");
        }
    }
}

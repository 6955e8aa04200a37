//! Snapshot publishing for the tactical telemetry feed.
//!
//! - [`Clock`] — where "now" comes from, injectable for tests.
//! - [`FeedPublisher`] — the latest snapshot of one feed, a pull accessor,
//!   push subscriptions, and a staleness timer that clears it.
//! - [`Feeds`] — the target, engagement, and threat feeds.
//!
//! The network-member feed is also a [`FeedPublisher`], but its snapshots
//! come from the reconciler rather than straight from a datagram.

mod clock;
mod feeds;
mod publisher;

pub use clock::{Clock, ManualClock, SystemClock, TokioClock};
pub use feeds::{EngagementFeed, Feeds, TargetFeed, ThreatFeed};
pub use publisher::{FeedConfig, FeedEvent, FeedPublisher, FeedReceiver};

//! The three single-source feeds: targets, engagements, threats.
//!
//! Each is a plain full-replace [`FeedPublisher`]: every datagram of the
//! matching opcode becomes the new snapshot, with no merge across packets.

use std::time::Instant;

use tacfeed_protocol::{Decoded, Engagement, Records, Target, Threat};
use tracing::debug;

use crate::{FeedConfig, FeedPublisher};

pub type TargetFeed = FeedPublisher<Vec<Target>>;
pub type EngagementFeed = FeedPublisher<Vec<Engagement>>;
pub type ThreatFeed = FeedPublisher<Vec<Threat>>;

/// Targets, engagements, and threats, routed by opcode.
pub struct Feeds {
    pub targets: TargetFeed,
    pub engagements: EngagementFeed,
    pub threats: ThreatFeed,
}

impl Feeds {
    /// Creates the three feeds with the same staleness settings.
    pub fn new(config: FeedConfig) -> Self {
        Self {
            targets: FeedPublisher::new("targets", config.clone()),
            engagements: FeedPublisher::new("engagements", config.clone()),
            threats: FeedPublisher::new("threats", config),
        }
    }

    /// Publishes `decoded` to its feed.
    ///
    /// A truncated datagram still replaces the snapshot with whatever
    /// prefix decoded. Returns `false` for opcodes these feeds don't own.
    pub fn ingest(&mut self, decoded: &Decoded, now: Instant) -> bool {
        match &decoded.records {
            Records::Targets(t) => self.targets.publish(t.clone(), now),
            Records::Engagements(e) => self.engagements.publish(e.clone(), now),
            Records::Threats(t) => self.threats.publish(t.clone(), now),
            Records::Positions(_) | Records::Details(_) => return false,
        }
        debug!(opcode = %decoded.opcode(), records = decoded.records.len(), "feed published");
        true
    }

    /// Clears every feed whose data is older than its window. Returns how
    /// many were cleared.
    pub fn expire(&mut self, now: Instant) -> usize {
        [
            self.targets.expire(now),
            self.engagements.expire(now),
            self.threats.expire(now),
        ]
        .into_iter()
        .filter(|&cleared| cleared)
        .count()
    }

    /// Clears all three feeds. Already-empty feeds stay silent.
    pub fn clear(&mut self) -> usize {
        [
            self.targets.clear(),
            self.engagements.clear(),
            self.threats.clear(),
        ]
        .into_iter()
        .filter(|&cleared| cleared)
        .count()
    }
}

impl Default for Feeds {
    fn default() -> Self {
        Self::new(FeedConfig::default())
    }
}

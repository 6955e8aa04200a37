//! Reconciler timing windows.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// The four windows that govern merging and expiry.
///
/// The defaults were chosen empirically against live traffic. They are
/// not derived from anything in the protocol, so hosts may tune them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconcilerConfig {
    /// A member appears in snapshots only if either stream mentioned it
    /// within this window.
    pub merge_window: Duration,
    /// A member neither stream has mentioned for longer than this is
    /// evicted from the store.
    pub node_stale: Duration,
    /// Detail fields older than this are cleared the next time a
    /// position report or sweep touches the member.
    pub detail_stale: Duration,
    /// With no position or detail datagram for longer than this, the whole
    /// store is cleared.
    pub feed_outage: Duration,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            merge_window: Duration::from_millis(500),
            node_stale: Duration::from_secs(3),
            detail_stale: Duration::from_secs(3),
            feed_outage: Duration::from_secs(12),
        }
    }
}

impl ReconcilerConfig {
    /// Returns a copy with inconsistent windows corrected.
    ///
    /// - `node_stale` is raised to at least `merge_window`, otherwise
    ///   members would be evicted while still meant to be visible.
    /// - `feed_outage` is raised to at least `node_stale`.
    pub fn validated(mut self) -> Self {
        if self.node_stale < self.merge_window {
            warn!(
                node_stale = ?self.node_stale,
                merge_window = ?self.merge_window,
                "node_stale shorter than merge_window, raising"
            );
            self.node_stale = self.merge_window;
        }
        if self.feed_outage < self.node_stale {
            warn!(
                feed_outage = ?self.feed_outage,
                node_stale = ?self.node_stale,
                "feed_outage shorter than node_stale, raising"
            );
            self.feed_outage = self.node_stale;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_windows() {
        let cfg = ReconcilerConfig::default();
        assert_eq!(cfg.merge_window, Duration::from_millis(500));
        assert_eq!(cfg.node_stale, Duration::from_secs(3));
        assert_eq!(cfg.detail_stale, Duration::from_secs(3));
        assert_eq!(cfg.feed_outage, Duration::from_secs(12));
    }

    #[test]
    fn test_validated_keeps_defaults() {
        assert_eq!(ReconcilerConfig::default().validated(), ReconcilerConfig::default());
    }

    #[test]
    fn test_validated_raises_short_windows() {
        let cfg = ReconcilerConfig {
            merge_window: Duration::from_secs(5),
            node_stale: Duration::from_secs(1),
            detail_stale: Duration::from_secs(3),
            feed_outage: Duration::from_secs(2),
        }
        .validated();
        assert_eq!(cfg.node_stale, Duration::from_secs(5));
        assert_eq!(cfg.feed_outage, Duration::from_secs(5));
    }
}

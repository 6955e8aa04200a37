//! Service configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tacfeed_feed::FeedConfig;
use tacfeed_protocol::DecoderConfig;
use tacfeed_reconcile::ReconcilerConfig;
use tacfeed_sweep::SweepConfig;
use tracing::warn;

/// Everything the ingestion service needs, with each layer's settings
/// nested under it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Where [`bind`](crate::bind) listens. Default: `0.0.0.0:5005`.
    pub bind_addr: String,
    /// With no datagram of any opcode for longer than this, every feed is
    /// cleared. Default: 12 s.
    pub feed_outage: Duration,
    /// Capacity of the handle-to-actor command queue.
    pub command_buffer: usize,
    /// If set, every datagram is appended to this file as a hex line. The
    /// file is truncated when the service starts.
    pub capture_path: Option<PathBuf>,
    pub decoder: DecoderConfig,
    pub reconciler: ReconcilerConfig,
    pub feeds: FeedConfig,
    pub sweep: SweepConfig,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:5005".to_string(),
            feed_outage: Duration::from_secs(12),
            command_buffer: 64,
            capture_path: None,
            decoder: DecoderConfig::default(),
            reconciler: ReconcilerConfig::default(),
            feeds: FeedConfig::default(),
            sweep: SweepConfig::default(),
        }
    }
}

impl IngestConfig {
    /// Returns a copy with every nested config validated and the service's
    /// own values corrected.
    pub fn validated(mut self) -> Self {
        self.decoder = self.decoder.validated();
        self.reconciler = self.reconciler.validated();
        self.feeds = self.feeds.validated();
        self.sweep = self.sweep.validated();

        if self.command_buffer == 0 {
            warn!("command_buffer is zero, using 1");
            self.command_buffer = 1;
        }
        if self.feed_outage < self.sweep.interval {
            warn!(
                feed_outage = ?self.feed_outage,
                interval = ?self.sweep.interval,
                "feed_outage shorter than sweep interval, raising"
            );
            self.feed_outage = self.sweep.interval;
        }
        self
    }
}

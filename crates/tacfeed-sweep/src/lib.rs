//! Periodic staleness-sweep scheduler.
//!
//! Staleness is a wall-clock comparison, but something still has to look
//! at the clock when no datagrams arrive. [`SweepScheduler`] is that
//! heartbeat: a fixed-interval timer that sits in the ingestion actor's
//! `select!` loop beside the datagram source, so sweeps and packet
//! handling never run at the same time.
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         datagram = source.recv() => { /* decode, reconcile, publish */ }
//!         () = scheduler.wait_for_sweep() => {
//!             reconciler.sweep();
//!             scheduler.record_sweep_end();
//!         }
//!     }
//! }
//! ```

use std::time::{Duration, Instant};

use rand::Rng;
use serde::{Deserialize, Serialize};
use tokio::time::{self, Instant as TokioInstant};
use tracing::{debug, trace, warn};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Sweep scheduler settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Time between sweeps. Default: 250 ms.
    pub interval: Duration,
    /// A warning is logged when a sweep's work takes more than this
    /// fraction of `interval`. Default: 0.5.
    pub budget_warn_threshold: f64,
    /// Random delay (0..max) added before the first sweep. Values under
    /// one microsecond mean no delay.
    pub initial_jitter: Duration,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(250),
            budget_warn_threshold: 0.5,
            initial_jitter: Duration::from_millis(10),
        }
    }
}

impl SweepConfig {
    /// Shortest interval accepted.
    pub const MIN_INTERVAL: Duration = Duration::from_millis(10);
    /// Longest interval accepted. Longer would let stale data outlive the
    /// shortest default window.
    pub const MAX_INTERVAL: Duration = Duration::from_secs(1);

    pub fn with_interval(interval: Duration) -> Self {
        Self {
            interval,
            ..Default::default()
        }
    }

    /// Clamp out-of-range values. Called by [`SweepScheduler::new`].
    pub fn validated(mut self) -> Self {
        let clamped = self.interval.clamp(Self::MIN_INTERVAL, Self::MAX_INTERVAL);
        if clamped != self.interval {
            warn!(
                interval = ?self.interval,
                clamped = ?clamped,
                "sweep interval out of range, clamping"
            );
            self.interval = clamped;
        }
        self.budget_warn_threshold = self.budget_warn_threshold.clamp(0.0, 1.0);
        self
    }

    fn first_delay(&self) -> Duration {
        let max = u64::try_from(self.initial_jitter.as_micros()).unwrap_or(u64::MAX);
        if max == 0 {
            return Duration::ZERO;
        }
        Duration::from_micros(rand::rng().random_range(0..max))
    }
}

// ---------------------------------------------------------------------------
// Scheduler
// ---------------------------------------------------------------------------

/// Fixed-interval sweep timer.
///
/// A late wakeup fires once and schedules the next sweep one interval from
/// now; missed sweeps are not replayed.
pub struct SweepScheduler {
    config: SweepConfig,
    sweep_count: u64,
    next_sweep: TokioInstant,
    sweep_start: Option<Instant>,
}

impl SweepScheduler {
    pub fn new(config: SweepConfig) -> Self {
        let config = config.validated();
        let jitter = config.first_delay();
        debug!(interval = ?config.interval, ?jitter, "sweep scheduler created");

        Self {
            next_sweep: TokioInstant::now() + config.interval + jitter,
            config,
            sweep_count: 0,
            sweep_start: None,
        }
    }

    pub fn with_interval(interval: Duration) -> Self {
        Self::new(SweepConfig::with_interval(interval))
    }

    /// Waits until the next sweep is due.
    ///
    /// Cancel-safe: if the future is dropped inside `select!` before it
    /// resolves, the deadline is unchanged and the next call waits for it
    /// again.
    pub async fn wait_for_sweep(&mut self) {
        let due = self.next_sweep;
        time::sleep_until(due).await;

        let now = TokioInstant::now();
        let interval = self.config.interval;
        self.sweep_count += 1;
        self.sweep_start = Some(Instant::now());

        let late_by = now.saturating_duration_since(due);
        if late_by >= interval {
            warn!(sweep = self.sweep_count, late_by = ?late_by, "sweep late, skipping ahead");
        }
        self.next_sweep = now + interval;
        trace!(sweep = self.sweep_count, "sweep due");
    }

    /// Records that the sweep's work has finished and warns if it used too
    /// much of the interval. A no-op if no sweep is in progress.
    pub fn record_sweep_end(&mut self) {
        let Some(start) = self.sweep_start.take() else {
            return;
        };
        let elapsed = start.elapsed();
        let utilization = elapsed.as_secs_f64() / self.config.interval.as_secs_f64();
        if utilization >= self.config.budget_warn_threshold {
            warn!(
                sweep = self.sweep_count,
                elapsed_ms = elapsed.as_secs_f64() * 1000.0,
                utilization_pct = format!("{:.1}", utilization * 100.0),
                "sweep work approaching interval"
            );
        }
    }

    pub fn sweep_count(&self) -> u64 {
        self.sweep_count
    }

    pub fn interval(&self) -> Duration {
        self.config.interval
    }
}

//! Time source for staleness decisions.
//!
//! Every window in this workspace (merge, node eviction, detail expiry,
//! feed outage) is a comparison between two instants. Where "now" comes
//! from is a [`Clock`], so tests can drive time by hand instead of
//! sleeping.
//!
//! - [`SystemClock`] — the monotonic OS clock.
//! - [`TokioClock`] — Tokio's clock, which honours `tokio::time::pause()`
//!   and `advance()` in tests.
//! - [`ManualClock`] — a shared instant moved only by [`ManualClock::advance`].

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Supplies the current instant.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use tacfeed_feed::{Clock, ManualClock};
///
/// let clock = ManualClock::new();
/// let start = clock.now();
/// clock.advance(Duration::from_secs(3));
/// assert_eq!(clock.now() - start, Duration::from_secs(3));
/// ```
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> Instant;
}

/// [`Instant::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// [`tokio::time::Instant::now`], converted to a std instant.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

impl Clock for TokioClock {
    fn now(&self) -> Instant {
        tokio::time::Instant::now().into_std()
    }
}

/// A clock that only moves when told to. Clones share the same instant.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<Instant>>,
}

impl ManualClock {
    /// Starts at the current OS instant.
    pub fn new() -> Self {
        Self {
            now: Arc::new(Mutex::new(Instant::now())),
        }
    }

    /// Moves every clone of this clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *now += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_clones_share_time() {
        let a = ManualClock::new();
        let b = a.clone();
        let start = b.now();
        a.advance(Duration::from_millis(250));
        assert_eq!(b.now() - start, Duration::from_millis(250));
    }

    #[test]
    fn test_manual_clock_is_frozen_between_advances() {
        let clock = ManualClock::new();
        assert_eq!(clock.now(), clock.now());
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_clock_follows_paused_time() {
        let clock = TokioClock;
        let start = clock.now();
        tokio::time::advance(Duration::from_secs(12)).await;
        assert_eq!(clock.now() - start, Duration::from_secs(12));
    }

    #[test]
    fn test_arc_dyn_clock_delegates() {
        let manual = ManualClock::new();
        let shared: Arc<dyn Clock> = Arc::new(manual.clone());
        manual.advance(Duration::from_secs(1));
        assert_eq!(shared.now(), manual.now());
    }
}

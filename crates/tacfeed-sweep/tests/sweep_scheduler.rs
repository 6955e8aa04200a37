//! Integration tests for the sweep scheduler.
//!
//! Runs on paused Tokio time: `sleep_until` resolves as soon as the
//! runtime auto-advances to the deadline, so intervals cost nothing.

use std::time::Duration;

use tacfeed_sweep::{SweepConfig, SweepScheduler};
use tokio::time::Instant;

// =========================================================================
// Helpers
// =========================================================================

fn config(interval_ms: u64) -> SweepConfig {
    SweepConfig {
        interval: Duration::from_millis(interval_ms),
        initial_jitter: Duration::ZERO,
        ..SweepConfig::default()
    }
}

// =========================================================================
// SweepConfig
// =========================================================================

#[test]
fn test_default_config_is_quarter_second() {
    let cfg = SweepConfig::default();
    assert_eq!(cfg.interval, Duration::from_millis(250));
    assert_eq!(cfg.initial_jitter, Duration::from_millis(10));
}

#[test]
fn test_validated_clamps_interval() {
    let fast = SweepConfig::with_interval(Duration::from_millis(1)).validated();
    assert_eq!(fast.interval, SweepConfig::MIN_INTERVAL);

    let slow = SweepConfig::with_interval(Duration::from_secs(30)).validated();
    assert_eq!(slow.interval, SweepConfig::MAX_INTERVAL);
}

#[test]
fn test_validated_clamps_threshold() {
    let cfg = SweepConfig {
        budget_warn_threshold: 4.0,
        ..SweepConfig::default()
    }
    .validated();
    assert_eq!(cfg.budget_warn_threshold, 1.0);
}

// =========================================================================
// Firing
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_sweeps_fire_at_interval() {
    let mut s = SweepScheduler::new(config(250));
    let start = Instant::now();

    for _ in 0..4 {
        s.wait_for_sweep().await;
        s.record_sweep_end();
    }
    assert_eq!(Instant::now() - start, Duration::from_millis(1000));
    assert_eq!(s.sweep_count(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_jitter_only_delays_first_sweep() {
    let cfg = SweepConfig {
        initial_jitter: Duration::from_millis(10),
        ..config(250)
    };
    let mut s = SweepScheduler::new(cfg);
    let start = Instant::now();
    s.wait_for_sweep().await;
    let first = Instant::now() - start;
    assert!(first >= Duration::from_millis(250));
    assert!(first < Duration::from_millis(260));

    let before = Instant::now();
    s.wait_for_sweep().await;
    assert_eq!(Instant::now() - before, Duration::from_millis(250));
}

#[tokio::test(start_paused = true)]
async fn test_sub_microsecond_jitter_is_no_delay() {
    let cfg = SweepConfig {
        initial_jitter: Duration::from_nanos(500),
        ..config(250)
    };
    let mut s = SweepScheduler::new(cfg);
    let start = Instant::now();
    s.wait_for_sweep().await;
    assert_eq!(Instant::now() - start, Duration::from_millis(250));
}

#[tokio::test(start_paused = true)]
async fn test_late_wakeup_reschedules_from_now() {
    let mut s = SweepScheduler::new(config(100));
    s.wait_for_sweep().await;

    // Stall for 3.5 intervals: one sweep fires, the missed ones don't.
    tokio::time::advance(Duration::from_millis(350)).await;
    s.wait_for_sweep().await;
    assert_eq!(s.sweep_count(), 2);

    let before = Instant::now();
    s.wait_for_sweep().await;
    assert_eq!(Instant::now() - before, Duration::from_millis(100));
    assert_eq!(s.sweep_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_dropped_wait_keeps_deadline() {
    let mut s = SweepScheduler::new(config(250));
    let start = Instant::now();

    let early = tokio::time::timeout(Duration::from_millis(100), s.wait_for_sweep()).await;
    assert!(early.is_err());
    assert_eq!(s.sweep_count(), 0);

    s.wait_for_sweep().await;
    assert_eq!(Instant::now() - start, Duration::from_millis(250));
}

#[test]
fn test_record_sweep_end_without_sweep_is_noop() {
    let mut s = SweepScheduler::with_interval(Duration::from_millis(250));
    s.record_sweep_end();
    assert_eq!(s.sweep_count(), 0);
}

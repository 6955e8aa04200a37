//! The entity reconciler: one keyed store fed by two streams.
//!
//! Position reports (opcode 101) arrive several times a second and carry
//! only kinematics. Detail reports (opcode 102) arrive less often and carry
//! everything else. Both describe the same members by `globalId`, so the
//! store merges them:
//!
//! ```text
//!                    ┌──────────────── entry ────────────────┐
//! 101 ──→ position   │ member      last_seen   last_detail   │
//!   (detail stale?   │   ├ position     ▲          ▲         │
//!    clear detail)   │   └ detail ──────┼──────────┘         │
//! 102 ──→ detail ────┘                  │                    │
//!                    └──────────────────┼────────────────────┘
//!                                       │
//! sweep ──→ evict if last_seen > node_stale
//!       ──→ clear detail if last_detail > detail_stale
//!       ──→ clear everything if no 101/102 for feed_outage
//! ```
//!
//! Snapshots include only members seen within the merge window, and are
//! handed out as owned copies (or `Arc`s to immutable copies through a
//! subscription), never as references into the store.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tacfeed_feed::{Clock, FeedConfig, FeedPublisher, FeedReceiver, SystemClock};
use tacfeed_protocol::{Decoded, GlobalId, MemberDetail, Opcode, PositionReport, Records};
use tracing::{debug, info};

use crate::{NetworkMember, ReconcilerConfig};

/// What consumers see: visible members ordered by id.
pub type MemberSnapshot = BTreeMap<GlobalId, NetworkMember>;

/// Per-member bookkeeping.
#[derive(Debug, Clone)]
struct Entry {
    member: NetworkMember,
    /// Last time either stream mentioned this member.
    last_seen: Instant,
    /// Last time the detail stream mentioned it. `None` once the detail
    /// fields have expired.
    last_detail_seen: Option<Instant>,
}

impl Entry {
    fn new(global_id: GlobalId, source: Opcode, now: Instant) -> Self {
        Self {
            member: NetworkMember::new(global_id, source),
            last_seen: now,
            last_detail_seen: None,
        }
    }

    /// Clears the detail fields if they are older than `window`. Returns
    /// whether anything was cleared.
    fn expire_detail(&mut self, now: Instant, window: Duration) -> bool {
        match self.last_detail_seen {
            Some(at) if now.saturating_duration_since(at) > window => {
                self.member.clear_detail();
                self.last_detail_seen = None;
                debug!(global_id = self.member.global_id, "detail expired");
                true
            }
            _ => false,
        }
    }
}

/// Result of one [`Reconciler::sweep`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepOutcome {
    /// Members removed for not being seen within `node_stale`.
    pub evicted: usize,
    /// Members whose detail fields expired.
    pub details_expired: usize,
    /// The whole store was cleared because both streams went quiet.
    pub cleared: bool,
    /// A new snapshot went out to subscribers.
    pub published: bool,
}

/// Merges position and detail reports into one member store.
///
/// Owned by a single task. Every mutation goes through `ingest*`,
/// [`sweep`](Self::sweep), or [`reset`](Self::reset).
pub struct Reconciler<C: Clock = SystemClock> {
    config: ReconcilerConfig,
    clock: C,
    entries: HashMap<GlobalId, Entry>,
    feed: FeedPublisher<MemberSnapshot>,
    /// Last 101/102 datagram. `None` before the first and after an outage.
    last_ingest: Option<Instant>,
}

impl<C: Clock> Reconciler<C> {
    pub fn new(config: ReconcilerConfig, clock: C) -> Self {
        let config = config.validated();
        let feed = FeedPublisher::new(
            "members",
            FeedConfig {
                stale_after: config.feed_outage,
            },
        );
        Self {
            config,
            clock,
            entries: HashMap::new(),
            feed,
            last_ingest: None,
        }
    }

    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Number of members in the store, visible or not.
    pub fn tracked(&self) -> usize {
        self.entries.len()
    }

    /// A member's merged record regardless of the merge window.
    pub fn get(&self, global_id: GlobalId) -> Option<&NetworkMember> {
        self.entries.get(&global_id).map(|e| &e.member)
    }

    // -----------------------------------------------------------------------
    // Ingest
    // -----------------------------------------------------------------------

    /// Merges a decoded datagram. Returns `false` for opcodes that don't
    /// describe network members.
    pub fn ingest(&mut self, decoded: &Decoded) -> bool {
        match &decoded.records {
            Records::Positions(reports) => self.ingest_positions(reports),
            Records::Details(details) => self.ingest_details(details),
            Records::Engagements(_) | Records::Targets(_) | Records::Threats(_) => return false,
        }
        true
    }

    /// Merges one position datagram.
    ///
    /// Kinematics are overwritten. Detail fields survive only while the
    /// detail stream is fresh for that member; otherwise they are cleared so
    /// a member can't keep an identity the detail stream no longer vouches
    /// for.
    pub fn ingest_positions(&mut self, reports: &[PositionReport]) {
        let now = self.clock.now();
        self.last_ingest = Some(now);

        for report in reports {
            let entry = self
                .entries
                .entry(report.global_id)
                .or_insert_with(|| Entry::new(report.global_id, Opcode::Position, now));
            entry.expire_detail(now, self.config.detail_stale);
            entry.member.apply_position(report);
            entry.last_seen = now;
        }
        self.publish(now);
    }

    /// Merges one detail datagram.
    ///
    /// Detail fields are overwritten and position is kept. Any stored
    /// member absent from this datagram loses mother status: only the
    /// detail stream can confer it, and it just stopped doing so.
    pub fn ingest_details(&mut self, details: &[MemberDetail]) {
        let now = self.clock.now();
        self.last_ingest = Some(now);

        let present: HashSet<GlobalId> = details.iter().map(|d| d.global_id).collect();
        for detail in details {
            let entry = self
                .entries
                .entry(detail.global_id)
                .or_insert_with(|| Entry::new(detail.global_id, Opcode::Detail, now));
            entry.member.apply_detail(detail);
            entry.last_seen = now;
            entry.last_detail_seen = Some(now);
        }

        for (id, entry) in &mut self.entries {
            if !present.contains(id) && entry.member.revoke_mother() {
                info!(global_id = id, "mother status revoked, absent from detail stream");
            }
        }
        self.publish(now);
    }

    // -----------------------------------------------------------------------
    // Read side
    // -----------------------------------------------------------------------

    /// Members seen within the merge window, as an owned copy.
    pub fn snapshot(&self) -> MemberSnapshot {
        self.view(self.clock.now())
    }

    /// The most recently published snapshot.
    pub fn latest(&self) -> Arc<MemberSnapshot> {
        self.feed.snapshot()
    }

    /// Subscribes to member snapshots and outage clears.
    pub fn subscribe(&mut self) -> FeedReceiver<MemberSnapshot> {
        self.feed.subscribe()
    }

    /// The visible member currently flagged as mother aircraft. If the
    /// stream flags several, the lowest id wins.
    pub fn mother(&self) -> Option<NetworkMember> {
        let now = self.clock.now();
        self.visible(now)
            .filter(|e| e.member.is_mother())
            .min_by_key(|e| e.member.global_id)
            .map(|e| e.member.clone())
    }

    // -----------------------------------------------------------------------
    // Expiry
    // -----------------------------------------------------------------------

    /// Applies every time-based rule. Call periodically.
    pub fn sweep(&mut self) -> SweepOutcome {
        let now = self.clock.now();
        let mut outcome = SweepOutcome::default();

        let Some(last_ingest) = self.last_ingest else {
            return outcome;
        };
        if now.saturating_duration_since(last_ingest) > self.config.feed_outage {
            info!(
                members = self.entries.len(),
                quiet = ?now.saturating_duration_since(last_ingest),
                "member streams silent, clearing store"
            );
            self.entries.clear();
            self.last_ingest = None;
            outcome.cleared = self.feed.clear();
            return outcome;
        }

        let node_stale = self.config.node_stale;
        let before = self.entries.len();
        self.entries.retain(|id, e| {
            let keep = now.saturating_duration_since(e.last_seen) <= node_stale;
            if !keep {
                debug!(global_id = id, "evicting stale member");
            }
            keep
        });
        outcome.evicted = before - self.entries.len();

        let detail_stale = self.config.detail_stale;
        outcome.details_expired = self
            .entries
            .values_mut()
            .map(|e| e.expire_detail(now, detail_stale))
            .filter(|&expired| expired)
            .count();

        let view = self.view(now);
        if view != *self.feed.snapshot() {
            self.feed.publish(view, now);
            outcome.published = true;
        }
        outcome
    }

    /// Empties the store, as on a fresh start. Subscribers see one
    /// [`FeedEvent::Cleared`](tacfeed_feed::FeedEvent::Cleared) if there was
    /// anything to clear.
    pub fn reset(&mut self) {
        if !self.entries.is_empty() {
            info!(members = self.entries.len(), "member store reset");
        }
        self.entries.clear();
        self.last_ingest = None;
        self.feed.clear();
    }

    fn visible(&self, now: Instant) -> impl Iterator<Item = &Entry> {
        let window = self.config.merge_window;
        self.entries
            .values()
            .filter(move |e| now.saturating_duration_since(e.last_seen) <= window)
    }

    fn view(&self, now: Instant) -> MemberSnapshot {
        self.visible(now)
            .map(|e| (e.member.global_id, e.member.clone()))
            .collect()
    }

    fn publish(&mut self, now: Instant) {
        let view = self.view(now);
        debug!(visible = view.len(), tracked = self.entries.len(), "members published");
        self.feed.publish(view, now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{detail, position};
    use tacfeed_feed::ManualClock;

    fn reconciler() -> (Reconciler<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        (Reconciler::new(ReconcilerConfig::default(), clock.clone()), clock)
    }

    #[test]
    fn test_entry_expire_detail_respects_window() {
        let now = Instant::now();
        let mut e = Entry::new(1, Opcode::Detail, now);
        e.member.apply_detail(&detail(1, true));
        e.last_detail_seen = Some(now);

        assert!(!e.expire_detail(now + Duration::from_secs(3), Duration::from_secs(3)));
        assert!(e.member.has_detail());
        assert!(e.expire_detail(now + Duration::from_millis(3_001), Duration::from_secs(3)));
        assert!(!e.member.has_detail());
        assert!(e.last_detail_seen.is_none());
    }

    #[test]
    fn test_ingest_ignores_other_opcodes() {
        let (mut r, _) = reconciler();
        let decoded = Decoded {
            records: Records::Threats(vec![]),
            fault: None,
        };
        assert!(!r.ingest(&decoded));
        assert_eq!(r.tracked(), 0);
    }

    #[test]
    fn test_sweep_before_any_ingest_is_noop() {
        let (mut r, clock) = reconciler();
        clock.advance(Duration::from_secs(60));
        assert_eq!(r.sweep(), SweepOutcome::default());
    }

    #[test]
    fn test_sweep_publishes_only_on_change() {
        let (mut r, clock) = reconciler();
        r.ingest_positions(&[position(1, 10.0, 20.0)]);

        clock.advance(Duration::from_millis(100));
        assert!(!r.sweep().published);

        // Falls out of the merge window: visible set changes.
        clock.advance(Duration::from_millis(500));
        let outcome = r.sweep();
        assert!(outcome.published);
        assert!(r.latest().is_empty());
        assert_eq!(r.tracked(), 1);
    }

    #[test]
    fn test_reset_empties_store() {
        let (mut r, _) = reconciler();
        r.ingest_positions(&[position(1, 0.0, 0.0), position(2, 0.0, 0.0)]);
        r.reset();
        assert_eq!(r.tracked(), 0);
        assert!(r.snapshot().is_empty());
        assert!(r.latest().is_empty());
    }
}

//! Ingestion service actor: one Tokio task that owns every store.
//!
//! The actor is the single writer. It receives datagrams from a
//! [`DatagramSource`], decodes them, and routes the records into the member
//! reconciler or the single-source feeds. A sweep timer in the same
//! `select!` loop applies the staleness rules. Everything else reaches the
//! stores through an [`IngestHandle`], which sends commands over a channel
//! and waits for the reply.
//!
//! ```text
//!  DatagramSource ──→ ┌──────── IngestActor ────────┐
//!                     │ decode ─→ Reconciler (101/102)
//!  SweepScheduler ──→ │        └→ Feeds (103/104/106)
//!                     │ sweep  ─→ expire / outage clear
//!  IngestHandle ────→ │ pulls, subscriptions, reset  │
//!                     └──────────────────────────────┘
//! ```

use std::sync::Arc;
use std::time::Instant;

use tacfeed_feed::{Clock, FeedReceiver, Feeds, SystemClock};
use tacfeed_protocol::{Engagement, OPCODE_OFFSET, Target, Threat, decode_with};
use tacfeed_reconcile::{MemberSnapshot, NetworkMember, Reconciler};
use tacfeed_sweep::SweepScheduler;
use tacfeed_transport::{DatagramSource, TransportError, UdpSource};
use tokio::sync::{mpsc, oneshot};
use tracing::{Level, debug, info, trace, warn};

use crate::capture::{RawCapture, hex};
use crate::{IngestConfig, TacfeedError};

/// Commands sent to the ingestion actor through its channel.
pub(crate) enum IngestCommand {
    Members {
        reply: oneshot::Sender<MemberSnapshot>,
    },
    Mother {
        reply: oneshot::Sender<Option<NetworkMember>>,
    },
    Targets {
        reply: oneshot::Sender<Arc<Vec<Target>>>,
    },
    Engagements {
        reply: oneshot::Sender<Arc<Vec<Engagement>>>,
    },
    Threats {
        reply: oneshot::Sender<Arc<Vec<Threat>>>,
    },
    SubscribeMembers {
        reply: oneshot::Sender<FeedReceiver<MemberSnapshot>>,
    },
    SubscribeTargets {
        reply: oneshot::Sender<FeedReceiver<Vec<Target>>>,
    },
    SubscribeEngagements {
        reply: oneshot::Sender<FeedReceiver<Vec<Engagement>>>,
    },
    SubscribeThreats {
        reply: oneshot::Sender<FeedReceiver<Vec<Threat>>>,
    },
    Stats {
        reply: oneshot::Sender<IngestStats>,
    },
    /// Empty every store, as on a fresh start.
    Reset {
        reply: oneshot::Sender<()>,
    },
    Shutdown,
}

/// Counters kept by the actor since it started.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    /// Datagrams received, known opcode or not.
    pub datagrams: u64,
    /// Datagrams routed to a decoder.
    pub decoded: u64,
    /// Datagrams with no known opcode.
    pub ignored: u64,
    /// Decoded datagrams whose decoder stopped early.
    pub faults: u64,
    pub sweeps: u64,
    /// Times every feed was cleared because nothing arrived at all.
    pub outages: u64,
}

// ---------------------------------------------------------------------------
// Handle
// ---------------------------------------------------------------------------

/// Handle to a running ingestion actor.
///
/// Cheap to clone. The actor stops on [`shutdown`](Self::shutdown), when
/// its datagram source is exhausted, or when every handle is dropped.
#[derive(Clone)]
pub struct IngestHandle {
    sender: mpsc::Sender<IngestCommand>,
}

impl IngestHandle {
    /// Members seen within the merge window.
    pub async fn members(&self) -> Result<MemberSnapshot, TacfeedError> {
        self.request(|reply| IngestCommand::Members { reply }).await
    }

    /// The visible member flagged as mother aircraft, if any.
    pub async fn mother(&self) -> Result<Option<NetworkMember>, TacfeedError> {
        self.request(|reply| IngestCommand::Mother { reply }).await
    }

    pub async fn targets(&self) -> Result<Arc<Vec<Target>>, TacfeedError> {
        self.request(|reply| IngestCommand::Targets { reply }).await
    }

    pub async fn engagements(&self) -> Result<Arc<Vec<Engagement>>, TacfeedError> {
        self.request(|reply| IngestCommand::Engagements { reply }).await
    }

    pub async fn threats(&self) -> Result<Arc<Vec<Threat>>, TacfeedError> {
        self.request(|reply| IngestCommand::Threats { reply }).await
    }

    /// Subscribes to member snapshots. The current snapshot, if any, is
    /// queued immediately.
    pub async fn subscribe_members(&self) -> Result<FeedReceiver<MemberSnapshot>, TacfeedError> {
        self.request(|reply| IngestCommand::SubscribeMembers { reply })
            .await
    }

    pub async fn subscribe_targets(&self) -> Result<FeedReceiver<Vec<Target>>, TacfeedError> {
        self.request(|reply| IngestCommand::SubscribeTargets { reply })
            .await
    }

    pub async fn subscribe_engagements(
        &self,
    ) -> Result<FeedReceiver<Vec<Engagement>>, TacfeedError> {
        self.request(|reply| IngestCommand::SubscribeEngagements { reply })
            .await
    }

    pub async fn subscribe_threats(&self) -> Result<FeedReceiver<Vec<Threat>>, TacfeedError> {
        self.request(|reply| IngestCommand::SubscribeThreats { reply })
            .await
    }

    pub async fn stats(&self) -> Result<IngestStats, TacfeedError> {
        self.request(|reply| IngestCommand::Stats { reply }).await
    }

    /// Empties every store. Subscribers of non-empty feeds see one
    /// `Cleared` each.
    pub async fn reset(&self) -> Result<(), TacfeedError> {
        self.request(|reply| IngestCommand::Reset { reply }).await
    }

    /// Tells the actor to stop.
    pub async fn shutdown(&self) -> Result<(), TacfeedError> {
        self.sender
            .send(IngestCommand::Shutdown)
            .await
            .map_err(|_| TacfeedError::Unavailable)
    }

    /// Waits until the actor has stopped.
    pub async fn closed(&self) {
        self.sender.closed().await
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> IngestCommand,
    ) -> Result<T, TacfeedError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(command(reply_tx))
            .await
            .map_err(|_| TacfeedError::Unavailable)?;
        reply_rx.await.map_err(|_| TacfeedError::Unavailable)
    }
}

// ---------------------------------------------------------------------------
// Spawning
// ---------------------------------------------------------------------------

/// Binds a UDP socket at `config.bind_addr` and spawns the actor on it
/// with the system clock.
pub async fn bind(config: IngestConfig) -> Result<IngestHandle, TacfeedError> {
    let source = UdpSource::bind(&config.bind_addr).await?;
    info!(addr = %source.local_addr(), "listening for telemetry");
    spawn_ingest(source, SystemClock, config)
}

/// Spawns the ingestion actor on the current Tokio runtime.
///
/// Fails only if a capture file was requested and can't be created.
pub fn spawn_ingest<S, C>(
    source: S,
    clock: C,
    config: IngestConfig,
) -> Result<IngestHandle, TacfeedError>
where
    S: DatagramSource,
    C: Clock,
{
    let config = config.validated();
    let capture = config
        .capture_path
        .as_ref()
        .map(RawCapture::create)
        .transpose()?;
    let (sender, receiver) = mpsc::channel(config.command_buffer);

    let actor = IngestActor {
        source,
        reconciler: Reconciler::new(config.reconciler.clone(), clock),
        feeds: Feeds::new(config.feeds.clone()),
        scheduler: SweepScheduler::new(config.sweep.clone()),
        capture,
        receiver,
        last_datagram: None,
        stats: IngestStats::default(),
        config,
    };
    tokio::spawn(actor.run());

    Ok(IngestHandle { sender })
}

// ---------------------------------------------------------------------------
// Actor
// ---------------------------------------------------------------------------

struct IngestActor<S, C: Clock> {
    config: IngestConfig,
    source: S,
    reconciler: Reconciler<C>,
    feeds: Feeds,
    scheduler: SweepScheduler,
    capture: Option<RawCapture>,
    receiver: mpsc::Receiver<IngestCommand>,
    /// Last datagram of any opcode. `None` before the first and after an
    /// outage.
    last_datagram: Option<Instant>,
    stats: IngestStats,
}

impl<S: DatagramSource, C: Clock> IngestActor<S, C> {
    async fn run(mut self) {
        info!(outage = ?self.config.feed_outage, "ingestion service started");
        self.reset();

        loop {
            tokio::select! {
                cmd = self.receiver.recv() => match cmd {
                    Some(IngestCommand::Shutdown) => {
                        info!("ingestion service shutting down");
                        break;
                    }
                    Some(cmd) => self.handle_command(cmd),
                    None => {
                        debug!("all handles dropped");
                        break;
                    }
                },
                received = self.source.recv() => match received {
                    Ok(Some(datagram)) => self.handle_datagram(&datagram),
                    Ok(None) | Err(TransportError::Closed) => {
                        info!("datagram source closed");
                        break;
                    }
                    Err(e) => warn!(error = %e, "receive failed, continuing"),
                },
                _ = self.scheduler.wait_for_sweep() => {
                    self.sweep();
                    self.scheduler.record_sweep_end();
                }
            }
        }

        info!(
            datagrams = self.stats.datagrams,
            faults = self.stats.faults,
            "ingestion service stopped"
        );
    }

    fn handle_command(&mut self, cmd: IngestCommand) {
        // A dropped reply receiver means the caller gave up; nothing to do.
        match cmd {
            IngestCommand::Members { reply } => {
                let _ = reply.send(self.reconciler.snapshot());
            }
            IngestCommand::Mother { reply } => {
                let _ = reply.send(self.reconciler.mother());
            }
            IngestCommand::Targets { reply } => {
                let _ = reply.send(self.feeds.targets.snapshot());
            }
            IngestCommand::Engagements { reply } => {
                let _ = reply.send(self.feeds.engagements.snapshot());
            }
            IngestCommand::Threats { reply } => {
                let _ = reply.send(self.feeds.threats.snapshot());
            }
            IngestCommand::SubscribeMembers { reply } => {
                let _ = reply.send(self.reconciler.subscribe());
            }
            IngestCommand::SubscribeTargets { reply } => {
                let _ = reply.send(self.feeds.targets.subscribe());
            }
            IngestCommand::SubscribeEngagements { reply } => {
                let _ = reply.send(self.feeds.engagements.subscribe());
            }
            IngestCommand::SubscribeThreats { reply } => {
                let _ = reply.send(self.feeds.threats.subscribe());
            }
            IngestCommand::Stats { reply } => {
                let _ = reply.send(self.stats);
            }
            IngestCommand::Reset { reply } => {
                self.reset();
                let _ = reply.send(());
            }
            IngestCommand::Shutdown => {}
        }
    }

    fn handle_datagram(&mut self, datagram: &[u8]) {
        let now = self.reconciler.clock().now();
        self.stats.datagrams += 1;
        self.last_datagram = Some(now);

        if let Some(capture) = &mut self.capture {
            capture.record(datagram);
        }
        if tracing::enabled!(Level::TRACE) {
            trace!(
                opcode = ?datagram.get(OPCODE_OFFSET),
                len = datagram.len(),
                hex = %hex(datagram),
                "datagram received"
            );
        }

        let Some(decoded) = decode_with(datagram, &self.config.decoder) else {
            self.stats.ignored += 1;
            return;
        };
        self.stats.decoded += 1;
        if let Some(fault) = &decoded.fault {
            // The decoder already logged the details.
            self.stats.faults += 1;
            debug!(
                opcode = %decoded.opcode(),
                kept = decoded.records.len(),
                %fault,
                "partial datagram"
            );
        }

        if !self.reconciler.ingest(&decoded) {
            self.feeds.ingest(&decoded, now);
        }
    }

    fn sweep(&mut self) {
        let now = self.reconciler.clock().now();
        self.stats.sweeps += 1;

        if let Some(last) = self.last_datagram {
            let quiet = now.saturating_duration_since(last);
            if quiet > self.config.feed_outage {
                info!(quiet = ?quiet, "no datagrams, clearing every feed");
                self.stats.outages += 1;
                self.reset();
                return;
            }
        }

        let outcome = self.reconciler.sweep();
        let expired = self.feeds.expire(now);
        if outcome.evicted > 0 || outcome.details_expired > 0 || outcome.cleared || expired > 0 {
            debug!(
                evicted = outcome.evicted,
                details_expired = outcome.details_expired,
                members_cleared = outcome.cleared,
                feeds_expired = expired,
                "sweep"
            );
        }
    }

    fn reset(&mut self) {
        self.last_datagram = None;
        self.reconciler.reset();
        let cleared = self.feeds.clear();
        debug!(feeds_cleared = cleared, "stores reset");
    }
}

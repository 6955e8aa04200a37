//! # tacfeed
//!
//! Ingestion for a tactical telemetry feed carried in UDP datagrams.
//!
//! The service listens on one port, decodes five binary message types, and
//! keeps the latest picture of each: network members (merged from a
//! position stream and a detail stream), targets, engagements, and threats.
//! Consumers pull snapshots or subscribe to them through an
//! [`IngestHandle`]. State that stops being refreshed is expired, and a
//! complete silence clears everything so nobody keeps displaying a frozen
//! picture.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tacfeed::prelude::*;
//!
//! # async fn run() -> Result<(), TacfeedError> {
//! let handle = tacfeed::bind(IngestConfig::default()).await?;
//! let mut members = handle.subscribe_members().await?;
//! while let Some(event) = members.recv().await {
//!     match event {
//!         FeedEvent::Snapshot(snapshot) => println!("{} members", snapshot.len()),
//!         FeedEvent::Cleared => println!("feed lost"),
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Crates
//!
//! - `tacfeed-protocol` — wire reader, record types, decoders, dispatcher
//! - `tacfeed-transport` — datagram sources (UDP, in-process channel)
//! - `tacfeed-feed` — snapshot publishers and the clock seam
//! - `tacfeed-reconcile` — the network-member reconciler
//! - `tacfeed-sweep` — the staleness sweep timer

mod capture;
mod config;
mod error;
mod service;

pub use capture::RawCapture;
pub use config::IngestConfig;
pub use error::TacfeedError;
pub use service::{IngestHandle, IngestStats, bind, spawn_ingest};

pub use tacfeed_feed as feed;
pub use tacfeed_protocol as protocol;
pub use tacfeed_reconcile as reconcile;
pub use tacfeed_sweep as sweep;
pub use tacfeed_transport as transport;

/// The types most hosts need.
pub mod prelude {
    pub use crate::{IngestConfig, IngestHandle, IngestStats, TacfeedError, bind, spawn_ingest};
    pub use tacfeed_feed::{Clock, FeedEvent, FeedReceiver, SystemClock, TokioClock};
    pub use tacfeed_protocol::{Codec, Engagement, Opcode, Target, Threat};
    pub use tacfeed_reconcile::{MemberSnapshot, NetworkMember};
    pub use tacfeed_transport::{ChannelSource, DatagramSource, UdpSource};
}

//! Datagram sources for the tactical telemetry feed.
//!
//! The ingestion service doesn't care where datagrams come from, only that
//! they arrive one at a time and in order. [`DatagramSource`] is that
//! contract. Two implementations ship here:
//!
//! - [`UdpSource`] — a bound UDP socket with broadcast reception enabled.
//! - [`ChannelSource`] — an in-process channel, for tests and for hosts
//!   that already own the socket.
//!
//! # Feature Flags
//!
//! - `udp` (default) — the socket-backed source.

mod channel;
mod error;
#[cfg(feature = "udp")]
mod udp;

pub use channel::{ChannelSource, DatagramSender};
pub use error::TransportError;
#[cfg(feature = "udp")]
pub use udp::{MAX_DATAGRAM_LEN, UdpSource};

/// Produces raw datagrams, one per call.
///
/// `recv` returns a `Send` future so a service generic over the source can
/// be moved onto the Tokio runtime with `tokio::spawn`.
pub trait DatagramSource: Send + 'static {
    /// Waits for the next datagram.
    ///
    /// Returns `Ok(None)` once the source is exhausted and will never
    /// produce more. A `ReceiveFailed` error is transient: the caller
    /// should log it and call `recv` again.
    fn recv(&mut self) -> impl Future<Output = Result<Option<Vec<u8>>, TransportError>> + Send;
}

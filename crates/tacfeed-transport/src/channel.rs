//! In-process datagram source backed by a Tokio mpsc channel.

use tokio::sync::mpsc;

use crate::{DatagramSource, TransportError};

/// Sending half of a [`ChannelSource`].
pub type DatagramSender = mpsc::Sender<Vec<u8>>;

/// A [`DatagramSource`] fed through a bounded channel.
///
/// The source is exhausted once every [`DatagramSender`] has been dropped
/// and the buffered datagrams have been drained.
pub struct ChannelSource {
    rx: mpsc::Receiver<Vec<u8>>,
}

impl ChannelSource {
    /// Creates a source and its sender with room for `capacity` queued
    /// datagrams.
    pub fn new(capacity: usize) -> (DatagramSender, Self) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (tx, Self { rx })
    }
}

impl DatagramSource for ChannelSource {
    async fn recv(&mut self) -> Result<Option<Vec<u8>>, TransportError> {
        Ok(self.rx.recv().await)
    }
}

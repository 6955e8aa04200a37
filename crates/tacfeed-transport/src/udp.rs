//! UDP datagram source using `tokio::net::UdpSocket`.

use std::net::SocketAddr;

use tokio::net::UdpSocket;
use tracing::{debug, info};

use crate::{DatagramSource, TransportError};

/// Largest payload a UDP datagram can carry.
pub const MAX_DATAGRAM_LEN: usize = 65_535;

/// A [`DatagramSource`] reading from a bound UDP socket.
///
/// The transmitter broadcasts, so the socket is bound to a local port
/// (usually on all interfaces) with `SO_BROADCAST` set.
pub struct UdpSource {
    socket: UdpSocket,
    local_addr: SocketAddr,
    buf: Box<[u8]>,
}

impl UdpSource {
    /// Binds a socket to `addr` and enables broadcast reception.
    pub async fn bind(addr: &str) -> Result<Self, TransportError> {
        let bind_failed = |source| TransportError::BindFailed {
            addr: addr.to_string(),
            source,
        };
        let socket = UdpSocket::bind(addr).await.map_err(bind_failed)?;
        socket.set_broadcast(true).map_err(bind_failed)?;
        let local_addr = socket.local_addr().map_err(bind_failed)?;
        info!(%local_addr, "UDP source listening");

        Ok(Self {
            socket,
            local_addr,
            buf: vec![0u8; MAX_DATAGRAM_LEN].into_boxed_slice(),
        })
    }

    /// The address the socket is actually bound to. Useful after binding
    /// to port 0.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }
}

impl DatagramSource for UdpSource {
    async fn recv(&mut self) -> Result<Option<Vec<u8>>, TransportError> {
        let (len, peer) = self
            .socket
            .recv_from(&mut self.buf)
            .await
            .map_err(TransportError::ReceiveFailed)?;
        debug!(%peer, len, "received datagram");
        Ok(Some(self.buf[..len].to_vec()))
    }
}

//! Unified error type for the tacfeed service.

use tacfeed_protocol::ProtocolError;
use tacfeed_transport::TransportError;

/// Top-level error that wraps the layer errors.
///
/// Hosts embedding the service deal with this one type. `?` converts the
/// layer errors through the `#[from]` impls.
#[derive(Debug, thiserror::Error)]
pub enum TacfeedError {
    /// Binding or reading the datagram source failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Encoding a snapshot for a downstream consumer failed.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Opening the raw capture file failed.
    #[error("capture file {path}: {source}")]
    Capture {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The ingestion task has stopped and can't answer.
    #[error("ingestion service unavailable")]
    Unavailable,
}

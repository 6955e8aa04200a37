/// Errors that can occur in the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Binding the socket failed (address in use, no permission, bad address).
    #[error("bind to {addr} failed: {source}")]
    BindFailed {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// Receiving a datagram failed. The source is still usable.
    #[error("receive failed: {0}")]
    ReceiveFailed(#[source] std::io::Error),

    /// The source can never produce another datagram.
    #[error("datagram source closed")]
    Closed,
}

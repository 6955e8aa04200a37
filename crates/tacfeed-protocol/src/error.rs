//! Error types for the protocol layer.
//!
//! Decoding a datagram never fails as a whole. A decoder that runs out of
//! bytes or loses its place in the stream stops early and reports *why* it
//! stopped through a [`DecodeFault`]; everything decoded before that point is
//! still handed to the caller. [`ProtocolError`] covers the remaining, truly
//! fallible operations (opcode lookup and the JSON codec).

/// Why a decoder stopped before reaching the declared record count.
///
/// A fault is diagnostic, not fatal: it travels alongside the records that
/// were decoded successfully so the ingestion loop can log it and move on.
/// `index` is the zero-based record that could not be decoded and `offset`
/// the byte offset at which it starts, which is what you need when chasing
/// wire-format drift against a packet capture.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeFault {
    /// The datagram ended before a declared field or record was complete.
    #[error(
        "opcode {opcode}: record {index} truncated at byte {offset} \
         (need {needed} bytes, datagram has {len})"
    )]
    Truncated {
        opcode: u8,
        index: usize,
        offset: usize,
        needed: usize,
        len: usize,
    },

    /// The decoder read something implausible (an oversized array count,
    /// a zero identity mid-stream) and can no longer trust its cursor.
    #[error("opcode {opcode}: desync at record {index}, byte {offset}: {reason}")]
    Desync {
        opcode: u8,
        index: usize,
        offset: usize,
        reason: String,
    },
}

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// The byte at the opcode position does not name a known message type.
    #[error("unknown opcode {0}")]
    UnknownOpcode(u8),

    /// A decoder stopped early.
    #[error(transparent)]
    Fault(#[from] DecodeFault),

    /// Serializing a record or snapshot for downstream consumers failed.
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserializing a record or snapshot failed.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),
}

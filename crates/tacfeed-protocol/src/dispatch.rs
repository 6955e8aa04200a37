//! Opcode routing.

use tracing::trace;

use crate::decode::{
    DecoderConfig, decode_details, decode_engagements, decode_positions, decode_targets,
    decode_threats,
};
use crate::wire::pack_ascii_binary;
use crate::{Decoded, Opcode, Records};

/// Byte within the envelope that carries the opcode.
pub const OPCODE_OFFSET: usize = 1;

/// Decodes a datagram with the default [`DecoderConfig`].
///
/// Returns `None` when the datagram carries no known opcode, which is not an
/// error: the feed shares its port with traffic this crate doesn't model.
///
/// ```rust
/// use tacfeed_protocol::{decode, Opcode, Records};
///
/// let mut datagram = vec![0u8; 16];
/// datagram[1] = 106;
/// datagram.extend_from_slice(&[0, 0, 0, 42, 0, 0, 0, 0]); // sender 42, no threats
///
/// let decoded = decode(&datagram).unwrap();
/// assert_eq!(decoded.opcode(), Opcode::Threat);
/// assert!(matches!(decoded.records, Records::Threats(ref t) if t.is_empty()));
/// ```
pub fn decode(buf: &[u8]) -> Option<Decoded> {
    decode_with(buf, &DecoderConfig::default())
}

/// Decodes a datagram with explicit decoder limits.
///
/// A datagram whose opcode byte is unknown is given a second chance if it
/// is ASCII text made only of `'0'` and `'1'`: the digits are packed into
/// bytes and that buffer is dispatched instead. Senders that emit raw bytes
/// never reach this path.
pub fn decode_with(buf: &[u8], config: &DecoderConfig) -> Option<Decoded> {
    if let Some(decoded) = route(buf, config) {
        return Some(decoded);
    }
    let packed = pack_ascii_binary(buf)?;
    trace!(len = buf.len(), packed = packed.len(), "decoding ascii-binary datagram");
    route(&packed, config)
}

fn route(buf: &[u8], config: &DecoderConfig) -> Option<Decoded> {
    let code = *buf.get(OPCODE_OFFSET)?;
    let opcode = match Opcode::try_from(code) {
        Ok(opcode) => opcode,
        Err(_) => {
            trace!(opcode = code, len = buf.len(), "ignoring datagram with unknown opcode");
            return None;
        }
    };

    let decoded = match opcode {
        Opcode::Position => Decoded::from_partial(decode_positions(buf), Records::Positions),
        Opcode::Detail => Decoded::from_partial(decode_details(buf, config), Records::Details),
        Opcode::Engagement => {
            Decoded::from_partial(decode_engagements(buf), Records::Engagements)
        }
        Opcode::Target => Decoded::from_partial(decode_targets(buf), Records::Targets),
        Opcode::Threat => Decoded::from_partial(decode_threats(buf), Records::Threats),
    };
    Some(decoded)
}

//! Opcode 106: threats seen by one sender.
//!
//! ```text
//! offset  size  field
//!   16     4    senderGlobalId  u32
//!   20     1    numOfThreats
//!   21     3    reserved
//!   24    12    threat[0]
//!
//! threat:
//!    0     1    threatId
//!    1     1    isSearchMode
//!    2     1    isLockOn
//!    3     1    threatType
//!    4     1    threatRange     metres
//!    5     3    reserved
//!    8     2    threatAzimuth   u16, degrees
//!   10     2    threatFrequency u16
//! ```

use crate::decode::{HEADER_LEN, truncated};
use crate::wire::Cursor;
use crate::{Opcode, Partial, Threat};

/// Width of one threat record.
pub const THREAT_RECORD_LEN: usize = 12;

/// Decodes an opcode 106 datagram. Every threat carries the sender id
/// from the datagram preamble.
pub fn decode_threats(buf: &[u8]) -> Partial<Threat> {
    let mut cur = Cursor::new(buf, HEADER_LEN);
    if !cur.has(5) {
        return Partial::halted(truncated(Opcode::Threat, 0, cur.pos(), 5, buf.len()));
    }
    let sender_global_id = cur.take_u32();
    let count = usize::from(cur.take_u8());
    cur.skip(3);

    let mut out = Partial::with_capacity(count);
    for index in 0..count {
        if !cur.has(THREAT_RECORD_LEN) {
            let fault = truncated(Opcode::Threat, index, cur.pos(), THREAT_RECORD_LEN, buf.len());
            return out.halt(fault);
        }
        let threat_id = cur.take_u8();
        let is_search_mode = cur.take_u8();
        let is_lock_on = cur.take_u8();
        let threat_type = cur.take_u8();
        let threat_range = cur.take_u8();
        cur.skip(3);
        out.push(Threat {
            opcode: Opcode::Threat,
            sender_global_id,
            threat_id,
            is_search_mode,
            is_lock_on,
            threat_type,
            threat_range,
            threat_azimuth: cur.take_u16(),
            threat_frequency: cur.take_u16(),
        });
    }
    out
}

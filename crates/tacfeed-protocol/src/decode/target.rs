//! Opcode 104: targets.
//!
//! Unlike the other list opcodes the count is 16 bits wide, and latitude
//! and longitude arrive as IEEE-754 single-precision degrees rather than
//! scaled integers.
//!
//! ```text
//! offset  size  field
//!   16     2    numOfTargets    u16
//!   18     2    reserved
//!   20    24    target[0]
//!
//! target:
//!    0     4    globalId        u32
//!    4     4    latitude        f32, degrees
//!    8     4    longitude       f32, degrees
//!   12     2    altitude        i16 × ALTITUDE
//!   14     2    heading         i16 × TRUE_HEADING
//!   16     2    groundSpeed     i16 × GROUND_SPEED
//!   18     2    reserved
//!   20     4    range           u32, unscaled
//! ```

use crate::decode::{HEADER_LEN, truncated};
use crate::wire::Cursor;
use crate::{Opcode, Partial, Target, scale};

/// Width of one target record.
pub const TARGET_RECORD_LEN: usize = 24;

/// Decodes an opcode 104 datagram.
pub fn decode_targets(buf: &[u8]) -> Partial<Target> {
    let mut cur = Cursor::new(buf, HEADER_LEN);
    if !cur.has(2) {
        return Partial::halted(truncated(Opcode::Target, 0, cur.pos(), 2, buf.len()));
    }
    let count = usize::from(cur.take_u16());
    cur.skip(2);

    // A corrupt u16 count can claim far more records than the datagram
    // could hold; size the buffer by what actually fits.
    let mut out = Partial::with_capacity(count.min(cur.remaining() / TARGET_RECORD_LEN));
    for index in 0..count {
        if !cur.has(TARGET_RECORD_LEN) {
            let fault = truncated(Opcode::Target, index, cur.pos(), TARGET_RECORD_LEN, buf.len());
            return out.halt(fault);
        }
        let global_id = cur.take_u32();
        let latitude = f64::from(cur.take_f32());
        let longitude = f64::from(cur.take_f32());
        let altitude = f64::from(cur.take_i16()) * scale::ALTITUDE;
        let heading = f64::from(cur.take_i16()) * scale::TRUE_HEADING;
        let ground_speed = f64::from(cur.take_i16()) * scale::GROUND_SPEED;
        cur.skip(2);
        out.push(Target {
            opcode: Opcode::Target,
            global_id,
            latitude,
            longitude,
            altitude,
            heading,
            ground_speed,
            range: cur.take_u32(),
        });
    }
    out
}

//! Opcode 101: member positions.
//!
//! ```text
//! offset  size  field
//!   16     1    numOfNetworkMembers
//!   17     3    reserved
//!   20    24    member[0]
//!
//! member:
//!    0     4    globalId      u32
//!    4     4    latitude      i32 × LATITUDE
//!    8     4    longitude     i32 × LONGITUDE
//!   12     2    altitude      i16 × ALTITUDE
//!   14     2    veIn          i16 × VEL_NORTH
//!   16     2    veIe          i16 × VEL_EAST
//!   18     2    veIu          i16 × VEL_UP
//!   20     2    trueHeading   i16 × TRUE_HEADING
//!   22     2    reserved      i16
//! ```

use crate::decode::{HEADER_LEN, truncated};
use crate::wire::Cursor;
use crate::{Opcode, Partial, PositionReport, scale};

/// Width of one member record.
pub const POSITION_RECORD_LEN: usize = 24;

/// Decodes an opcode 101 datagram.
pub fn decode_positions(buf: &[u8]) -> Partial<PositionReport> {
    let mut cur = Cursor::new(buf, HEADER_LEN);
    if !cur.has(1) {
        return Partial::halted(truncated(Opcode::Position, 0, cur.pos(), 1, buf.len()));
    }
    let count = usize::from(cur.take_u8());
    cur.skip(3);

    let mut out = Partial::with_capacity(count);
    for index in 0..count {
        if !cur.has(POSITION_RECORD_LEN) {
            let fault = truncated(Opcode::Position, index, cur.pos(), POSITION_RECORD_LEN, buf.len());
            return out.halt(fault);
        }
        out.push(PositionReport {
            global_id: cur.take_u32(),
            latitude: f64::from(cur.take_i32()) * scale::LATITUDE,
            longitude: f64::from(cur.take_i32()) * scale::LONGITUDE,
            altitude: f64::from(cur.take_i16()) * scale::ALTITUDE,
            vel_north: f64::from(cur.take_i16()) * scale::VEL_NORTH,
            vel_east: f64::from(cur.take_i16()) * scale::VEL_EAST,
            vel_up: f64::from(cur.take_i16()) * scale::VEL_UP,
            true_heading: f64::from(cur.take_i16()) * scale::TRUE_HEADING,
            reserved: cur.take_i16(),
        });
    }
    out
}

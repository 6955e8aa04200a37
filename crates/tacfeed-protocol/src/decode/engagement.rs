//! Opcode 103: engagements.
//!
//! ```text
//! offset  size  field
//!   16     1    numOfEngagingNetworkMember
//!   17     3    reserved
//!   20    20    engagement[0]
//!
//! engagement:
//!    0     4    globalId                    u32 (attacker)
//!    4     4    engagementTargetGid         u32
//!    8     1    weaponLaunch
//!    9     1    hangFire
//!   10     1    tth
//!   11     1    tta
//!   12     1    engagementTargetWeaponCode
//!   13     1    reserved
//!   14     2    dMax1                       u16 × D_MAX1
//!   16     2    dMax2                       u16 × D_MAX2
//!   18     2    dmin                        u16 × D_MIN
//! ```

use crate::decode::{HEADER_LEN, truncated};
use crate::wire::Cursor;
use crate::{Engagement, Opcode, Partial, scale};

/// Width of one engagement record.
pub const ENGAGEMENT_RECORD_LEN: usize = 20;

/// Decodes an opcode 103 datagram.
pub fn decode_engagements(buf: &[u8]) -> Partial<Engagement> {
    let mut cur = Cursor::new(buf, HEADER_LEN);
    if !cur.has(1) {
        return Partial::halted(truncated(Opcode::Engagement, 0, cur.pos(), 1, buf.len()));
    }
    let count = usize::from(cur.take_u8());
    cur.skip(3);

    let mut out = Partial::with_capacity(count);
    for index in 0..count {
        if !cur.has(ENGAGEMENT_RECORD_LEN) {
            let fault = truncated(
                Opcode::Engagement,
                index,
                cur.pos(),
                ENGAGEMENT_RECORD_LEN,
                buf.len(),
            );
            return out.halt(fault);
        }
        let attacker_id = cur.take_u32();
        let target_id = cur.take_u32();
        let weapon_launch = cur.take_u8();
        let hang_fire = cur.take_u8();
        let tth = cur.take_u8();
        let tta = cur.take_u8();
        let weapon_code = cur.take_u8();
        cur.skip(1);
        out.push(Engagement {
            opcode: Opcode::Engagement,
            attacker_id,
            target_id,
            weapon_launch,
            hang_fire,
            tth,
            tta,
            weapon_code,
            d_max1: f64::from(cur.take_u16()) * scale::D_MAX1,
            d_max2: f64::from(cur.take_u16()) * scale::D_MAX2,
            d_min: f64::from(cur.take_u16()) * scale::D_MIN,
        });
    }
    out
}

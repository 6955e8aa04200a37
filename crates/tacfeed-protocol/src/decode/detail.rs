//! Opcode 102: member details.
//!
//! The only variable-length record in the protocol. Each member is a
//! 100-byte fixed prefix followed by two counted arrays:
//!
//! ```text
//! offset  size  block
//!    0    12    identity     globalId u32, callsign [6], callsignId u16
//!   12    24    radio        legacyFreq1 [8], legacyFreq2 [8], 3 net ids,
//!                            satcomMode, guardBand, reserved [3]
//!   36     4    internal     isMotherAc, trackId i16 × TRACK_ID, reserved
//!   40    32    regional     8 flag bytes, displayId, acType, bimg, timg,
//!                            c2Critical, controllingNodeId, reserved,
//!                            ctn [5], metadata (3 × i16 raw, reserved [2])
//!   72    28    battle group 4 state bytes, 3 lock ids u32, 4 radar zone
//!                            bytes, 6 status bytes, numOfWeapons,
//!                            numOfSensors
//!  100   4·W    weapons      {code, value, reserved [2]} × numOfWeapons
//!   ..   4·S    sensors      {code, value, reserved [2]} × numOfSensors
//! ```
//!
//! Because the next member's position depends on this member's counts, a
//! single corrupted count shifts every later record. Two checks catch
//! that: a count above the configured ceiling, and a zero `globalId` on
//! any member after the first. Either one stops decoding for the rest of
//! the datagram.

use crate::decode::{DecoderConfig, HEADER_LEN, desync, truncated};
use crate::wire::Cursor;
use crate::{
    BattleGroupData, CodeValue, InternalData, LegacyFrequency, MemberDetail, Opcode, Partial,
    RadioData, RegionalData, RegionalMetadata, scale,
};

/// Width of the fixed part of a member, up to and including both counts.
pub const DETAIL_FIXED_LEN: usize = 100;

/// Width of one weapon or sensor entry.
pub const STORE_ENTRY_LEN: usize = 4;

const CALLSIGN_LEN: usize = 6;
const CTN_LEN: usize = 5;

/// Decodes an opcode 102 datagram.
pub fn decode_details(buf: &[u8], config: &DecoderConfig) -> Partial<MemberDetail> {
    let mut cur = Cursor::new(buf, HEADER_LEN);
    if !cur.has(1) {
        return Partial::halted(truncated(Opcode::Detail, 0, cur.pos(), 1, buf.len()));
    }
    let count = usize::from(cur.take_u8());
    cur.skip(3);

    let mut out = Partial::with_capacity(count);
    for index in 0..count {
        let start = cur.pos();
        if !cur.has(DETAIL_FIXED_LEN) {
            let fault = truncated(Opcode::Detail, index, start, DETAIL_FIXED_LEN, buf.len());
            return out.halt(fault);
        }

        let global_id = cur.take_u32();
        if global_id == 0 && index > 0 {
            let fault = desync(
                Opcode::Detail,
                index,
                start,
                "zero globalId after the first member".to_string(),
            );
            return out.halt(fault);
        }
        let callsign = cur.take_str(CALLSIGN_LEN);
        let callsign_id = cur.take_u16();
        let radio = read_radio(&mut cur);
        let internal = read_internal(&mut cur);
        let regional = read_regional(&mut cur);
        let mut battle_group = read_battle_group_scalars(&mut cur);

        let num_weapons = usize::from(cur.take_u8());
        let num_sensors = usize::from(cur.take_u8());
        if num_weapons > config.max_weapons || num_sensors > config.max_sensors {
            let reason = format!(
                "implausible counts numOfWeapons={num_weapons} numOfSensors={num_sensors}"
            );
            return out.halt(desync(Opcode::Detail, index, cur.pos(), reason));
        }

        let trailing = (num_weapons + num_sensors) * STORE_ENTRY_LEN;
        if !cur.has(trailing) {
            let fault = truncated(Opcode::Detail, index, cur.pos(), trailing, buf.len());
            return out.halt(fault);
        }
        battle_group.weapons = (0..num_weapons).map(|_| read_entry(&mut cur)).collect();
        battle_group.sensors = (0..num_sensors).map(|_| read_entry(&mut cur)).collect();

        out.push(MemberDetail {
            global_id,
            callsign,
            callsign_id,
            radio,
            internal,
            regional,
            battle_group,
        });
    }
    out
}

fn read_radio(cur: &mut Cursor<'_>) -> RadioData {
    let radio = RadioData {
        legacy_freq1: LegacyFrequency(cur.take_bytes()),
        legacy_freq2: LegacyFrequency(cur.take_bytes()),
        manet_l_net_id: cur.take_u8(),
        manet_u1_net_id: cur.take_u8(),
        manet_u2_net_id: cur.take_u8(),
        satcom_mode: cur.take_u8(),
        guard_band: cur.take_u8(),
    };
    cur.skip(3);
    radio
}

fn read_internal(cur: &mut Cursor<'_>) -> InternalData {
    let internal = InternalData {
        is_mother_ac: cur.take_u8(),
        track_id: f64::from(cur.take_i16()) * scale::TRACK_ID,
    };
    cur.skip(1);
    internal
}

fn read_regional(cur: &mut Cursor<'_>) -> RegionalData {
    let is_valid = cur.take_u8();
    let role = cur.take_u8();
    let idn_tag = cur.take_u8();
    let ac_category = cur.take_u8();
    let is_mission_leader = cur.take_u8();
    let is_rogue = cur.take_u8();
    let is_formation = cur.take_u8();
    let recovery_emergency = cur.take_u8();
    let display_id = cur.take_u16();
    let ac_type = cur.take_u16();
    let bimg = cur.take_u16();
    let timg = cur.take_u16();
    let c2_critical = cur.take_u8();
    let controlling_node_id = cur.take_u8();
    cur.skip(1);
    let ctn = cur.take_str(CTN_LEN);
    let metadata = RegionalMetadata {
        baro_altitude: cur.take_i16(),
        ground_speed: cur.take_i16(),
        mach: cur.take_i16(),
    };
    cur.skip(2);

    RegionalData {
        is_valid,
        role,
        idn_tag,
        ac_category,
        is_mission_leader,
        is_rogue,
        is_formation,
        recovery_emergency,
        display_id,
        ac_type,
        bimg,
        timg,
        c2_critical,
        controlling_node_id,
        ctn,
        metadata,
    }
}

/// Everything in the battle-group block except the two trailing arrays,
/// which are filled in once their counts have been validated.
fn read_battle_group_scalars(cur: &mut Cursor<'_>) -> BattleGroupData {
    BattleGroupData {
        is_valid: cur.take_u8(),
        q1_lock_finalization_state: cur.take_u8(),
        q2_lock_finalization_state: cur.take_u8(),
        fuel_state: cur.take_u8(),
        q1_lock_global_id: cur.take_u32(),
        q2_lock_global_id: cur.take_u32(),
        radar_lock_global_id: cur.take_u32(),
        radar_zone_coverage_az: f64::from(cur.take_u8()) * scale::RADAR_ZONE_COVERAGE_AZ,
        radar_zone_coverage_el: f64::from(cur.take_u8()) * scale::RADAR_ZONE_COVERAGE_EL,
        radar_zone_center_az: f64::from(cur.take_u8()) * scale::RADAR_ZONE_CENTER_AZ,
        radar_zone_center_el: f64::from(cur.take_u8()) * scale::RADAR_ZONE_CENTER_EL,
        combat_emergency: cur.take_u8(),
        chaff_remaining: cur.take_u8(),
        flare_remaining: cur.take_u8(),
        master_arm_status: cur.take_u8(),
        acs_status: cur.take_u8(),
        fuel: f64::from(cur.take_u8()) * scale::FUEL,
        weapons: Vec::new(),
        sensors: Vec::new(),
    }
}

fn read_entry(cur: &mut Cursor<'_>) -> CodeValue {
    let entry = CodeValue {
        code: cur.take_u8(),
        value: cur.take_u8(),
    };
    cur.skip(STORE_ENTRY_LEN - 2);
    entry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DecodeFault;
    use crate::decode::testutil::PacketBuilder;

    /// Appends one member with the given identity, mother flag, and
    /// weapon/sensor counts. Array entries are `{code: i, value: 10 + i}`.
    pub(crate) fn member(
        b: PacketBuilder,
        id: u32,
        mother: bool,
        weapons: u8,
        sensors: u8,
    ) -> PacketBuilder {
        let b = b
            .u32(id)
            .bytes(b"EAGLE\0")
            .u16(77)
            // radio
            .bytes(&[1, 2, 3, 4, 5, 6, 7, 8])
            .bytes(&[8, 7, 6, 5, 4, 3, 2, 1])
            .bytes(&[11, 12, 13, 2, 1])
            .zeros(3)
            // internal
            .u8(u8::from(mother))
            .i16(42)
            .zeros(1)
            // regional
            .bytes(&[1, 2, 3, 4, 0, 0, 1, 0])
            .u16(500)
            .u16(16)
            .u16(3)
            .u16(4)
            .u8(0)
            .u8(9)
            .zeros(1)
            .bytes(b"AB12\0")
            .i16(-150)
            .i16(420)
            .i16(85)
            .zeros(2)
            // battle group
            .bytes(&[1, 2, 3, 1])
            .u32(1001)
            .u32(1002)
            .u32(1003)
            .bytes(&[128, 64, 32, 16])
            .bytes(&[0, 30, 40, 1, 2, 150])
            .u8(weapons)
            .u8(sensors);
        let b = (0..weapons).fold(b, |b, i| b.u8(i).u8(10 + i).zeros(2));
        (0..sensors).fold(b, |b, i| b.u8(i).u8(20 + i).zeros(2))
    }

    fn packet(count: u8) -> PacketBuilder {
        PacketBuilder::new(102).u8(count).zeros(3)
    }

    #[test]
    fn test_member_fixture_matches_fixed_layout() {
        let buf = member(packet(1), 1, false, 0, 0).build();
        assert_eq!(buf.len(), HEADER_LEN + 4 + DETAIL_FIXED_LEN);
    }

    #[test]
    fn test_decode_details_reads_every_block() {
        let buf = member(packet(1), 10, true, 2, 1).build();
        let out = decode_details(&buf, &DecoderConfig::default());
        assert!(out.is_complete());
        let m = &out.records[0];

        assert_eq!(m.global_id, 10);
        assert_eq!(m.callsign, "EAGLE");
        assert_eq!(m.callsign_id, 77);

        assert_eq!(m.radio.legacy_freq1.0, [1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(m.radio.legacy_freq2.0, [8, 7, 6, 5, 4, 3, 2, 1]);
        assert_eq!(m.radio.manet_u2_net_id, 13);
        assert_eq!(m.radio.guard_band, 1);

        assert_eq!(m.internal.is_mother_ac, 1);
        assert!(m.internal.is_mother());
        assert_eq!(m.internal.track_id, 42.0);

        assert_eq!(m.regional.role, 2);
        assert_eq!(m.regional.is_formation, 1);
        assert_eq!(m.regional.display_id, 500);
        assert_eq!(m.regional.timg, 4);
        assert_eq!(m.regional.controlling_node_id, 9);
        assert_eq!(m.regional.ctn, "AB12");
        assert_eq!(m.regional.metadata.baro_altitude, -150);
        assert_eq!(m.regional.metadata.ground_speed, 420);
        assert_eq!(m.regional.metadata.mach, 85);

        let bg = &m.battle_group;
        assert_eq!(bg.fuel_state, 1);
        assert_eq!(bg.radar_lock_global_id, 1003);
        assert_eq!(bg.radar_zone_coverage_az, 180.0);
        assert_eq!(bg.radar_zone_coverage_el, 45.0);
        assert_eq!(bg.radar_zone_center_az, 45.0);
        assert_eq!(bg.radar_zone_center_el, 11.25);
        assert_eq!(bg.chaff_remaining, 30);
        assert_eq!(bg.acs_status, 2);
        assert_eq!(bg.fuel, 75.0);
        assert_eq!(
            bg.weapons,
            vec![CodeValue { code: 0, value: 10 }, CodeValue { code: 1, value: 11 }]
        );
        assert_eq!(bg.sensors, vec![CodeValue { code: 0, value: 20 }]);
    }

    #[test]
    fn test_decode_details_variable_members_stay_aligned() {
        let b = member(packet(3), 1, false, 3, 0);
        let b = member(b, 2, false, 0, 5);
        let buf = member(b, 3, true, 1, 1).build();

        let out = decode_details(&buf, &DecoderConfig::default());
        assert!(out.is_complete());
        let ids: Vec<u32> = out.records.iter().map(|m| m.global_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(out.records[1].battle_group.sensors.len(), 5);
        assert!(out.records[2].internal.is_mother());
    }

    #[test]
    fn test_decode_details_oversized_count_drops_rest() {
        let b = member(packet(3), 1, false, 1, 1);
        let b = member(b, 2, false, 200, 0);
        let buf = member(b, 3, false, 0, 0).build();

        let out = decode_details(&buf, &DecoderConfig::default());
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.records[0].global_id, 1);
        assert!(matches!(
            out.fault,
            Some(DecodeFault::Desync { opcode: 102, index: 1, .. })
        ));
    }

    #[test]
    fn test_decode_details_ceiling_is_configurable() {
        let buf = member(packet(1), 1, false, 5, 0).build();
        let strict = DecoderConfig {
            max_weapons: 4,
            ..DecoderConfig::default()
        };
        assert!(decode_details(&buf, &strict).records.is_empty());
        assert_eq!(decode_details(&buf, &DecoderConfig::default()).records.len(), 1);
    }

    #[test]
    fn test_decode_details_zero_id_first_member_accepted() {
        let buf = member(packet(1), 0, false, 0, 0).build();
        let out = decode_details(&buf, &DecoderConfig::default());
        assert_eq!(out.records.len(), 1);
        assert!(out.is_complete());
    }

    #[test]
    fn test_decode_details_zero_id_later_member_is_desync() {
        let b = member(packet(2), 5, false, 0, 0);
        let buf = member(b, 0, false, 0, 0).build();
        let out = decode_details(&buf, &DecoderConfig::default());
        assert_eq!(out.records.len(), 1);
        assert!(matches!(out.fault, Some(DecodeFault::Desync { index: 1, .. })));
    }

    #[test]
    fn test_decode_details_truncated_array_drops_member() {
        let mut buf = member(packet(1), 1, false, 2, 2).build();
        buf.truncate(buf.len() - 2);
        let out = decode_details(&buf, &DecoderConfig::default());
        assert!(out.records.is_empty());
        assert!(matches!(
            out.fault,
            Some(DecodeFault::Truncated { needed: 16, .. })
        ));
    }
}

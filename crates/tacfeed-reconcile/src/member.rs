//! The merged view of one network member.

use serde::Serialize;
use tacfeed_protocol::{
    BattleGroupData, GlobalId, InternalData, MemberDetail, Opcode, PositionReport, RadioData,
    RegionalData,
};

/// Kinematic fields from the position stream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Kinematics {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
    #[serde(rename = "veIn")]
    pub vel_north: f64,
    #[serde(rename = "veIe")]
    pub vel_east: f64,
    #[serde(rename = "veIu")]
    pub vel_up: f64,
    pub true_heading: f64,
}

impl From<&PositionReport> for Kinematics {
    fn from(p: &PositionReport) -> Self {
        Self {
            latitude: p.latitude,
            longitude: p.longitude,
            altitude: p.altitude,
            vel_north: p.vel_north,
            vel_east: p.vel_east,
            vel_up: p.vel_up,
            true_heading: p.true_heading,
        }
    }
}

/// One member as last reported by either stream.
///
/// Every field other than `global_id` and `source` is optional: `None`
/// means the owning stream has never reported it (or its report expired),
/// which is different from a reported zero. Absent fields are left out of
/// the serialized form entirely.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkMember {
    pub global_id: GlobalId,
    /// The stream that most recently touched this member, serialized as
    /// `"opcode": 101` or `102`.
    #[serde(rename = "opcode")]
    pub source: Opcode,
    #[serde(flatten)]
    pub position: Option<Kinematics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callsign: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callsign_id: Option<u16>,
    #[serde(rename = "radioData", skip_serializing_if = "Option::is_none")]
    pub radio: Option<RadioData>,
    #[serde(rename = "internalData", skip_serializing_if = "Option::is_none")]
    pub internal: Option<InternalData>,
    #[serde(rename = "regionalData", skip_serializing_if = "Option::is_none")]
    pub regional: Option<RegionalData>,
    #[serde(rename = "battleGroupData", skip_serializing_if = "Option::is_none")]
    pub battle_group: Option<BattleGroupData>,
}

impl NetworkMember {
    /// A member known only by id, before either stream has filled it in.
    pub fn new(global_id: GlobalId, source: Opcode) -> Self {
        Self {
            global_id,
            source,
            position: None,
            callsign: None,
            callsign_id: None,
            radio: None,
            internal: None,
            regional: None,
            battle_group: None,
        }
    }

    /// Overwrites the kinematic fields. Detail fields are untouched.
    pub fn apply_position(&mut self, report: &PositionReport) {
        self.position = Some(Kinematics::from(report));
        self.source = Opcode::Position;
    }

    /// Overwrites the detail fields. Position is untouched.
    pub fn apply_detail(&mut self, detail: &MemberDetail) {
        self.callsign = Some(detail.callsign.clone());
        self.callsign_id = Some(detail.callsign_id);
        self.radio = Some(detail.radio.clone());
        self.internal = Some(detail.internal.clone());
        self.regional = Some(detail.regional.clone());
        self.battle_group = Some(detail.battle_group.clone());
        self.source = Opcode::Detail;
    }

    /// Drops every detail-derived field, mother status included.
    pub fn clear_detail(&mut self) {
        self.callsign = None;
        self.callsign_id = None;
        self.radio = None;
        self.internal = None;
        self.regional = None;
        self.battle_group = None;
    }

    pub fn has_detail(&self) -> bool {
        self.callsign.is_some()
            || self.callsign_id.is_some()
            || self.radio.is_some()
            || self.internal.is_some()
            || self.regional.is_some()
            || self.battle_group.is_some()
    }

    pub fn is_mother(&self) -> bool {
        self.internal.as_ref().is_some_and(InternalData::is_mother)
    }

    /// Clears the mother flag, keeping the rest of the internal block.
    /// Returns whether the flag was set.
    pub(crate) fn revoke_mother(&mut self) -> bool {
        match self.internal.as_mut() {
            Some(internal) if internal.is_mother() => {
                internal.is_mother_ac = 0;
                true
            }
            _ => false,
        }
    }
}

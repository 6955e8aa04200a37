//! Record types produced by the opcode decoders.
//!
//! Every type here is plain data: decoded once from a datagram, then either
//! merged into the long-lived member store or handed to a feed as part of a
//! full-replace snapshot. They all derive `Serialize`/`Deserialize` with
//! camelCase field names so the JSON a display layer receives matches the
//! field names of the transmitter's interface document (`globalId`,
//! `internalData`, `dMax1`, ...).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{DecodeFault, ProtocolError};

/// Stable identity of a network member, target, or engagement party.
pub type GlobalId = u32;

// ---------------------------------------------------------------------------
// Opcode
// ---------------------------------------------------------------------------

/// The single-byte discriminator at byte 1 of every datagram.
///
/// Serializes as its wire value, so records carry `"opcode": 104`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum Opcode {
    /// High-rate position stream for network members.
    Position = 101,
    /// Low-rate detailed status stream for network members.
    Detail = 102,
    /// Active engagements.
    Engagement = 103,
    /// Targets.
    Target = 104,
    /// Threats reported by one sender.
    Threat = 106,
}

impl Opcode {
    /// The raw wire value.
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl From<Opcode> for u8 {
    fn from(opcode: Opcode) -> Self {
        opcode.code()
    }
}

impl TryFrom<u8> for Opcode {
    type Error = ProtocolError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            101 => Ok(Self::Position),
            102 => Ok(Self::Detail),
            103 => Ok(Self::Engagement),
            104 => Ok(Self::Target),
            106 => Ok(Self::Threat),
            other => Err(ProtocolError::UnknownOpcode(other)),
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ---------------------------------------------------------------------------
// Opcode 101 — position
// ---------------------------------------------------------------------------

/// One member's kinematic state from the position stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionReport {
    pub global_id: GlobalId,
    /// Degrees, positive north.
    pub latitude: f64,
    /// Degrees, positive east.
    pub longitude: f64,
    /// Feet.
    pub altitude: f64,
    #[serde(rename = "veIn")]
    pub vel_north: f64,
    #[serde(rename = "veIe")]
    pub vel_east: f64,
    #[serde(rename = "veIu")]
    pub vel_up: f64,
    /// Degrees from true north.
    pub true_heading: f64,
    pub reserved: i16,
}

// ---------------------------------------------------------------------------
// Opcode 102 — detail
// ---------------------------------------------------------------------------

/// An eight-digit legacy radio frequency, one digit per byte.
///
/// Serializes as an object keyed `D1`..`D8`, most significant digit first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "FrequencyDigits", into = "FrequencyDigits")]
pub struct LegacyFrequency(pub [u8; 8]);

#[derive(Serialize, Deserialize)]
struct FrequencyDigits {
    #[serde(rename = "D1")]
    d1: u8,
    #[serde(rename = "D2")]
    d2: u8,
    #[serde(rename = "D3")]
    d3: u8,
    #[serde(rename = "D4")]
    d4: u8,
    #[serde(rename = "D5")]
    d5: u8,
    #[serde(rename = "D6")]
    d6: u8,
    #[serde(rename = "D7")]
    d7: u8,
    #[serde(rename = "D8")]
    d8: u8,
}

impl From<LegacyFrequency> for FrequencyDigits {
    fn from(LegacyFrequency([d1, d2, d3, d4, d5, d6, d7, d8]): LegacyFrequency) -> Self {
        Self { d1, d2, d3, d4, d5, d6, d7, d8 }
    }
}

impl From<FrequencyDigits> for LegacyFrequency {
    fn from(d: FrequencyDigits) -> Self {
        Self([d.d1, d.d2, d.d3, d.d4, d.d5, d.d6, d.d7, d.d8])
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadioData {
    pub legacy_freq1: LegacyFrequency,
    pub legacy_freq2: LegacyFrequency,
    pub manet_l_net_id: u8,
    pub manet_u1_net_id: u8,
    pub manet_u2_net_id: u8,
    pub satcom_mode: u8,
    pub guard_band: u8,
}

/// Ownship bookkeeping. Only the detail feed may confer mother status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalData {
    /// Raw flag byte. Only [`InternalData::MOTHER`] marks the mother
    /// aircraft; any other value does not.
    pub is_mother_ac: u8,
    pub track_id: f64,
}

impl InternalData {
    pub const MOTHER: u8 = 1;

    pub fn is_mother(&self) -> bool {
        self.is_mother_ac == Self::MOTHER
    }
}

/// Raw air-data values carried by the regional block.
///
/// These are stored exactly as transmitted; the transmitter does not
/// document a scale for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionalMetadata {
    pub baro_altitude: i16,
    pub ground_speed: i16,
    pub mach: i16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionalData {
    pub is_valid: u8,
    pub role: u8,
    pub idn_tag: u8,
    pub ac_category: u8,
    pub is_mission_leader: u8,
    pub is_rogue: u8,
    pub is_formation: u8,
    pub recovery_emergency: u8,
    pub display_id: u16,
    pub ac_type: u16,
    pub bimg: u16,
    pub timg: u16,
    pub c2_critical: u8,
    pub controlling_node_id: u8,
    /// Five-character callsign tag.
    pub ctn: String,
    pub metadata: RegionalMetadata,
}

/// A `{code, value}` pair from the weapons or sensors array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeValue {
    pub code: u8,
    pub value: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleGroupData {
    pub is_valid: u8,
    pub q1_lock_finalization_state: u8,
    pub q2_lock_finalization_state: u8,
    pub fuel_state: u8,
    pub q1_lock_global_id: GlobalId,
    pub q2_lock_global_id: GlobalId,
    pub radar_lock_global_id: GlobalId,
    /// Degrees.
    pub radar_zone_coverage_az: f64,
    pub radar_zone_coverage_el: f64,
    pub radar_zone_center_az: f64,
    pub radar_zone_center_el: f64,
    pub combat_emergency: u8,
    pub chaff_remaining: u8,
    pub flare_remaining: u8,
    pub master_arm_status: u8,
    pub acs_status: u8,
    /// Percent.
    pub fuel: f64,
    #[serde(rename = "weaponsData")]
    pub weapons: Vec<CodeValue>,
    #[serde(rename = "sensorsData")]
    pub sensors: Vec<CodeValue>,
}

/// One member's detailed status from the detail stream.
///
/// Never carries position; the reconciler combines it with
/// [`PositionReport`]s for the same `global_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberDetail {
    pub global_id: GlobalId,
    pub callsign: String,
    pub callsign_id: u16,
    #[serde(rename = "radioData")]
    pub radio: RadioData,
    #[serde(rename = "internalData")]
    pub internal: InternalData,
    #[serde(rename = "regionalData")]
    pub regional: RegionalData,
    #[serde(rename = "battleGroupData")]
    pub battle_group: BattleGroupData,
}

// ---------------------------------------------------------------------------
// Opcodes 103, 104, 106
// ---------------------------------------------------------------------------

/// An attacker/target pairing. Consumers identify it by [`Engagement::key`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Engagement {
    /// Always [`Opcode::Engagement`].
    pub opcode: Opcode,
    #[serde(rename = "globalId")]
    pub attacker_id: GlobalId,
    #[serde(rename = "engagementTargetGid")]
    pub target_id: GlobalId,
    pub weapon_launch: u8,
    pub hang_fire: u8,
    /// Time to hit, seconds.
    pub tth: u8,
    /// Time to arrival, seconds.
    pub tta: u8,
    #[serde(rename = "engagementTargetWeaponCode")]
    pub weapon_code: u8,
    #[serde(rename = "dMax1")]
    pub d_max1: f64,
    #[serde(rename = "dMax2")]
    pub d_max2: f64,
    #[serde(rename = "dmin")]
    pub d_min: f64,
}

impl Engagement {
    /// `(attacker, target)`, the identity a display keys engagements on.
    pub fn key(&self) -> (GlobalId, GlobalId) {
        (self.attacker_id, self.target_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Target {
    /// Always [`Opcode::Target`].
    pub opcode: Opcode,
    pub global_id: GlobalId,
    /// Degrees, transmitted as float32.
    pub latitude: f64,
    /// Degrees, transmitted as float32.
    pub longitude: f64,
    /// Feet.
    pub altitude: f64,
    /// Degrees from true north.
    pub heading: f64,
    /// Knots.
    pub ground_speed: f64,
    /// Unscaled as transmitted.
    pub range: u32,
}

/// A threat as seen by `sender_global_id`.
///
/// Position is not transmitted; a display projects it from the sender's
/// position using `threat_range` and `threat_azimuth`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Threat {
    /// Always [`Opcode::Threat`].
    pub opcode: Opcode,
    pub sender_global_id: GlobalId,
    pub threat_id: u8,
    pub is_search_mode: u8,
    pub is_lock_on: u8,
    pub threat_type: u8,
    /// Metres.
    pub threat_range: u8,
    /// Degrees from true north.
    pub threat_azimuth: u16,
    pub threat_frequency: u16,
}

// ---------------------------------------------------------------------------
// Decoder output
// ---------------------------------------------------------------------------

/// Records decoded from one datagram, plus the reason decoding stopped
/// early, if it did.
#[derive(Debug, Clone, PartialEq)]
pub struct Partial<T> {
    pub records: Vec<T>,
    pub fault: Option<DecodeFault>,
}

impl<T> Partial<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
            fault: None,
        }
    }

    /// A result with no records that stopped because of `fault`.
    pub fn halted(fault: DecodeFault) -> Self {
        Self {
            records: Vec::new(),
            fault: Some(fault),
        }
    }

    /// Records `fault` and returns what has been decoded so far.
    pub fn halt(mut self, fault: DecodeFault) -> Self {
        self.fault = Some(fault);
        self
    }

    pub fn push(&mut self, record: T) {
        self.records.push(record);
    }

    pub fn is_complete(&self) -> bool {
        self.fault.is_none()
    }
}

/// Decoded records tagged by the opcode that produced them.
#[derive(Debug, Clone, PartialEq)]
pub enum Records {
    Positions(Vec<PositionReport>),
    Details(Vec<MemberDetail>),
    Engagements(Vec<Engagement>),
    Targets(Vec<Target>),
    Threats(Vec<Threat>),
}

impl Records {
    pub fn opcode(&self) -> Opcode {
        match self {
            Self::Positions(_) => Opcode::Position,
            Self::Details(_) => Opcode::Detail,
            Self::Engagements(_) => Opcode::Engagement,
            Self::Targets(_) => Opcode::Target,
            Self::Threats(_) => Opcode::Threat,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Positions(v) => v.len(),
            Self::Details(v) => v.len(),
            Self::Engagements(v) => v.len(),
            Self::Targets(v) => v.len(),
            Self::Threats(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// What the dispatcher returns for a datagram with a known opcode.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub records: Records,
    /// Set when the decoder stopped before the declared record count.
    pub fault: Option<DecodeFault>,
}

impl Decoded {
    pub fn opcode(&self) -> Opcode {
        self.records.opcode()
    }

    pub(crate) fn from_partial<T>(partial: Partial<T>, wrap: fn(Vec<T>) -> Records) -> Self {
        Self {
            records: wrap(partial.records),
            fault: partial.fault,
        }
    }
}

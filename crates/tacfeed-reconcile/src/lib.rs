//! Entity reconciliation for the tactical telemetry feed.
//!
//! Two streams describe network members: a high-rate position stream
//! (opcode 101) and a low-rate detail stream (opcode 102). Neither is
//! complete on its own. The [`Reconciler`] merges them into one record per
//! `globalId`, expires what either stream stops vouching for, and publishes
//! snapshots of the members seen recently enough to be trusted.
//!
//! ```rust
//! use tacfeed_feed::ManualClock;
//! use tacfeed_protocol::PositionReport;
//! use tacfeed_reconcile::{Reconciler, ReconcilerConfig};
//!
//! let mut reconciler = Reconciler::new(ReconcilerConfig::default(), ManualClock::new());
//! reconciler.ingest_positions(&[PositionReport {
//!     global_id: 10,
//!     latitude: 24.4,
//!     longitude: 54.6,
//!     altitude: 12_000.0,
//!     vel_north: 0.0,
//!     vel_east: 120.0,
//!     vel_up: 0.0,
//!     true_heading: 90.0,
//!     reserved: 0,
//! }]);
//!
//! let snapshot = reconciler.snapshot();
//! assert!(snapshot[&10].position.is_some());
//! assert!(snapshot[&10].internal.is_none());
//! ```

mod config;
mod member;
mod reconciler;

pub use config::ReconcilerConfig;
pub use member::{Kinematics, NetworkMember};
pub use reconciler::{MemberSnapshot, Reconciler, SweepOutcome};

#[cfg(test)]
pub(crate) mod fixtures {
    //! Minimal records for unit tests.

    use tacfeed_protocol::{
        BattleGroupData, InternalData, LegacyFrequency, MemberDetail, PositionReport, RadioData,
        RegionalData, RegionalMetadata,
    };

    pub fn position(id: u32, latitude: f64, longitude: f64) -> PositionReport {
        PositionReport {
            global_id: id,
            latitude,
            longitude,
            altitude: 10_000.0,
            vel_north: 1.0,
            vel_east: 2.0,
            vel_up: 0.0,
            true_heading: 45.0,
            reserved: 0,
        }
    }

    pub fn detail(id: u32, mother: bool) -> MemberDetail {
        MemberDetail {
            global_id: id,
            callsign: format!("CS{id}"),
            callsign_id: 1,
            radio: RadioData {
                legacy_freq1: LegacyFrequency::default(),
                legacy_freq2: LegacyFrequency::default(),
                manet_l_net_id: 0,
                manet_u1_net_id: 0,
                manet_u2_net_id: 0,
                satcom_mode: 0,
                guard_band: 0,
            },
            internal: InternalData {
                is_mother_ac: u8::from(mother),
                track_id: f64::from(id),
            },
            regional: RegionalData {
                is_valid: 1,
                role: 0,
                idn_tag: 0,
                ac_category: 0,
                is_mission_leader: 0,
                is_rogue: 0,
                is_formation: 0,
                recovery_emergency: 0,
                display_id: 0,
                ac_type: 0,
                bimg: 0,
                timg: 0,
                c2_critical: 0,
                controlling_node_id: 0,
                ctn: String::new(),
                metadata: RegionalMetadata {
                    baro_altitude: 0,
                    ground_speed: 0,
                    mach: 0,
                },
            },
            battle_group: BattleGroupData {
                is_valid: 1,
                q1_lock_finalization_state: 0,
                q2_lock_finalization_state: 0,
                fuel_state: 0,
                q1_lock_global_id: 0,
                q2_lock_global_id: 0,
                radar_lock_global_id: 0,
                radar_zone_coverage_az: 0.0,
                radar_zone_coverage_el: 0.0,
                radar_zone_center_az: 0.0,
                radar_zone_center_el: 0.0,
                combat_emergency: 0,
                chaff_remaining: 0,
                flare_remaining: 0,
                master_arm_status: 0,
                acs_status: 0,
                fuel: 50.0,
                weapons: Vec::new(),
                sensors: Vec::new(),
            },
        }
    }
}

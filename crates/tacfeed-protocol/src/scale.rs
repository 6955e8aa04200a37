//! Fixed-point resolutions for the scaled wire fields.
//!
//! Each constant is the physical value of one least-significant bit of the
//! corresponding wire field: `physical = raw * RESOLUTION`. They are `const`,
//! not configuration.
//!
//! The values below are placeholders derived from each field's width and
//! range. They have not been checked against the transmitter's interface
//! document or live traffic; replace them before trusting decoded units.

/// Degrees per LSB of the opcode 101 latitude (signed 32-bit, ±180°).
pub const LATITUDE: f64 = 180.0 / 2_147_483_648.0;

/// Degrees per LSB of the opcode 101 longitude (signed 32-bit, ±180°).
pub const LONGITUDE: f64 = 180.0 / 2_147_483_648.0;

/// Feet per LSB of altitude (opcodes 101 and 104).
pub const ALTITUDE: f64 = 2.0;

/// Metres per second per LSB of the north velocity component.
pub const VEL_NORTH: f64 = 0.1;

/// Metres per second per LSB of the east velocity component.
pub const VEL_EAST: f64 = 0.1;

/// Metres per second per LSB of the up velocity component.
pub const VEL_UP: f64 = 0.1;

/// Degrees per LSB of true heading (signed 16-bit, ±180°). Shared by 101 and 104.
pub const TRUE_HEADING: f64 = 180.0 / 32_768.0;

/// Knots per LSB of the opcode 104 ground speed.
pub const GROUND_SPEED: f64 = 0.1;

/// Track number per LSB of the opcode 102 internal track id.
pub const TRACK_ID: f64 = 1.0;

/// Degrees per LSB of the radar zone azimuth coverage (unsigned 8-bit).
pub const RADAR_ZONE_COVERAGE_AZ: f64 = 360.0 / 256.0;

/// Degrees per LSB of the radar zone elevation coverage (unsigned 8-bit).
pub const RADAR_ZONE_COVERAGE_EL: f64 = 180.0 / 256.0;

/// Degrees per LSB of the radar zone centre azimuth (unsigned 8-bit).
pub const RADAR_ZONE_CENTER_AZ: f64 = 360.0 / 256.0;

/// Degrees per LSB of the radar zone centre elevation (unsigned 8-bit).
pub const RADAR_ZONE_CENTER_EL: f64 = 180.0 / 256.0;

/// Percent per LSB of remaining fuel.
pub const FUEL: f64 = 0.5;

/// Nautical miles per LSB of the engagement `dMax1` range.
pub const D_MAX1: f64 = 0.01;

/// Nautical miles per LSB of the engagement `dMax2` range.
pub const D_MAX2: f64 = 0.01;

/// Nautical miles per LSB of the engagement `dMin` range.
pub const D_MIN: f64 = 0.001;

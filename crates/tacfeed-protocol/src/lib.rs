//! Wire protocol for the tactical telemetry feed.
//!
//! This crate turns raw UDP payloads into typed records:
//!
//! - **Wire reader** ([`WireReader`], [`Cursor`], [`BitView`]) —
//!   bounds-checked big-endian and bit-level reads that degrade to zero on
//!   underrun instead of panicking.
//! - **Decoders** ([`decode_positions`], [`decode_details`], ...) — one pure
//!   function per opcode, each returning a [`Partial`] of the records it
//!   managed to decode.
//! - **Dispatcher** ([`decode`]) — reads the opcode from the envelope and
//!   routes to the matching decoder.
//! - **Codec** ([`Codec`], [`JsonCodec`]) — how records leave the process.
//!
//! # Architecture
//!
//! The protocol layer knows nothing about sockets, clocks, or state. It
//! sits between the transport (raw datagrams) and the reconciler (merged
//! entity state):
//!
//! ```text
//! Transport (datagram) → Protocol (Decoded) → Reconciler / feeds (snapshots)
//! ```
//!
//! Nothing in this crate panics on malformed input. A decoder that runs out
//! of bytes or detects a desynchronized cursor stops and reports a
//! [`DecodeFault`] next to the records it already has.

mod codec;
pub mod decode;
mod dispatch;
mod error;
pub mod scale;
mod types;
pub mod wire;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use decode::{
    DecoderConfig, HEADER_LEN, decode_details, decode_engagements, decode_positions,
    decode_targets, decode_threats,
};
pub use dispatch::{OPCODE_OFFSET, decode, decode_with};
pub use error::{DecodeFault, ProtocolError};
pub use types::{
    BattleGroupData, CodeValue, Decoded, Engagement, GlobalId, InternalData, LegacyFrequency,
    MemberDetail, Opcode, Partial, PositionReport, RadioData, Records, RegionalData,
    RegionalMetadata, Target, Threat,
};
pub use wire::{BitView, Cursor, WireReader};

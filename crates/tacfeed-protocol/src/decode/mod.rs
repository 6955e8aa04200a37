//! Opcode decoders: one pure `bytes -> records` function per message type.
//!
//! All five share the same outline:
//!
//! ```text
//! ┌──────────────────────┬───────┬──────────┬──────────┬──────────┬─────
//! │ envelope (16 bytes)  │ count │ reserved │ record 0 │ record 1 │ ...
//! └──────────────────────┴───────┴──────────┴──────────┴──────────┴─────
//! ```
//!
//! The envelope belongs to the transport layer; decoders skip it. The
//! count and the reserved gap that follows differ per opcode, as does the
//! record layout. Every decoder checks that a whole record is available
//! before reading it, and on any shortfall returns what it has decoded so
//! far with a [`DecodeFault`] explaining where it stopped. Nothing here
//! panics or returns `Err`, whatever the input.

mod detail;
mod engagement;
mod position;
mod target;
mod threat;

pub use detail::{DETAIL_FIXED_LEN, STORE_ENTRY_LEN, decode_details};
pub use engagement::{ENGAGEMENT_RECORD_LEN, decode_engagements};
pub use position::{POSITION_RECORD_LEN, decode_positions};
pub use target::{TARGET_RECORD_LEN, decode_targets};
pub use threat::{THREAT_RECORD_LEN, decode_threats};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{DecodeFault, Opcode};

/// Length of the transport envelope that precedes every payload.
pub const HEADER_LEN: usize = 16;

/// Tunable sanity limits for the decoders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecoderConfig {
    /// Largest plausible `numOfWeapons` in a detail record. Anything above
    /// means the cursor has slipped and the rest of the packet is garbage.
    pub max_weapons: usize,
    /// Largest plausible `numOfSensors` in a detail record.
    pub max_sensors: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_weapons: 64,
            max_sensors: 64,
        }
    }
}

impl DecoderConfig {
    /// Counts are single bytes on the wire.
    const MAX_CEILING: usize = u8::MAX as usize;

    /// Returns a copy with each ceiling clamped to what a count byte can
    /// express. A ceiling of 0 is allowed and rejects any non-empty array.
    pub fn validated(mut self) -> Self {
        if self.max_weapons > Self::MAX_CEILING {
            warn!(
                max_weapons = self.max_weapons,
                "max_weapons exceeds count width, clamping"
            );
            self.max_weapons = Self::MAX_CEILING;
        }
        if self.max_sensors > Self::MAX_CEILING {
            warn!(
                max_sensors = self.max_sensors,
                "max_sensors exceeds count width, clamping"
            );
            self.max_sensors = Self::MAX_CEILING;
        }
        self
    }
}

/// Builds a [`DecodeFault::Truncated`] and logs it.
pub(crate) fn truncated(
    opcode: Opcode,
    index: usize,
    offset: usize,
    needed: usize,
    len: usize,
) -> DecodeFault {
    warn!(
        opcode = opcode.code(),
        index, offset, needed, len, "datagram too short, keeping decoded prefix"
    );
    DecodeFault::Truncated {
        opcode: opcode.code(),
        index,
        offset,
        needed,
        len,
    }
}

/// Builds a [`DecodeFault::Desync`] and logs it.
pub(crate) fn desync(
    opcode: Opcode,
    index: usize,
    offset: usize,
    reason: String,
) -> DecodeFault {
    warn!(
        opcode = opcode.code(),
        index, offset, %reason, "decoder desynchronized, dropping rest of datagram"
    );
    DecodeFault::Desync {
        opcode: opcode.code(),
        index,
        offset,
        reason,
    }
}

//! Serialization of records and snapshots for downstream consumers.
//!
//! The wire format is fixed and decoded by hand in [`crate::decode`]. What a
//! display layer receives is a different matter: snapshots leave this
//! process as whatever the host application speaks. The [`Codec`] trait is
//! that seam, and [`JsonCodec`] is the implementation the record types'
//! camelCase serde attributes are written for.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// Converts records and snapshots to bytes and back.
///
/// `Send + Sync + 'static` so one codec can be shared by every subscriber
/// task of a long-running service.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if the value cannot be represented
    /// (a non-finite float in a strict format, for instance).
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed or don't
    /// match `T`.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] backed by `serde_json`.
///
/// Field names come out as the transmitter's interface document spells them
/// (`globalId`, `internalData`, `dMax1`), which is what existing display
/// code keys on.
///
/// ```rust
/// use tacfeed_protocol::{Codec, JsonCodec, Opcode, Threat};
///
/// let threat = Threat {
///     opcode: Opcode::Threat,
///     sender_global_id: 42,
///     threat_id: 1,
///     is_search_mode: 1,
///     is_lock_on: 0,
///     threat_type: 4,
///     threat_range: 200,
///     threat_azimuth: 270,
///     threat_frequency: 9400,
/// };
///
/// let bytes = JsonCodec.encode(&threat).unwrap();
/// assert!(std::str::from_utf8(&bytes).unwrap().contains("\"senderGlobalId\":42"));
///
/// let back: Threat = JsonCodec.decode(&bytes).unwrap();
/// assert_eq!(back, threat);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;
    use crate::{Engagement, Opcode, Target};

    #[test]
    fn test_json_codec_engagement_uses_wire_names() {
        let e = Engagement {
            opcode: Opcode::Engagement,
            attacker_id: 7,
            target_id: 900,
            weapon_launch: 1,
            hang_fire: 0,
            tth: 12,
            tta: 15,
            weapon_code: 3,
            d_max1: 10.0,
            d_max2: 20.0,
            d_min: 0.5,
        };
        let bytes = JsonCodec.encode(&e).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["opcode"], 103);
        assert_eq!(value["globalId"], 7);
        assert_eq!(value["engagementTargetGid"], 900);
        assert_eq!(value["engagementTargetWeaponCode"], 3);
        assert_eq!(value["dmin"], 0.5);
    }

    #[test]
    fn test_json_codec_decode_rejects_wrong_shape() {
        let result: Result<Target, _> = JsonCodec.decode(br#"{"globalId":"nope"}"#);
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }
}

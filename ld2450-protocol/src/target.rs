//! Target record codec
//!
//! Each target-update payload carries three 8-byte records:
//!
//! ```text
//! ┌────────┬────────┬────────┬────────────┐
//! │ X (2B) │ Y (2B) │ V (2B) │ RES (2B)   │
//! └────────┴────────┴────────┴────────────┘
//! ```
//!
//! All fields are little-endian. `X` and `V` use sign-magnitude with the
//! sign in bit 15 (set means negative). `Y` is offset by `0x8000`, except
//! that a raw zero means "no target" and is left as zero. `RES` is the raw
//! distance resolution.

use crate::frame::{TARGET_PAYLOAD_LEN, UPDATE_HEADER, UPDATE_TRAILER};

/// Number of target slots reported by the module
pub const TARGET_COUNT: usize = 3;

/// Size of one target record on the wire
pub const TARGET_RECORD_LEN: usize = 8;

const SIGN_BIT: u16 = 0x8000;

/// One decoded target record, before any gating or axis flip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TargetRecord {
    /// Lateral offset in mm
    pub x: i16,
    /// Distance from the sensor plane in mm (0 = no target)
    pub y: i16,
    /// Radial speed in cm/s
    pub speed: i16,
    /// Raw distance resolution
    pub distance_resolution: u16,
}

/// Decode a sign-magnitude field
///
/// Equivalent to `-raw + 0x8000` in 16-bit arithmetic when the sign bit is
/// set, so `0x8000` maps to zero.
pub fn decode_sign_magnitude(raw: u16) -> i16 {
    if raw & SIGN_BIT != 0 {
        -((raw & !SIGN_BIT) as i16)
    } else {
        raw as i16
    }
}

/// Encode a value as sign-magnitude
pub fn encode_sign_magnitude(value: i16) -> u16 {
    if value < 0 {
        SIGN_BIT | (value.unsigned_abs() & !SIGN_BIT)
    } else {
        value as u16
    }
}

/// Decode the offset `Y` field
pub fn decode_offset(raw: u16) -> i16 {
    if raw == 0 {
        0
    } else {
        raw.wrapping_sub(SIGN_BIT) as i16
    }
}

/// Encode a value into the offset `Y` field
pub fn encode_offset(value: i16) -> u16 {
    if value == 0 {
        0
    } else {
        (value as u16).wrapping_add(SIGN_BIT)
    }
}

fn le(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

impl TargetRecord {
    /// Decode one record
    pub fn decode(bytes: &[u8; TARGET_RECORD_LEN]) -> Self {
        Self {
            x: decode_sign_magnitude(le(bytes, 0)),
            y: decode_offset(le(bytes, 2)),
            speed: decode_sign_magnitude(le(bytes, 4)),
            distance_resolution: le(bytes, 6),
        }
    }

    /// Encode one record
    pub fn encode(&self) -> [u8; TARGET_RECORD_LEN] {
        let mut out = [0u8; TARGET_RECORD_LEN];
        out[0..2].copy_from_slice(&encode_sign_magnitude(self.x).to_le_bytes());
        out[2..4].copy_from_slice(&encode_offset(self.y).to_le_bytes());
        out[4..6].copy_from_slice(&encode_sign_magnitude(self.speed).to_le_bytes());
        out[6..8].copy_from_slice(&self.distance_resolution.to_le_bytes());
        out
    }

    /// True when the record is the module's "slot empty" report
    pub fn is_empty(&self) -> bool {
        self.x == 0 && self.y == 0 && self.speed == 0 && self.distance_resolution == 0
    }

    /// Decode all three records of a target-update payload
    pub fn decode_payload(payload: &[u8; TARGET_PAYLOAD_LEN]) -> [Self; TARGET_COUNT] {
        let mut records = [Self::default(); TARGET_COUNT];
        for (record, chunk) in records
            .iter_mut()
            .zip(payload.chunks_exact(TARGET_RECORD_LEN))
        {
            let mut bytes = [0u8; TARGET_RECORD_LEN];
            bytes.copy_from_slice(chunk);
            *record = Self::decode(&bytes);
        }
        records
    }

    /// Encode three records into a target-update payload
    pub fn encode_payload(records: &[Self; TARGET_COUNT]) -> [u8; TARGET_PAYLOAD_LEN] {
        let mut payload = [0u8; TARGET_PAYLOAD_LEN];
        for (chunk, record) in payload
            .chunks_exact_mut(TARGET_RECORD_LEN)
            .zip(records.iter())
        {
            chunk.copy_from_slice(&record.encode());
        }
        payload
    }

    /// Build a complete target-update frame, header and trailer included
    pub fn encode_frame(records: &[Self; TARGET_COUNT]) -> [u8; 30] {
        let mut frame = [0u8; 30];
        frame[..4].copy_from_slice(&UPDATE_HEADER);
        frame[4..28].copy_from_slice(&Self::encode_payload(records));
        frame[28..].copy_from_slice(&UPDATE_TRAILER);
        frame
    }
}

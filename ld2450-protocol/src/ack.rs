//! Acknowledgement payloads
//!
//! An ack echoes the command opcode in byte 0 and carries `0x01` in byte 1
//! (the high byte of the ack command word). Bytes 2..4 hold a status word,
//! anything after is command specific.

use core::fmt;

use crate::command::opcode;

/// Marker the module places in byte 1 of every ack
const ACK_MARKER: u8 = 0x01;

/// Minimum ack length carrying a firmware version
const VERSION_ACK_LEN: usize = 12;

/// A parsed configuration reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigAck<'a> {
    /// Opcode being acknowledged
    pub opcode: u8,
    /// Whether byte 1 carries the ack marker
    pub success: bool,
    /// Full payload, opcode included
    pub payload: &'a [u8],
}

impl<'a> ConfigAck<'a> {
    /// Parse a configuration payload
    ///
    /// Returns `None` for payloads too short to hold an opcode and marker.
    pub fn parse(payload: &'a [u8]) -> Option<Self> {
        if payload.len() < 2 {
            return None;
        }
        Some(Self {
            opcode: payload[0],
            success: payload[1] == ACK_MARKER,
            payload,
        })
    }

    /// Whether this is a successful ack for `op`
    pub fn acknowledges(&self, op: u8) -> bool {
        self.success && self.opcode == op
    }

    /// Firmware version carried by a successful `READ_VERSION` ack
    pub fn firmware_version(&self) -> Option<FirmwareVersion> {
        if !self.acknowledges(opcode::READ_VERSION) || self.payload.len() < VERSION_ACK_LEN {
            return None;
        }
        let p = self.payload;
        Some(FirmwareVersion {
            major: p[7],
            minor: p[6],
            build: u32::from_le_bytes([p[8], p[9], p[10], p[11]]),
        })
    }
}

/// Module firmware version, rendered as `V{major}.{minor}.{build}` in hex
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FirmwareVersion {
    pub major: u8,
    pub minor: u8,
    pub build: u32,
}

impl fmt::Display for FirmwareVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "V{:X}.{:02X}.{:08X}", self.major, self.minor, self.build)
    }
}

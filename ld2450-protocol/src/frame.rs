//! Frame constants and configuration frame encoding.
//!
//! Target-update frame:
//! - HEADER (4 bytes): `AA FF 03 00`
//! - PAYLOAD (24 bytes): three 8-byte target records
//! - TRAILER (2 bytes): `55 CC`
//!
//! Configuration frame (both directions):
//! - HEADER (4 bytes): `FD FC FB FA`
//! - LENGTH (2 bytes): payload length, little-endian
//! - PAYLOAD (LENGTH bytes): command word + value, or ack
//! - TRAILER (4 bytes): `04 03 02 01`

use heapless::Vec;

/// Header opening every target-update frame
pub const UPDATE_HEADER: [u8; 4] = [0xAA, 0xFF, 0x03, 0x00];

/// Trailer closing every target-update frame
pub const UPDATE_TRAILER: [u8; 2] = [0x55, 0xCC];

/// Header opening every configuration frame
pub const CONFIG_HEADER: [u8; 4] = [0xFD, 0xFC, 0xFB, 0xFA];

/// Trailer closing every configuration frame
pub const CONFIG_TRAILER: [u8; 4] = [0x04, 0x03, 0x02, 0x01];

/// Target-update payload size (3 records × 8 bytes)
pub const TARGET_PAYLOAD_LEN: usize = 24;

/// Largest configuration payload that is buffered and interpreted
///
/// The longest ack the module sends is well under this. Longer frames are
/// drained and dropped.
pub const MAX_CONFIG_PAYLOAD: usize = 64;

/// Maximum encoded configuration frame (HEADER + LENGTH + payload + TRAILER)
pub const MAX_CONFIG_FRAME: usize = 4 + 2 + MAX_CONFIG_PAYLOAD + 4;

/// Errors that can occur during frame encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Payload exceeds maximum allowed size
    PayloadTooLarge,
    /// Buffer too small for encoding
    BufferTooSmall,
}

/// Encode `payload` as a configuration frame into `buffer`
///
/// Returns the number of bytes written.
pub fn encode_config_frame(payload: &[u8], buffer: &mut [u8]) -> Result<usize, FrameError> {
    if payload.len() > MAX_CONFIG_PAYLOAD {
        return Err(FrameError::PayloadTooLarge);
    }
    let frame_len = CONFIG_HEADER.len() + 2 + payload.len() + CONFIG_TRAILER.len();
    if buffer.len() < frame_len {
        return Err(FrameError::BufferTooSmall);
    }

    let length = (payload.len() as u16).to_le_bytes();
    let body = CONFIG_HEADER.len() + 2;

    buffer[..4].copy_from_slice(&CONFIG_HEADER);
    buffer[4..6].copy_from_slice(&length);
    buffer[body..body + payload.len()].copy_from_slice(payload);
    buffer[body + payload.len()..frame_len].copy_from_slice(&CONFIG_TRAILER);

    Ok(frame_len)
}

/// Encode `payload` as a configuration frame into a heapless Vec
pub fn config_frame_to_vec(payload: &[u8]) -> Result<Vec<u8, MAX_CONFIG_FRAME>, FrameError> {
    let mut buffer = [0u8; MAX_CONFIG_FRAME];
    let len = encode_config_frame(payload, &mut buffer)?;
    let mut vec = Vec::new();
    vec.extend_from_slice(&buffer[..len])
        .map_err(|_| FrameError::BufferTooSmall)?;
    Ok(vec)
}

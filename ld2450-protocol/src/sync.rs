//! Resumable frame synchronizer
//!
//! The synchronizer is polled with whatever bytes the UART has buffered. It
//! never waits: when a frame is incomplete it keeps its classification, the
//! configuration length once read and the body bytes received so far, and
//! picks up on the next poll. Frames are assembled in an internal buffer, so
//! a source holding fewer bytes than a whole frame still makes progress.
//!
//! ```text
//!            header match                 26 bytes taken
//!   None ───────────────▶ TargetUpdate ─────────────────▶ None (+ frame)
//!     │
//!     │      header match                 LEN + 4 bytes taken
//!     └──────────────────▶ Config ───────────────────────▶ None (+ frame)
//! ```

use heapless::Vec;
use ld2450_hal::ByteSource;

use crate::frame::{
    CONFIG_HEADER, CONFIG_TRAILER, MAX_CONFIG_PAYLOAD, TARGET_PAYLOAD_LEN, UPDATE_HEADER,
    UPDATE_TRAILER,
};

#[cfg(feature = "defmt")]
use defmt::debug;

#[cfg(not(feature = "defmt"))]
macro_rules! debug {
    ($($arg:tt)*) => {{}};
}

/// Bytes following a target-update header (payload + trailer)
const UPDATE_BODY_LEN: usize = TARGET_PAYLOAD_LEN + UPDATE_TRAILER.len();

/// Largest body assembled: configuration payload + trailer
const MAX_BODY_LEN: usize = MAX_CONFIG_PAYLOAD + CONFIG_TRAILER.len();

/// Kind of frame whose header has been matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Classification {
    /// Scanning for a header
    #[default]
    None,
    /// `AA FF 03 00` matched, waiting for payload
    TargetUpdate,
    /// `FD FC FB FA` matched, waiting for length and payload
    Config,
}

/// A complete frame with a valid trailer
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Frame {
    /// Target-update payload (3 × 8-byte records)
    TargetUpdate([u8; TARGET_PAYLOAD_LEN]),
    /// Configuration payload, length prefix and trailer stripped
    Config(Vec<u8, MAX_CONFIG_PAYLOAD>),
}

/// State machine locating frames in the byte stream
#[derive(Debug, Clone, Default)]
pub struct FrameSync {
    classification: Classification,
    /// Configuration payload length, cached once read
    config_length: Option<u16>,
    /// Body bytes of the pending frame received so far
    body: Vec<u8, MAX_BODY_LEN>,
    /// Bytes of an oversized configuration frame still to drop
    discard_remaining: usize,
    /// Frames dropped for a bad trailer or oversized length
    dropped: u32,
}

impl FrameSync {
    /// Create a new synchronizer
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset to scanning, forgetting any partial frame
    pub fn reset(&mut self) {
        self.classification = Classification::None;
        self.config_length = None;
        self.body.clear();
        self.discard_remaining = 0;
    }

    /// Current pending classification
    pub fn classification(&self) -> Classification {
        self.classification
    }

    /// Number of frames discarded since creation
    pub fn dropped_frames(&self) -> u32 {
        self.dropped
    }

    /// Advance with the bytes currently available
    ///
    /// Returns at most one complete frame per call. Frames with a bad
    /// trailer are dropped silently.
    pub fn poll<S: ByteSource + ?Sized>(&mut self, source: &mut S) -> Option<Frame> {
        if self.discard_remaining > 0 {
            self.discard_remaining -= source.skip(self.discard_remaining);
            if self.discard_remaining > 0 {
                return None;
            }
        }

        self.scan(source);

        match self.classification {
            Classification::None => None,
            Classification::TargetUpdate => self.take_target_update(source),
            Classification::Config => self.take_config(source),
        }
    }

    /// Look for a header while none is pending and a whole header is buffered
    fn scan<S: ByteSource + ?Sized>(&mut self, source: &mut S) {
        while self.classification == Classification::None && source.available() >= 4 {
            let (header, kind) = if source.peek() == Some(UPDATE_HEADER[0]) {
                (&UPDATE_HEADER, Classification::TargetUpdate)
            } else {
                (&CONFIG_HEADER, Classification::Config)
            };

            if Self::match_header(source, header) {
                self.classification = kind;
            }
        }
    }

    /// Consume a header, stopping at the first mismatch
    ///
    /// The mismatching byte is left in place unless it is the very first
    /// one, so the next attempt starts exactly one byte further on. Neither
    /// header contains the first byte of a header past position 0, so the
    /// discarded prefix can never hide a real frame start.
    fn match_header<S: ByteSource + ?Sized>(source: &mut S, header: &[u8; 4]) -> bool {
        for (i, &expected) in header.iter().enumerate() {
            match source.peek() {
                Some(byte) if byte == expected => {
                    source.read_byte();
                }
                Some(_) if i == 0 => {
                    source.read_byte();
                    return false;
                }
                _ => return false,
            }
        }
        true
    }

    /// Move bytes into the pending body until it holds `len` bytes
    fn fill<S: ByteSource + ?Sized>(&mut self, source: &mut S, len: usize) -> bool {
        while self.body.len() < len {
            match source.read_byte() {
                // Cannot fail: `len` never exceeds MAX_BODY_LEN
                Some(byte) => {
                    let _ = self.body.push(byte);
                }
                None => return false,
            }
        }
        true
    }

    /// Complete once the 24-byte payload and 2-byte trailer are in: 26 bytes
    /// after the header, not 28
    fn take_target_update<S: ByteSource + ?Sized>(&mut self, source: &mut S) -> Option<Frame> {
        if !self.fill(source, UPDATE_BODY_LEN) {
            return None;
        }
        self.classification = Classification::None;
        let body = core::mem::take(&mut self.body);

        if body[TARGET_PAYLOAD_LEN..] != UPDATE_TRAILER {
            debug!("Target frame dropped: bad trailer");
            self.dropped = self.dropped.wrapping_add(1);
            return None;
        }

        let mut payload = [0u8; TARGET_PAYLOAD_LEN];
        payload.copy_from_slice(&body[..TARGET_PAYLOAD_LEN]);
        Some(Frame::TargetUpdate(payload))
    }

    fn take_config<S: ByteSource + ?Sized>(&mut self, source: &mut S) -> Option<Frame> {
        let length = match self.config_length {
            Some(length) => length as usize,
            None => {
                if !self.fill(source, 2) {
                    return None;
                }
                let length = u16::from_le_bytes([self.body[0], self.body[1]]);
                self.body.clear();
                self.config_length = Some(length);
                length as usize
            }
        };

        if length > MAX_CONFIG_PAYLOAD {
            debug!("Config frame dropped: length {} too large", length);
            self.reset();
            self.dropped = self.dropped.wrapping_add(1);
            let total = length + CONFIG_TRAILER.len();
            self.discard_remaining = total - source.skip(total);
            return None;
        }

        if !self.fill(source, length + CONFIG_TRAILER.len()) {
            return None;
        }
        self.classification = Classification::None;
        self.config_length = None;
        let body = core::mem::take(&mut self.body);

        if body[length..] != CONFIG_TRAILER {
            debug!("Config frame dropped: bad trailer");
            self.dropped = self.dropped.wrapping_add(1);
            return None;
        }

        let mut payload = Vec::new();
        // Cannot fail: length checked against capacity above
        let _ = payload.extend_from_slice(&body[..length]);
        Some(Frame::Config(payload))
    }
}

//! HLK-LD2450 Wire Protocol
//!
//! The LD2450 talks over a single UART at 256000 baud (8N1). Two frame types
//! share the line:
//!
//! ```text
//! Target update (module → host, ~10 Hz in normal mode)
//! ┌─────────────┬──────────────────────────────┬───────┐
//! │ AA FF 03 00 │ 3 × 8-byte target record     │ 55 CC │
//! └─────────────┴──────────────────────────────┴───────┘
//!
//! Configuration (host → module commands, module → host acks)
//! ┌─────────────┬────────────┬─────────────────┬─────────────┐
//! │ FD FC FB FA │ LEN (u16LE)│ payload (LEN B) │ 04 03 02 01 │
//! └─────────────┴────────────┴─────────────────┴─────────────┘
//! ```
//!
//! There is no checksum. Integrity comes from the fixed headers and
//! trailers only; a frame whose trailer does not match is dropped.

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(unsafe_code)]

pub mod ack;
pub mod command;
pub mod frame;
pub mod sync;
pub mod target;

pub use ack::{ConfigAck, FirmwareVersion};
pub use command::{opcode, BaudRate, Command, CommandError, TrackingMode, MAX_COMMAND_LEN};
pub use frame::{
    config_frame_to_vec, encode_config_frame, FrameError, CONFIG_HEADER, CONFIG_TRAILER,
    MAX_CONFIG_FRAME, MAX_CONFIG_PAYLOAD, TARGET_PAYLOAD_LEN, UPDATE_HEADER, UPDATE_TRAILER,
};
pub use sync::{Classification, Frame, FrameSync};
pub use target::{TargetRecord, TARGET_COUNT, TARGET_RECORD_LEN};

//! Configuration commands
//!
//! A command payload starts with a 16-bit little-endian command word whose
//! low byte is the opcode, followed by an optional value. The module answers
//! with the same opcode and `0x01` in the second byte.

use heapless::Vec;

/// Longest command payload accepted by the queue
pub const MAX_COMMAND_LEN: usize = 16;

/// Command opcodes (low byte of the command word)
pub mod opcode {
    /// Enable configuration mode
    pub const ENTER_CONFIG: u8 = 0xFF;
    /// End configuration mode, resume streaming
    pub const LEAVE_CONFIG: u8 = 0xFE;
    /// Read firmware version
    pub const READ_VERSION: u8 = 0xA0;
    /// Set serial baud rate (takes effect after restart)
    pub const SET_BAUD_RATE: u8 = 0xA1;
    /// Restore factory settings
    pub const FACTORY_RESET: u8 = 0xA2;
    /// Restart the module
    pub const RESTART: u8 = 0xA3;
    /// Enable or disable Bluetooth
    pub const SET_BLUETOOTH: u8 = 0xA4;
    /// Read Bluetooth MAC address
    pub const READ_MAC: u8 = 0xA5;
    /// Track a single target
    pub const SINGLE_TARGET_TRACKING: u8 = 0x80;
    /// Track up to three targets
    pub const MULTI_TARGET_TRACKING: u8 = 0x90;
    /// Query the current tracking mode
    pub const READ_TRACKING_MODE: u8 = 0x91;
}

/// Errors building or queueing a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// Command has no opcode byte
    Empty,
    /// Command exceeds [`MAX_COMMAND_LEN`]
    TooLong,
    /// Command queue is full
    QueueFull,
}

/// Serial baud rates selectable through [`Command::set_baud_rate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BaudRate {
    B9600,
    B19200,
    B38400,
    B57600,
    B115200,
    B230400,
    B256000,
    B460800,
}

impl BaudRate {
    /// Index value the module expects
    pub fn index(self) -> u16 {
        match self {
            BaudRate::B9600 => 0x0001,
            BaudRate::B19200 => 0x0002,
            BaudRate::B38400 => 0x0003,
            BaudRate::B57600 => 0x0004,
            BaudRate::B115200 => 0x0005,
            BaudRate::B230400 => 0x0006,
            BaudRate::B256000 => 0x0007,
            BaudRate::B460800 => 0x0008,
        }
    }

    /// Bits per second
    pub fn bps(self) -> u32 {
        match self {
            BaudRate::B9600 => 9_600,
            BaudRate::B19200 => 19_200,
            BaudRate::B38400 => 38_400,
            BaudRate::B57600 => 57_600,
            BaudRate::B115200 => 115_200,
            BaudRate::B230400 => 230_400,
            BaudRate::B256000 => 256_000,
            BaudRate::B460800 => 460_800,
        }
    }
}

/// Target tracking mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TrackingMode {
    /// Report only the strongest target
    Single,
    /// Report up to three targets
    Multi,
}

/// One outbound command payload
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Command {
    bytes: Vec<u8, MAX_COMMAND_LEN>,
}

impl Command {
    /// Wrap raw command bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CommandError> {
        if bytes.is_empty() {
            return Err(CommandError::Empty);
        }
        let mut vec = Vec::new();
        vec.extend_from_slice(bytes)
            .map_err(|_| CommandError::TooLong)?;
        Ok(Self { bytes: vec })
    }

    /// Build a command from a fixed payload that is known to fit
    fn fixed<const N: usize>(bytes: [u8; N]) -> Self {
        let mut vec = Vec::new();
        for byte in bytes.into_iter().take(MAX_COMMAND_LEN) {
            // Cannot fail: bounded by `take`
            let _ = vec.push(byte);
        }
        Self { bytes: vec }
    }

    /// Opcode of this command
    pub fn opcode(&self) -> u8 {
        self.bytes[0]
    }

    /// Raw payload bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn is_enter_config(&self) -> bool {
        self.opcode() == opcode::ENTER_CONFIG
    }

    pub fn is_leave_config(&self) -> bool {
        self.opcode() == opcode::LEAVE_CONFIG
    }

    pub fn enter_config() -> Self {
        Self::fixed([opcode::ENTER_CONFIG, 0x00, 0x01, 0x00])
    }

    pub fn leave_config() -> Self {
        Self::fixed([opcode::LEAVE_CONFIG, 0x00])
    }

    pub fn read_version() -> Self {
        Self::fixed([opcode::READ_VERSION, 0x00])
    }

    pub fn set_baud_rate(rate: BaudRate) -> Self {
        let [lo, hi] = rate.index().to_le_bytes();
        Self::fixed([opcode::SET_BAUD_RATE, 0x00, lo, hi])
    }

    pub fn factory_reset() -> Self {
        Self::fixed([opcode::FACTORY_RESET, 0x00])
    }

    pub fn restart() -> Self {
        Self::fixed([opcode::RESTART, 0x00])
    }

    pub fn set_bluetooth(enabled: bool) -> Self {
        Self::fixed([opcode::SET_BLUETOOTH, 0x00, enabled as u8, 0x00])
    }

    pub fn read_mac() -> Self {
        Self::fixed([opcode::READ_MAC, 0x00, 0x01, 0x00])
    }

    pub fn set_tracking_mode(mode: TrackingMode) -> Self {
        match mode {
            TrackingMode::Single => Self::fixed([opcode::SINGLE_TARGET_TRACKING, 0x00]),
            TrackingMode::Multi => Self::fixed([opcode::MULTI_TARGET_TRACKING, 0x00]),
        }
    }

    pub fn read_tracking_mode() -> Self {
        Self::fixed([opcode::READ_TRACKING_MODE, 0x00])
    }
}

//! UART serial communication abstractions
//!
//! The radar driver is polled cooperatively, so the receive side is modelled
//! as a byte source that can be inspected without blocking: callers check how
//! many bytes are buffered and only read what is already there.

/// Non-blocking byte source
///
/// Implementations buffer incoming bytes and hand them out on request.
/// None of these methods may wait for data to arrive.
pub trait ByteSource {
    /// Number of bytes that can be read right now
    fn available(&mut self) -> usize;

    /// Look at the next byte without consuming it
    fn peek(&mut self) -> Option<u8>;

    /// Consume the next byte
    fn read_byte(&mut self) -> Option<u8>;

    /// Fill `buf` completely, or consume nothing
    ///
    /// Returns `false` when fewer than `buf.len()` bytes are buffered; the
    /// caller should retry on a later poll.
    fn read_exact(&mut self, buf: &mut [u8]) -> bool {
        if self.available() < buf.len() {
            return false;
        }
        for slot in buf.iter_mut() {
            match self.read_byte() {
                Some(byte) => *slot = byte,
                None => return false,
            }
        }
        true
    }

    /// Drop up to `count` buffered bytes, returning how many were dropped
    fn skip(&mut self, count: usize) -> usize {
        let mut skipped = 0;
        while skipped < count && self.read_byte().is_some() {
            skipped += 1;
        }
        skipped
    }
}

/// Byte sink for outbound traffic
pub trait ByteSink {
    /// Error type for transmit operations
    type Error;

    /// Queue `data` for transmission
    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Flush any buffered data
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// Combined serial transport
///
/// The radar shares one UART for both directions.
pub trait Transport: ByteSource + ByteSink {}

// Blanket implementation
impl<T: ByteSource + ByteSink> Transport for T {}

/// UART configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
    /// Number of data bits (typically 8)
    pub data_bits: DataBits,
    /// Parity mode
    pub parity: Parity,
    /// Number of stop bits
    pub stop_bits: StopBits,
}

impl UartConfig {
    /// Line settings the LD2450 ships with (256000 baud, 8N1)
    pub const LD2450: Self = Self {
        baudrate: 256_000,
        data_bits: DataBits::Eight,
        parity: Parity::None,
        stop_bits: StopBits::One,
    };

    /// Check that these settings can talk to the module
    pub fn matches_required(&self) -> bool {
        *self == Self::LD2450
    }
}

impl Default for UartConfig {
    fn default() -> Self {
        Self::LD2450
    }
}

/// Number of data bits per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataBits {
    Seven,
    Eight,
    Nine,
}

/// Parity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopBits {
    One,
    Two,
}

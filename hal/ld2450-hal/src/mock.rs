//! In-memory transport and clock for host-side testing

use core::cell::Cell;

use heapless::{Deque, Vec};

use crate::clock::Clock;
use crate::uart::{ByteSink, ByteSource};

/// Receive buffer capacity of [`MockUart`]
pub const MOCK_RX_CAPACITY: usize = 512;

/// Transmit log capacity of [`MockUart`]
pub const MOCK_TX_CAPACITY: usize = 1024;

/// Error returned by [`MockUart`] when writes are set to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MockError;

/// Loopback-free UART double
///
/// Bytes pushed with [`feed`](MockUart::feed) become readable; everything the
/// driver writes is appended to a log that tests can inspect.
#[derive(Default)]
pub struct MockUart {
    rx: Deque<u8, MOCK_RX_CAPACITY>,
    tx: Vec<u8, MOCK_TX_CAPACITY>,
    flushes: usize,
    fail_writes: bool,
}

impl MockUart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make bytes available for reading
    ///
    /// Bytes beyond the receive capacity are dropped, like a UART overrun.
    pub fn feed(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            if self.rx.push_back(byte).is_err() {
                return;
            }
        }
    }

    /// Everything written so far
    pub fn written(&self) -> &[u8] {
        &self.tx
    }

    /// Return and clear the write log
    pub fn take_written(&mut self) -> Vec<u8, MOCK_TX_CAPACITY> {
        core::mem::take(&mut self.tx)
    }

    /// Number of `flush` calls seen
    pub fn flushes(&self) -> usize {
        self.flushes
    }

    /// Make subsequent writes fail
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }
}

impl ByteSource for MockUart {
    fn available(&mut self) -> usize {
        self.rx.len()
    }

    fn peek(&mut self) -> Option<u8> {
        self.rx.front().copied()
    }

    fn read_byte(&mut self) -> Option<u8> {
        self.rx.pop_front()
    }
}

impl ByteSink for MockUart {
    type Error = MockError;

    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        if self.fail_writes {
            return Err(MockError);
        }
        self.tx.extend_from_slice(data).map_err(|_| MockError)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.flushes += 1;
        Ok(())
    }
}

/// Manually advanced clock
#[derive(Debug, Default)]
pub struct MockClock {
    now_ms: Cell<u64>,
}

impl MockClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now_ms: Cell::new(start_ms),
        }
    }

    /// Move time forward
    pub fn advance(&self, ms: u64) {
        self.now_ms.set(self.now_ms.get() + ms);
    }

    /// Jump to an absolute time
    pub fn set(&self, ms: u64) {
        self.now_ms.set(ms);
    }
}

impl Clock for MockClock {
    fn now_ms(&self) -> u64 {
        self.now_ms.get()
    }
}

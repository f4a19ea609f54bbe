//! Adapters from `embedded-io` peripherals to the driver's transport traits
//!
//! Most HALs expose buffered UARTs through `embedded_io::{Read, ReadReady,
//! Write}`. [`BufferedSource`] pulls whatever the peripheral has ready into a
//! local ring so the driver can peek and count bytes without blocking.

use embedded_io::{Read, ReadReady, Write};
use heapless::Deque;

use crate::uart::{ByteSink, ByteSource};

/// Chunk size used when draining the underlying reader
const PULL_CHUNK: usize = 32;

/// Non-blocking byte source over an `embedded-io` reader
///
/// `N` bounds the number of bytes held locally. The frame synchronizer
/// assembles frames in its own buffer, so `N` only needs to cover what
/// arrives between two polls; it must be at least 4 to hold a header.
pub struct BufferedSource<R, const N: usize> {
    reader: R,
    ring: Deque<u8, N>,
}

impl<R, const N: usize> BufferedSource<R, N> {
    /// Wrap a reader
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            ring: Deque::new(),
        }
    }

    /// Release the underlying reader, dropping any buffered bytes
    pub fn free(self) -> R {
        self.reader
    }
}

impl<R: Read + ReadReady, const N: usize> BufferedSource<R, N> {
    /// Move everything the reader has ready into the local ring
    fn pull(&mut self) {
        let mut chunk = [0u8; PULL_CHUNK];
        loop {
            let room = N - self.ring.len();
            if room == 0 {
                return;
            }
            match self.reader.read_ready() {
                Ok(true) => {}
                _ => return,
            }
            let want = room.min(PULL_CHUNK);
            let n = match self.reader.read(&mut chunk[..want]) {
                Ok(n) if n > 0 => n,
                _ => return,
            };
            for &byte in &chunk[..n] {
                // Cannot fail: `want` never exceeds the free space
                let _ = self.ring.push_back(byte);
            }
        }
    }
}

impl<R: Read + ReadReady, const N: usize> ByteSource for BufferedSource<R, N> {
    fn available(&mut self) -> usize {
        self.pull();
        self.ring.len()
    }

    fn peek(&mut self) -> Option<u8> {
        if self.ring.is_empty() {
            self.pull();
        }
        self.ring.front().copied()
    }

    fn read_byte(&mut self) -> Option<u8> {
        if self.ring.is_empty() {
            self.pull();
        }
        self.ring.pop_front()
    }
}

/// Byte sink over an `embedded-io` writer
pub struct IoSink<W> {
    writer: W,
}

impl<W> IoSink<W> {
    /// Wrap a writer
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Release the underlying writer
    pub fn free(self) -> W {
        self.writer
    }
}

impl<W: Write> ByteSink for IoSink<W> {
    type Error = W::Error;

    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.writer.write_all(data)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.writer.flush()
    }
}

/// Split RX/TX halves presented as one transport
///
/// Typical use with a split buffered UART:
///
/// ```ignore
/// let (tx, rx) = uart.split();
/// let transport = IoTransport::<_, _, 128>::new(rx, tx);
/// ```
pub struct IoTransport<R, W, const N: usize> {
    source: BufferedSource<R, N>,
    sink: IoSink<W>,
}

impl<R, W, const N: usize> IoTransport<R, W, N> {
    /// Combine a reader and a writer
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            source: BufferedSource::new(reader),
            sink: IoSink::new(writer),
        }
    }

    /// Release both halves
    pub fn free(self) -> (R, W) {
        (self.source.free(), self.sink.free())
    }
}

impl<R: Read + ReadReady, W, const N: usize> ByteSource for IoTransport<R, W, N> {
    fn available(&mut self) -> usize {
        self.source.available()
    }

    fn peek(&mut self) -> Option<u8> {
        self.source.peek()
    }

    fn read_byte(&mut self) -> Option<u8> {
        self.source.read_byte()
    }
}

impl<R, W: Write, const N: usize> ByteSink for IoTransport<R, W, N> {
    type Error = W::Error;

    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.sink.write(data)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.sink.flush()
    }
}

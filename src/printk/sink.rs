//! Byte sinks: where formatted output goes
//!
//! The formatting engine never touches hardware directly. It hands every
//! output byte, in order, to a [`ByteSink`]. The PL011 driver is the sink on
//! real hardware; [`CaptureSink`] records bytes for tests and host builds.

use core::fmt;

/// Ordered, blocking, single-byte output
pub trait ByteSink {
    /// Emit one byte, blocking until the device accepts it
    fn write_byte(&mut self, byte: u8);

    /// Emit a run of bytes in order
    fn write_bytes(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.write_byte(byte);
        }
    }
}

impl<S: ByteSink + ?Sized> ByteSink for &mut S {
    fn write_byte(&mut self, byte: u8) {
        (**self).write_byte(byte);
    }
}

/// Fixed-capacity sink that records everything written to it
///
/// Bytes past the capacity are counted in [`CaptureSink::dropped`] and
/// otherwise discarded; capture never blocks and never allocates.
pub struct CaptureSink<const N: usize> {
    bytes: heapless::Vec<u8, N>,
    dropped: usize,
}

impl<const N: usize> CaptureSink<N> {
    /// Create an empty capture buffer
    pub const fn new() -> Self {
        Self {
            bytes: heapless::Vec::new(),
            dropped: 0,
        }
    }

    /// Everything captured so far
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of bytes lost to a full buffer
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Forget captured output
    pub fn clear(&mut self) {
        self.bytes.clear();
        self.dropped = 0;
    }
}

impl<const N: usize> Default for CaptureSink<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> ByteSink for CaptureSink<N> {
    fn write_byte(&mut self, byte: u8) {
        if self.bytes.push(byte).is_err() {
            self.dropped += 1;
        }
    }
}

/// `core::fmt::Write` over a byte sink
///
/// Only the panic path needs this: `PanicInfo` carries `fmt::Arguments`,
/// which printk templates cannot express.
pub struct SinkWriter<S>(pub S);

impl<S: ByteSink> fmt::Write for SinkWriter<S> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0.write_bytes(s.as_bytes());
        Ok(())
    }
}

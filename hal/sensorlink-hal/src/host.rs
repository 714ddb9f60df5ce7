//! Host-side adapters
//!
//! Lets the framer run on a desktop against a serial port handle, a file,
//! or an in-memory buffer.

use std::io::Write;
use std::time::Instant;

use crate::clock::Clock;
use crate::uart::UartTx;

/// Byte sink over any [`std::io::Write`]
#[derive(Debug)]
pub struct WriteSink<W> {
    inner: W,
}

impl<W: Write> WriteSink<W> {
    /// Wrap a writer
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Borrow the underlying writer
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Consume the sink and return the underlying writer
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> UartTx for WriteSink<W> {
    type Error = std::io::Error;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.inner.write_all(data)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.inner.flush()
    }
}

/// Clock counting milliseconds since construction
#[derive(Debug, Clone, Copy)]
pub struct InstantClock {
    origin: Instant,
}

impl Default for InstantClock {
    fn default() -> Self {
        Self::new()
    }
}

impl InstantClock {
    /// Start counting from now
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for InstantClock {
    fn now_ms(&self) -> u32 {
        // Wraps after ~49 days; consumers only keep the low bits
        self.origin.elapsed().as_millis() as u32
    }
}

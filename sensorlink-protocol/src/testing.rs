//! Test doubles for the serial sink
//!
//! Enabled by the `testing` feature for use from other crates' tests.

use core::convert::Infallible;

use sensorlink_hal::UartTx;

/// Sink that records every write as a separate chunk
#[derive(Debug, Default)]
pub struct RecordingSink {
    /// One entry per `write_blocking` call, in order
    pub writes: Vec<Vec<u8>>,
}

impl RecordingSink {
    /// All written bytes, concatenated
    pub fn bytes(&self) -> Vec<u8> {
        self.writes.concat()
    }
}

impl UartTx for RecordingSink {
    type Error = Infallible;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Infallible> {
        self.writes.push(data.to_vec());
        Ok(())
    }
}

/// Sink that fails once a fixed number of writes has been accepted
#[derive(Debug)]
pub struct FailingSink {
    /// Writes accepted so far
    pub accepted: usize,
    /// Writes accepted before every further write fails
    pub limit: usize,
}

impl UartTx for FailingSink {
    type Error = ();

    fn write_blocking(&mut self, _data: &[u8]) -> Result<(), ()> {
        if self.accepted == self.limit {
            return Err(());
        }
        self.accepted += 1;
        Ok(())
    }
}

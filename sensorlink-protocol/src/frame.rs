//! Packet framing
//!
//! Frame format (all fields little-endian):
//! - HEADER (2 bytes): frame synchronization marker, 0xDE 0xAB
//! - TIMESTAMP (2 bytes): clock tick at pack time, truncated to 16 bits
//! - PAYLOAD_SIZE (2 bytes): number of payload bytes (0-1024)
//! - PAYLOAD (0-1024 bytes): encoded record
//! - CHECKSUM (2 bytes): CRC16 of HEADER through the last PAYLOAD byte

use heapless::Vec;
use sensorlink_hal::{Clock, UartTx};

use crate::crc::Crc16;
use crate::wire::{WireFormat, CHECKSUM_SIZE, MAX_FRAME_SIZE, MAX_PAYLOAD_SIZE, PREFIX_SIZE};

/// Reasons a payload is refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Payload exceeds [`MAX_PAYLOAD_SIZE`]
    PayloadTooLarge { len: usize },
    /// Nothing to send
    EmptyPayload,
    /// Buffer too small for encoding
    BufferTooSmall,
}

/// One frame with a fixed-capacity payload buffer
///
/// A packet is meant to be kept and reused: every [`Packet::pack`]
/// overwrites all fields that are transmitted. Payload bytes past
/// `payload_size` are left as they were and are never sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    header: u16,
    timestamp: u16,
    payload_size: u16,
    payload: [u8; MAX_PAYLOAD_SIZE],
    checksum: u16,
}

impl Default for Packet {
    fn default() -> Self {
        Self::new()
    }
}

impl Packet {
    /// Create a zeroed packet
    pub const fn new() -> Self {
        Self {
            header: 0,
            timestamp: 0,
            payload_size: 0,
            payload: [0; MAX_PAYLOAD_SIZE],
            checksum: 0,
        }
    }

    /// Frame synchronization marker
    pub fn header(&self) -> u16 {
        self.header
    }

    /// Clock tick (ms, wrapping at 65536) recorded at pack time
    pub fn timestamp(&self) -> u16 {
        self.timestamp
    }

    /// Number of valid payload bytes
    pub fn payload_size(&self) -> u16 {
        self.payload_size
    }

    /// The valid payload bytes
    pub fn payload(&self) -> &[u8] {
        &self.payload[..self.payload_size as usize]
    }

    /// Stored CRC16
    pub fn checksum(&self) -> u16 {
        self.checksum
    }

    /// Total number of bytes [`Packet::send`] transmits
    pub fn frame_len(&self) -> usize {
        PREFIX_SIZE + self.payload_size as usize + CHECKSUM_SIZE
    }

    /// Fill this packet from a payload
    ///
    /// Stamps the header from `wire`, the low 16 bits of `clock`, the
    /// payload length and bytes, then the checksum. A payload longer than
    /// [`MAX_PAYLOAD_SIZE`] is rejected and the packet is left untouched.
    /// An empty payload is a valid (if useless) frame.
    pub fn pack<C: Clock>(
        &mut self,
        wire: &WireFormat,
        clock: &C,
        payload: &[u8],
    ) -> Result<(), FrameError> {
        if payload.len() > MAX_PAYLOAD_SIZE {
            return Err(FrameError::PayloadTooLarge { len: payload.len() });
        }

        self.header = wire.header();
        self.timestamp = clock.now_ms() as u16;
        self.payload_size = payload.len() as u16;
        self.payload[..payload.len()].copy_from_slice(payload);
        self.checksum = self.calculate_checksum();

        Ok(())
    }

    /// Transmit this packet
    ///
    /// Issues exactly three writes: prefix, payload (possibly empty), and
    /// checksum. The first failing write aborts the rest; nothing is
    /// retried, so the receiver sees a truncated frame.
    pub fn send<T: UartTx>(&self, tx: &mut T) -> Result<(), T::Error> {
        tx.write_blocking(&self.prefix())?;
        tx.write_blocking(self.payload())?;
        tx.write_blocking(&self.checksum.to_le_bytes())
    }

    /// CRC16 over prefix and used payload bytes
    pub fn calculate_checksum(&self) -> u16 {
        let mut crc = Crc16::new();
        crc.update(&self.prefix());
        crc.update(self.payload());
        crc.finish()
    }

    /// Verify the stored checksum matches the current contents
    pub fn verify_checksum(&self) -> bool {
        self.checksum == self.calculate_checksum()
    }

    /// Encode the complete frame into a byte buffer
    ///
    /// Returns the number of bytes written
    pub fn write_to(&self, buffer: &mut [u8]) -> Result<usize, FrameError> {
        let frame_len = self.frame_len();
        if buffer.len() < frame_len {
            return Err(FrameError::BufferTooSmall);
        }

        let payload_end = PREFIX_SIZE + self.payload_size as usize;
        buffer[..PREFIX_SIZE].copy_from_slice(&self.prefix());
        buffer[PREFIX_SIZE..payload_end].copy_from_slice(self.payload());
        buffer[payload_end..frame_len].copy_from_slice(&self.checksum.to_le_bytes());

        Ok(frame_len)
    }

    /// Encode the complete frame into a heapless Vec
    pub fn to_vec(&self) -> Result<Vec<u8, MAX_FRAME_SIZE>, FrameError> {
        let mut buffer = [0u8; MAX_FRAME_SIZE];
        let len = self.write_to(&mut buffer)?;
        let mut vec = Vec::new();
        vec.extend_from_slice(&buffer[..len])
            .map_err(|_| FrameError::BufferTooSmall)?;
        Ok(vec)
    }

    fn prefix(&self) -> [u8; PREFIX_SIZE] {
        let [h0, h1] = self.header.to_le_bytes();
        let [t0, t1] = self.timestamp.to_le_bytes();
        let [s0, s1] = self.payload_size.to_le_bytes();
        [h0, h1, t0, t1, s0, s1]
    }
}

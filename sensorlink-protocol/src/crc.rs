//! CRC16 frame checksum
//!
//! Reflected polynomial 0xA001, register seeded with 0xFFFF, no final XOR.
//! This is the parameter set also known as CRC-16/MODBUS.

/// Initial register value
pub const CRC16_INIT: u16 = 0xFFFF;

/// Reflected form of polynomial 0x8005
const POLY: u16 = 0xA001;

/// Incremental CRC16 calculator
///
/// Feeding the same bytes in any split yields the same result as a single
/// [`crc16`] call over their concatenation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Crc16 {
    state: u16,
}

impl Default for Crc16 {
    fn default() -> Self {
        Self::new()
    }
}

impl Crc16 {
    /// Create a calculator with a freshly seeded register
    pub const fn new() -> Self {
        Self { state: CRC16_INIT }
    }

    /// Feed bytes into the register
    pub fn update(&mut self, data: &[u8]) {
        let mut crc = self.state;

        for &byte in data {
            crc ^= byte as u16;
            for _ in 0..8 {
                if crc & 1 != 0 {
                    crc = (crc >> 1) ^ POLY;
                } else {
                    crc >>= 1;
                }
            }
        }

        self.state = crc;
    }

    /// Current checksum value
    pub const fn finish(&self) -> u16 {
        self.state
    }
}

/// Compute the CRC16 of a byte slice
pub fn crc16(data: &[u8]) -> u16 {
    let mut crc = Crc16::new();
    crc.update(data);
    crc.finish()
}

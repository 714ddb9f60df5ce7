//! Wire format constants
//!
//! The frame layout has existed in two revisions. Both are described here
//! as data so the framer never hardcodes marker bytes or identifier widths.
//!
//! | revision | marker      | identifier |
//! |----------|-------------|------------|
//! | V1       | 0xDE 0x00   | 4 bytes    |
//! | V2       | 0xDE 0xAB   | 1 byte     |
//!
//! Both revisions checksum only the bytes actually transmitted.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Canonical frame synchronization marker, in wire order
pub const FRAME_MARKER: [u8; 2] = [0xDE, 0xAB];

/// Maximum payload size in bytes
pub const MAX_PAYLOAD_SIZE: usize = 1024;

/// HEADER + TIMESTAMP + PAYLOAD_SIZE
pub const PREFIX_SIZE: usize = 6;

/// Trailing CRC16
pub const CHECKSUM_SIZE: usize = 2;

/// Maximum complete frame size (PREFIX + MAX_PAYLOAD + CHECKSUM)
pub const MAX_FRAME_SIZE: usize = PREFIX_SIZE + MAX_PAYLOAD_SIZE + CHECKSUM_SIZE;

/// Width of the record identifier at the start of every payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum IdWidth {
    /// One byte
    U8,
    /// Four bytes, little-endian
    U32,
}

impl IdWidth {
    /// Number of bytes the identifier occupies
    pub const fn size(self) -> usize {
        match self {
            IdWidth::U8 => 1,
            IdWidth::U32 => 4,
        }
    }
}

/// A complete set of wire layout parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WireFormat {
    /// Header bytes in wire order
    pub marker: [u8; 2],
    /// Record identifier width
    pub id_width: IdWidth,
}

impl WireFormat {
    /// Legacy layout: single 0xDE marker byte, 4-byte identifiers
    pub const V1: WireFormat = WireFormat {
        marker: [0xDE, 0x00],
        id_width: IdWidth::U32,
    };

    /// Canonical layout
    pub const V2: WireFormat = WireFormat {
        marker: FRAME_MARKER,
        id_width: IdWidth::U8,
    };

    /// Header field value as stored in a packet
    pub const fn header(&self) -> u16 {
        u16::from_le_bytes(self.marker)
    }
}

impl Default for WireFormat {
    fn default() -> Self {
        Self::V2
    }
}

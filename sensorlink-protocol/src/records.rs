//! Telemetry record types
//!
//! Each record is byte-packed with no padding, identifier first:
//!
//! | kind            | id | layout after the identifier          |
//! |-----------------|----|--------------------------------------|
//! | Date            | 1  | day u32, month u32, year u32         |
//! | Time            | 2  | hour u8, minute u16, second u16      |
//! | AdcSample       | 3  | sample_count u32, value u16          |
//! | TextMessage     | 4  | length u16, `length` bytes           |
//! | ButtonState     | 5  | button_id u8, state u16              |
//! | McuTemperature  | 6  | celsius u16                          |

use crate::frame::FrameError;
use crate::wire::{IdWidth, WireFormat, MAX_PAYLOAD_SIZE};

/// Width of the text length field
const TEXT_LENGTH_SIZE: usize = 2;

/// Record identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum DataId {
    Date = 1,
    Time = 2,
    AdcSample = 3,
    TextMessage = 4,
    ButtonState = 5,
    McuTemperature = 6,
}

impl DataId {
    /// Number of record kinds
    pub const COUNT: usize = 6;

    /// Every kind, in identifier order
    pub const ALL: [DataId; Self::COUNT] = [
        DataId::Date,
        DataId::Time,
        DataId::AdcSample,
        DataId::TextMessage,
        DataId::ButtonState,
        DataId::McuTemperature,
    ];

    /// Parse an identifier from its wire value
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            1 => Some(DataId::Date),
            2 => Some(DataId::Time),
            3 => Some(DataId::AdcSample),
            4 => Some(DataId::TextMessage),
            5 => Some(DataId::ButtonState),
            6 => Some(DataId::McuTemperature),
            _ => None,
        }
    }

    /// Convert to wire value
    pub fn to_byte(self) -> u8 {
        self as u8
    }

    /// Zero-based position in [`DataId::ALL`]
    pub fn index(self) -> usize {
        self as usize - 1
    }

    /// Intended reporting rate; 0 means sent on change only
    ///
    /// Nothing in this crate schedules transmissions from these values.
    pub fn nominal_rate_hz(self) -> u8 {
        match self {
            DataId::Date | DataId::Time => 1,
            DataId::AdcSample => 50,
            DataId::TextMessage => 2,
            DataId::ButtonState | DataId::McuTemperature => 0,
        }
    }

    /// Returns true if this kind is sent on change rather than periodically
    pub fn is_event_driven(self) -> bool {
        self.nominal_rate_hz() == 0
    }
}

/// Longest text that still fits one payload under `wire`
pub const fn max_text_len(wire: &WireFormat) -> usize {
    MAX_PAYLOAD_SIZE - wire.id_width.size() - TEXT_LENGTH_SIZE
}

/// A single telemetry record
///
/// Built per transmission and dropped once encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TelemetryRecord<'a> {
    /// Calendar date
    Date { day: u32, month: u32, year: u32 },
    /// Time of day
    Time { hour: u8, minute: u16, second: u16 },
    /// One ADC conversion and the running sample counter
    AdcSample { sample_count: u32, value: u16 },
    /// Free-form bytes, not null-terminated
    TextMessage { text: &'a [u8] },
    /// Button transition
    ButtonState { button_id: u8, state: u16 },
    /// MCU die temperature in whole degrees Celsius
    McuTemperature { celsius: u16 },
}

impl<'a> TelemetryRecord<'a> {
    /// Identifier written at the start of the payload
    pub fn id(&self) -> DataId {
        match self {
            TelemetryRecord::Date { .. } => DataId::Date,
            TelemetryRecord::Time { .. } => DataId::Time,
            TelemetryRecord::AdcSample { .. } => DataId::AdcSample,
            TelemetryRecord::TextMessage { .. } => DataId::TextMessage,
            TelemetryRecord::ButtonState { .. } => DataId::ButtonState,
            TelemetryRecord::McuTemperature { .. } => DataId::McuTemperature,
        }
    }

    /// Exact number of payload bytes [`TelemetryRecord::encode`] produces
    pub fn encoded_len(&self, wire: &WireFormat) -> usize {
        let body = match self {
            TelemetryRecord::Date { .. } => 4 + 4 + 4,
            TelemetryRecord::Time { .. } => 1 + 2 + 2,
            TelemetryRecord::AdcSample { .. } => 4 + 2,
            TelemetryRecord::TextMessage { text } => TEXT_LENGTH_SIZE + text.len(),
            TelemetryRecord::ButtonState { .. } => 1 + 2,
            TelemetryRecord::McuTemperature { .. } => 2,
        };
        wire.id_width.size() + body
    }

    /// Encode this record into a byte buffer
    ///
    /// Returns the number of bytes written. Text longer than a u16 length
    /// field can describe is refused rather than truncated here; callers
    /// clamp with [`max_text_len`] first.
    pub fn encode(&self, wire: &WireFormat, buffer: &mut [u8]) -> Result<usize, FrameError> {
        let len = self.encoded_len(wire);
        if buffer.len() < len {
            return Err(FrameError::BufferTooSmall);
        }

        let mut out = Cursor::new(buffer);
        match wire.id_width {
            IdWidth::U8 => out.put_u8(self.id().to_byte()),
            IdWidth::U32 => out.put_u32(self.id().to_byte() as u32),
        }

        match *self {
            TelemetryRecord::Date { day, month, year } => {
                out.put_u32(day);
                out.put_u32(month);
                out.put_u32(year);
            }
            TelemetryRecord::Time {
                hour,
                minute,
                second,
            } => {
                out.put_u8(hour);
                out.put_u16(minute);
                out.put_u16(second);
            }
            TelemetryRecord::AdcSample {
                sample_count,
                value,
            } => {
                out.put_u32(sample_count);
                out.put_u16(value);
            }
            TelemetryRecord::TextMessage { text } => {
                let text_len =
                    u16::try_from(text.len()).map_err(|_| FrameError::PayloadTooLarge {
                        len,
                    })?;
                out.put_u16(text_len);
                out.put_slice(text);
            }
            TelemetryRecord::ButtonState { button_id, state } => {
                out.put_u8(button_id);
                out.put_u16(state);
            }
            TelemetryRecord::McuTemperature { celsius } => {
                out.put_u16(celsius);
            }
        }

        Ok(out.pos)
    }
}

/// Little-endian writer over a buffer already checked to be large enough
struct Cursor<'b> {
    buf: &'b mut [u8],
    pos: usize,
}

impl<'b> Cursor<'b> {
    fn new(buf: &'b mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn put_slice(&mut self, bytes: &[u8]) {
        self.buf[self.pos..self.pos + bytes.len()].copy_from_slice(bytes);
        self.pos += bytes.len();
    }

    fn put_u8(&mut self, value: u8) {
        self.put_slice(&[value]);
    }

    fn put_u16(&mut self, value: u16) {
        self.put_slice(&value.to_le_bytes());
    }

    fn put_u32(&mut self, value: u32) {
        self.put_slice(&value.to_le_bytes());
    }
}

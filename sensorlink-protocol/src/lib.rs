//! Sensorlink Telemetry Protocol
//!
//! This crate defines the serial framing used to stream typed telemetry
//! records from a sensor node to a host. It has two layers: a generic
//! packet framer and the encoding of the six record kinds carried inside it.
//!
//! # Protocol Overview
//!
//! Every record travels in one frame, all fields little-endian:
//! ```text
//! ┌────────┬───────────┬──────────────┬──────────────┬──────────┐
//! │ HEADER │ TIMESTAMP │ PAYLOAD_SIZE │ PAYLOAD      │ CHECKSUM │
//! │ 2B     │ 2B        │ 2B           │ 0–1024B      │ 2B       │
//! └────────┴───────────┴──────────────┴──────────────┴──────────┘
//! ```
//!
//! The checksum is CRC16 (poly 0xA001 reflected, init 0xFFFF) over every
//! byte before it. Frames go out in three writes: the 6-byte prefix, the
//! used payload bytes, then the checksum.

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(unsafe_code)]

pub mod crc;
pub mod frame;
pub mod records;
pub mod wire;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use crc::{crc16, Crc16};
pub use frame::{FrameError, Packet};
pub use records::{max_text_len, DataId, TelemetryRecord};
pub use wire::{
    IdWidth, WireFormat, CHECKSUM_SIZE, FRAME_MARKER, MAX_FRAME_SIZE, MAX_PAYLOAD_SIZE,
    PREFIX_SIZE,
};

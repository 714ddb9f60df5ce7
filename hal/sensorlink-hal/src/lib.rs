//! Sensorlink Hardware Abstraction Layer
//!
//! This crate defines the two collaborators the telemetry framer depends
//! on, so the same framing code runs against a chip UART, a host serial
//! port, or a test double.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  sensorlink-core (TelemetrySender)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  sensorlink-protocol (Packet, CRC16)    │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ uart::UartTx  │       │ clock::Clock  │
//! │  (byte sink)  │       │  (ms ticks)   │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`uart::UartTx`] - Serial byte sink
//! - [`clock::Clock`] - Monotonic millisecond tick source

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]

pub mod clock;
pub mod uart;

#[cfg(feature = "std")]
pub mod host;

// Re-export key traits at crate root for convenience
pub use clock::{Clock, FixedClock};
pub use uart::{UartConfig, UartTx};

#[cfg(feature = "std")]
pub use host::{InstantClock, WriteSink};

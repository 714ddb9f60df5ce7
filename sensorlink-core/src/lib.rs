//! Sensor-node side of the Sensorlink telemetry link
//!
//! This crate owns everything above the framer:
//!
//! - [`sender::TelemetrySender`] - one persistent packet per record kind,
//!   and the six per-kind send operations
//! - [`config::LinkConfig`] - serial and wire settings, persisted as
//!   postcard binary

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod sender;

pub use config::{ConfigError, LinkConfig};
pub use sender::{send_packet_data, SendError, TelemetrySender};

//! Link configuration
//!
//! Serial and wire settings for one node. Stored in flash or sent by a
//! provisioning tool as postcard binary data.
//!
//! The two halves are consumed by different layers: board bring-up applies
//! `uart` when it configures the serial peripheral, before any sink exists,
//! and [`TelemetrySender::from_config`](crate::TelemetrySender::from_config)
//! reads only `wire`.

use serde::{Deserialize, Serialize};

use sensorlink_hal::UartConfig;
use sensorlink_protocol::WireFormat;

/// Current layout version of the serialized configuration
pub const CONFIG_VERSION: u8 = 1;

/// Upper bound on the serialized size, for sizing storage buffers
pub const MAX_CONFIG_SIZE: usize = 32;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Serialization failed (usually: buffer too small)
    Serialize,
    /// Deserialization failed
    Deserialize,
    /// Stored config was written by an incompatible layout
    VersionMismatch { found: u8 },
}

/// Link configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkConfig {
    /// Layout version, always [`CONFIG_VERSION`] when written by this crate
    pub version: u8,
    /// Serial port settings, applied by board bring-up to the peripheral
    /// behind the `UartTx` sink; not read by the sender
    pub uart: UartConfig,
    /// Frame layout
    pub wire: WireFormat,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            uart: UartConfig::default(),
            wire: WireFormat::default(),
        }
    }
}

impl LinkConfig {
    /// Serialize into `buffer`, returning the used prefix
    pub fn to_slice<'b>(&self, buffer: &'b mut [u8]) -> Result<&'b mut [u8], ConfigError> {
        postcard::to_slice(self, buffer).map_err(|_| ConfigError::Serialize)
    }

    /// Deserialize a stored configuration
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: LinkConfig = postcard::from_bytes(bytes).map_err(|_| ConfigError::Deserialize)?;

        if config.version != CONFIG_VERSION {
            return Err(ConfigError::VersionMismatch {
                found: config.version,
            });
        }

        Ok(config)
    }
}

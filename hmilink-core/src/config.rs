//! Link configuration
//!
//! All knobs have defaults matching the display's factory settings. With
//! the `serde` feature the configuration can be persisted as postcard
//! binary data behind a magic number and version byte.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use hmilink_protocol::DEFAULT_FRAME_TIMEOUT_MS;

use crate::scheduler::DEFAULT_REFRESH_INTERVAL_MS;

/// Magic number identifying stored link configuration
pub const CONFIG_MAGIC: u32 = 0x484D_494C; // "HMIL"

/// Current stored configuration version
pub const CONFIG_VERSION: u8 = 1;

/// Factory baud rate of the display
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Configuration persistence errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Buffer too small or serialization failed
    Encode,
    /// Bytes are not a stored configuration
    Decode,
    /// Stored by an incompatible version
    VersionMismatch,
}

/// Tunables of the display link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LinkConfig {
    /// Period of `Page::refresh` on the active page
    pub refresh_interval_ms: u32,
    /// Silence after which a partial frame is abandoned
    pub frame_timeout_ms: u32,
    /// Serial speed the transport should use; stored only, never read here
    pub baud_rate: u32,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkConfig {
    pub const fn new() -> Self {
        Self {
            refresh_interval_ms: DEFAULT_REFRESH_INTERVAL_MS,
            frame_timeout_ms: DEFAULT_FRAME_TIMEOUT_MS,
            baud_rate: DEFAULT_BAUD_RATE,
        }
    }

    pub const fn with_refresh_interval_ms(mut self, interval_ms: u32) -> Self {
        self.refresh_interval_ms = interval_ms;
        self
    }

    pub const fn with_frame_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.frame_timeout_ms = timeout_ms;
        self
    }

    pub const fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }
}

#[cfg(feature = "serde")]
#[derive(Serialize, Deserialize)]
struct StoredConfig {
    magic: u32,
    version: u8,
    config: LinkConfig,
}

#[cfg(feature = "serde")]
impl LinkConfig {
    /// Serialize into `buf`, returning the number of bytes written
    pub fn store(&self, buf: &mut [u8]) -> Result<usize, ConfigError> {
        let stored = StoredConfig {
            magic: CONFIG_MAGIC,
            version: CONFIG_VERSION,
            config: *self,
        };
        let used = postcard::to_slice(&stored, buf).map_err(|_| ConfigError::Encode)?;
        Ok(used.len())
    }

    /// Deserialize a configuration written by [`store`](Self::store)
    pub fn load(bytes: &[u8]) -> Result<Self, ConfigError> {
        let stored: StoredConfig = postcard::from_bytes(bytes).map_err(|_| ConfigError::Decode)?;

        if stored.magic != CONFIG_MAGIC {
            return Err(ConfigError::Decode);
        }
        if stored.version != CONFIG_VERSION {
            return Err(ConfigError::VersionMismatch);
        }

        Ok(stored.config)
    }
}

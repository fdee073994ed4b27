//! Monitor configuration
//!
//! One [`MonitorConfig`] is built at startup and passed explicitly to the
//! codec and the reader. Nothing reads configuration from globals.

pub mod types;

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use glasshouse_protocol::ProtocolConfig;

use crate::alarm::AlarmThresholds;

pub use types::*;

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Temperature warn threshold is not below the alarm threshold
    TemperatureThresholds,
    /// Gas warn threshold is not below the alarm threshold
    GasThresholds,
    /// Poll interval is zero
    ZeroPollInterval,
    /// History period or window leaves no room for a single entry
    EmptyHistory,
    /// History window holds more than [`MAX_HISTORY_CAPACITY`] entries
    HistoryTooLarge,
    /// Both magic bytes are equal, which defeats resynchronization
    MagicCollision,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ConfigError::TemperatureThresholds => "temperature warn threshold must be below alarm",
            ConfigError::GasThresholds => "gas warn threshold must be below alarm",
            ConfigError::ZeroPollInterval => "poll interval must be non-zero",
            ConfigError::EmptyHistory => "history window must hold at least one sample",
            ConfigError::HistoryTooLarge => "history window holds too many samples",
            ConfigError::MagicCollision => "magic bytes must differ",
        };
        f.write_str(msg)
    }
}

#[cfg(any(test, feature = "std"))]
impl std::error::Error for ConfigError {}

/// Complete monitor configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct MonitorConfig {
    pub protocol: ProtocolConfig,
    pub poll: PollConfig,
    pub history: HistoryConfig,
    pub thresholds: AlarmThresholds,
}

impl MonitorConfig {
    /// Check cross-field constraints
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.thresholds.temperature_x10.is_ascending() {
            return Err(ConfigError::TemperatureThresholds);
        }
        if !self.thresholds.gas.is_ascending() {
            return Err(ConfigError::GasThresholds);
        }
        if self.poll.interval_ms == 0 {
            return Err(ConfigError::ZeroPollInterval);
        }
        let capacity = self.history.capacity();
        if capacity == 0 {
            return Err(ConfigError::EmptyHistory);
        }
        if capacity > MAX_HISTORY_CAPACITY {
            return Err(ConfigError::HistoryTooLarge);
        }
        if self.protocol.magic[0] == self.protocol.magic[1] {
            return Err(ConfigError::MagicCollision);
        }
        Ok(())
    }
}

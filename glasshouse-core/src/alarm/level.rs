//! Alarm level classification
//!
//! Classifies temperature and gas readings against warn/alarm thresholds
//! mirrored from the sensor board.

use glasshouse_protocol::Frame;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default temperature warn threshold (×10 for 0.1°C resolution)
pub const TEMP_WARN_X10: u16 = 350;
/// Default temperature alarm threshold (×10 for 0.1°C resolution)
pub const TEMP_ALARM_X10: u16 = 500;
/// Default gas warn threshold (raw ADC)
pub const GAS_WARN_ADC: u16 = 2000;
/// Default gas alarm threshold (raw ADC)
pub const GAS_ALARM_ADC: u16 = 2500;

/// Severity of a single reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AlarmLevel {
    /// Below the warn threshold
    #[default]
    Normal,
    /// At or above warn, below alarm
    Warn,
    /// At or above the alarm threshold
    Alarm,
}

impl AlarmLevel {
    /// Upper-case label used by dashboards and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            AlarmLevel::Normal => "NORMAL",
            AlarmLevel::Warn => "WARN",
            AlarmLevel::Alarm => "ALARM",
        }
    }
}

/// Two ascending thresholds for one channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Thresholds<T> {
    /// Entry point of the warn band
    pub warn: T,
    /// Entry point of the alarm band
    pub alarm: T,
}

impl<T: PartialOrd + Copy> Thresholds<T> {
    /// Create a threshold pair
    pub const fn new(warn: T, alarm: T) -> Self {
        Self { warn, alarm }
    }

    /// Classify a reading
    ///
    /// Alarm is tested first so a value at or above the alarm threshold is
    /// never reported as a warning.
    pub fn classify(&self, value: T) -> AlarmLevel {
        if value >= self.alarm {
            return AlarmLevel::Alarm;
        }
        if value >= self.warn {
            return AlarmLevel::Warn;
        }
        AlarmLevel::Normal
    }

    /// Check that warn lies strictly below alarm
    pub fn is_ascending(&self) -> bool {
        self.warn < self.alarm
    }
}

/// Threshold set for both monitored channels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct AlarmThresholds {
    /// Temperature thresholds in 0.1°C units
    pub temperature_x10: Thresholds<u16>,
    /// Gas thresholds in raw ADC counts
    pub gas: Thresholds<u16>,
}

impl Default for AlarmThresholds {
    fn default() -> Self {
        Self {
            temperature_x10: Thresholds::new(TEMP_WARN_X10, TEMP_ALARM_X10),
            gas: Thresholds::new(GAS_WARN_ADC, GAS_ALARM_ADC),
        }
    }
}

/// Per-channel and combined levels for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Assessment {
    pub temperature: AlarmLevel,
    pub gas: AlarmLevel,
    /// Combined state shown to the operator
    pub overall: AlarmLevel,
}

impl AlarmThresholds {
    /// Classify a temperature in 0.1°C units
    pub fn classify_temperature(&self, temp_x10: u16) -> AlarmLevel {
        self.temperature_x10.classify(temp_x10)
    }

    /// Classify a raw gas reading
    pub fn classify_gas(&self, gas_raw: u16) -> AlarmLevel {
        self.gas.classify(gas_raw)
    }

    /// Assess a decoded frame
    ///
    /// The combined level stays Normal until the board itself raises an
    /// alarm flag; once it has, the level is Alarm if either reading has
    /// crossed its alarm threshold and Warn otherwise.
    pub fn assess(&self, frame: &Frame) -> Assessment {
        let temperature = self.classify_temperature(frame.temperature_x10());
        let gas = self.classify_gas(frame.gas_raw());

        let overall = if !frame.status().any_alarm() {
            AlarmLevel::Normal
        } else if temperature == AlarmLevel::Alarm || gas == AlarmLevel::Alarm {
            AlarmLevel::Alarm
        } else {
            AlarmLevel::Warn
        };

        Assessment {
            temperature,
            gas,
            overall,
        }
    }
}

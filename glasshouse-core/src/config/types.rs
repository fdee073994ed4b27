//! Configuration type definitions
//!
//! Section types for the monitor configuration. Defaults mirror the sensor
//! board's definitions and the dashboard's refresh rates.

use core::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default SPI poll interval (50 Hz)
pub const DEFAULT_POLL_INTERVAL_MS: u32 = 20;

/// Default bound on how long `stop` waits for the poll loop
pub const DEFAULT_STOP_TIMEOUT_MS: u32 = 500;

/// Default chart retention window
pub const DEFAULT_HISTORY_WINDOW_S: u32 = 120;

/// Default chart sampling period
pub const DEFAULT_HISTORY_PERIOD_MS: u32 = 100;

/// Largest accepted history capacity (one day at 100 ms)
pub const MAX_HISTORY_CAPACITY: usize = 864_000;

/// Poll loop timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct PollConfig {
    /// Delay between consecutive polls (ms)
    pub interval_ms: u32,
    /// Maximum time `stop` waits for the poll loop to exit (ms)
    pub stop_timeout_ms: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_POLL_INTERVAL_MS,
            stop_timeout_ms: DEFAULT_STOP_TIMEOUT_MS,
        }
    }
}

impl PollConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(u64::from(self.interval_ms))
    }

    pub fn stop_timeout(&self) -> Duration {
        Duration::from_millis(u64::from(self.stop_timeout_ms))
    }
}

/// Rolling history sizing
///
/// Capacity is the retention window divided by the sampling period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct HistoryConfig {
    /// Retention window (s)
    pub window_s: u32,
    /// Sampling period (ms)
    pub period_ms: u32,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            window_s: DEFAULT_HISTORY_WINDOW_S,
            period_ms: DEFAULT_HISTORY_PERIOD_MS,
        }
    }
}

impl HistoryConfig {
    /// Number of entries each history buffer holds (0 if the period is 0)
    ///
    /// Saturates at `usize::MAX` on targets where the ratio does not fit.
    pub fn capacity(&self) -> usize {
        if self.period_ms == 0 {
            return 0;
        }
        let entries = u64::from(self.window_s) * 1000 / u64::from(self.period_ms);
        usize::try_from(entries).unwrap_or(usize::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_capacity() {
        assert_eq!(HistoryConfig::default().capacity(), 1200);
    }

    #[test]
    fn test_capacity_rounds_down() {
        let config = HistoryConfig {
            window_s: 1,
            period_ms: 300,
        };
        assert_eq!(config.capacity(), 3);
    }

    #[test]
    fn test_capacity_of_extreme_window() {
        let config = HistoryConfig {
            window_s: u32::MAX,
            period_ms: 1,
        };
        let expected = u64::from(u32::MAX) * 1000;
        assert_eq!(
            config.capacity(),
            usize::try_from(expected).unwrap_or(usize::MAX)
        );
        assert!(config.capacity() > MAX_HISTORY_CAPACITY);
    }

    #[test]
    fn test_zero_period_has_no_capacity() {
        let config = HistoryConfig {
            window_s: 10,
            period_ms: 0,
        };
        assert_eq!(config.capacity(), 0);
    }

    #[test]
    fn test_poll_durations() {
        let poll = PollConfig::default();
        assert_eq!(poll.interval(), Duration::from_millis(20));
        assert_eq!(poll.stop_timeout(), Duration::from_millis(500));
    }
}

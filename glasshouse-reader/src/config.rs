//! TOML configuration loading
//!
//! Parses a [`MonitorConfig`] from TOML and validates it. Every section and
//! key is optional; anything missing keeps its default.

use std::fs;
use std::path::Path;

use glasshouse_core::MonitorConfig;
use log::{debug, info, warn};

use crate::error::LoadError;

/// Sample configuration matching the built-in defaults
pub const SAMPLE_CONFIG: &str = include_str!("../glasshouse.toml");

/// Parse and validate a configuration from TOML text
pub fn from_toml_str(text: &str) -> Result<MonitorConfig, LoadError> {
    let config: MonitorConfig = toml::from_str(text).map_err(|e| {
        warn!("TOML parse error: {}", e);
        e
    })?;
    config.validate()?;
    log_config_summary(&config);
    Ok(config)
}

/// Read, parse and validate a configuration file
pub fn load(path: impl AsRef<Path>) -> Result<MonitorConfig, LoadError> {
    let path = path.as_ref();
    info!("Loading configuration from {}", path.display());
    let text = fs::read_to_string(path)?;
    from_toml_str(&text)
}

fn log_config_summary(config: &MonitorConfig) {
    debug!(
        "Config: poll {} ms, stop timeout {} ms, history {} samples",
        config.poll.interval_ms,
        config.poll.stop_timeout_ms,
        config.history.capacity()
    );
    debug!(
        "Thresholds: temp {}/{} x0.1°C, gas {}/{}",
        config.thresholds.temperature_x10.warn,
        config.thresholds.temperature_x10.alarm,
        config.thresholds.gas.warn,
        config.thresholds.gas.alarm
    );
}

//! Board-agnostic core logic for the Glasshouse monitor
//!
//! This crate contains the host-side logic that does not depend on a
//! transport or a thread model:
//!
//! - Link health statistics
//! - Alarm level classification
//! - ADC scaling for the board's sensors
//! - Configuration type definitions and validation

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(unsafe_code)]

pub mod alarm;
pub mod config;
pub mod link;
pub mod sensor;

pub use alarm::{AlarmLevel, AlarmThresholds, Assessment, Thresholds};
pub use config::{ConfigError, HistoryConfig, MonitorConfig, PollConfig};
pub use link::LinkStatistics;

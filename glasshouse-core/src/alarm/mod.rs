//! Alarm classification
//!
//! Turns decoded readings into NORMAL / WARN / ALARM levels.

pub mod level;

pub use level::{AlarmLevel, AlarmThresholds, Assessment, Thresholds};

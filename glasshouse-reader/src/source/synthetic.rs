//! Synthetic byte source for running without hardware
//!
//! Generates a wire-valid frame on every fetch from slow sine waves, with
//! status bits derived from the same thresholds the board uses. Frames are
//! built through [`FrameCodec::encode`], so they always pass validation.

use std::time::{Duration, Instant};

use glasshouse_core::sensor::lm35_adc_from_tenths;
use glasshouse_core::{AlarmLevel, AlarmThresholds, MonitorConfig};
use glasshouse_protocol::{Frame, FrameCodec, StatusFlags, FRAME_LEN};
use log::info;

use super::ByteSource;
use crate::error::TransportError;

/// Deterministic frame generator driven by elapsed time
#[derive(Debug, Clone)]
pub struct SyntheticSource {
    codec: FrameCodec,
    thresholds: AlarmThresholds,
    started: Option<Instant>,
    sequence: u8,
}

impl SyntheticSource {
    /// Create a generator using the configured protocol and thresholds
    pub fn new(config: &MonitorConfig) -> Self {
        Self {
            codec: FrameCodec::new(config.protocol),
            thresholds: config.thresholds,
            started: None,
            sequence: 0,
        }
    }

    /// Frame the generator produces at `elapsed` with the given sequence
    pub fn frame_at(&self, elapsed: Duration, sequence: u8) -> Frame {
        let t = elapsed.as_secs_f64();

        // Temperature swings 10..50°C, gas 300..2700
        let temp_c = 30.0 + 20.0 * (t * 0.1).sin();
        let temp_x10 = (temp_c * 10.0) as u16;
        let gas = (1500.0 + 1200.0 * (t * 0.07 + 1.0).sin()) as u16;

        let adc = [
            lm35_adc_from_tenths(temp_x10),
            gas,
            (2000.0 + 500.0 * (t * 0.05).sin()) as u16,
            (1000.0 + 800.0 * (t * 0.03).cos()) as u16,
        ];

        let temp_level = self.thresholds.classify_temperature(temp_x10);
        let gas_level = self.thresholds.classify_gas(gas);
        let status = StatusFlags::empty()
            .with_temp_alarm(temp_level >= AlarmLevel::Warn)
            .with_gas_alarm(gas_level >= AlarmLevel::Warn)
            .with_buzzer(temp_level == AlarmLevel::Alarm || gas_level == AlarmLevel::Alarm)
            .with_motor(temp_level == AlarmLevel::Alarm);

        Frame::new(sequence, status, adc, temp_x10, elapsed)
    }

    /// Encode the next frame as if `elapsed` had passed since open
    ///
    /// Advances the sequence counter, wrapping at 256.
    pub fn next_block(&mut self, elapsed: Duration) -> [u8; FRAME_LEN] {
        let frame = self.frame_at(elapsed, self.sequence);
        self.sequence = self.sequence.wrapping_add(1);
        self.codec.encode(&frame)
    }
}

impl ByteSource for SyntheticSource {
    fn open(&mut self) -> Result<(), TransportError> {
        self.started = Some(Instant::now());
        self.sequence = 0;
        info!("Running in simulation mode (no real SPI)");
        Ok(())
    }

    fn fetch(&mut self) -> Result<Vec<u8>, TransportError> {
        let started = self.started.ok_or(TransportError::NotOpen)?;
        Ok(self.next_block(started.elapsed()).to_vec())
    }

    fn close(&mut self) {
        self.started = None;
    }
}

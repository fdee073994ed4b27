//! Frame validation, decoding and encoding
//!
//! [`FrameCodec`] is stateless apart from its [`ProtocolConfig`]. Rejection
//! of a malformed block is a normal outcome, reported as a [`FrameError`].

use core::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::frame::{
    xor_checksum, Frame, FrameError, ADC_CHANNELS, END_MARKER, FRAME_LEN, MAGIC_A, MAGIC_B,
    OFF_ADC, OFF_CHECKSUM, OFF_END, OFF_MAGIC_A, OFF_MAGIC_B, OFF_SEQ, OFF_STATUS, OFF_TEMP,
};
use crate::status::StatusFlags;

/// Synchronization bytes expected on the wire
///
/// Mirrors the sensor board's frame definitions; both sides must agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct ProtocolConfig {
    /// Leading magic bytes (offsets 0 and 1)
    pub magic: [u8; 2],
    /// Trailing end marker (offset 15)
    pub end_marker: u8,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            magic: [MAGIC_A, MAGIC_B],
            end_marker: END_MARKER,
        }
    }
}

/// Decoder and encoder for the fixed 16-byte telemetry frame
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameCodec {
    config: ProtocolConfig,
}

impl FrameCodec {
    /// Create a codec for the given protocol configuration
    pub const fn new(config: ProtocolConfig) -> Self {
        Self { config }
    }

    /// Protocol configuration in use
    pub fn config(&self) -> &ProtocolConfig {
        &self.config
    }

    /// Run the length, framing and checksum checks
    ///
    /// Checks run in that order; the first failure is returned.
    pub fn validate<'a>(&self, block: &'a [u8]) -> Result<&'a [u8; FRAME_LEN], FrameError> {
        let raw: &[u8; FRAME_LEN] = block.try_into().map_err(|_| FrameError::Length {
            actual: block.len(),
        })?;

        if raw[OFF_MAGIC_A] != self.config.magic[0]
            || raw[OFF_MAGIC_B] != self.config.magic[1]
            || raw[OFF_END] != self.config.end_marker
        {
            return Err(FrameError::Framing);
        }

        let expected = xor_checksum(raw);
        if raw[OFF_CHECKSUM] != expected {
            return Err(FrameError::Checksum {
                expected,
                actual: raw[OFF_CHECKSUM],
            });
        }

        Ok(raw)
    }

    /// Validate `block` and decode it into a [`Frame`] stamped with `captured_at`
    pub fn decode(&self, block: &[u8], captured_at: Duration) -> Result<Frame, FrameError> {
        let raw = self.validate(block)?;

        let mut adc = [0u16; ADC_CHANNELS];
        for (channel, value) in adc.iter_mut().enumerate() {
            *value = read_u16_le(raw, OFF_ADC + channel * 2);
        }

        Ok(Frame::new(
            raw[OFF_SEQ],
            StatusFlags::from_bits(raw[OFF_STATUS]),
            adc,
            read_u16_le(raw, OFF_TEMP),
            captured_at,
        ))
    }

    /// Encode a frame into its wire representation
    ///
    /// The timestamp is not transmitted.
    pub fn encode(&self, frame: &Frame) -> [u8; FRAME_LEN] {
        let mut buffer = [0u8; FRAME_LEN];

        buffer[OFF_MAGIC_A] = self.config.magic[0];
        buffer[OFF_MAGIC_B] = self.config.magic[1];
        buffer[OFF_SEQ] = frame.sequence();
        buffer[OFF_STATUS] = frame.status().bits();
        for (channel, value) in frame.adc().iter().enumerate() {
            write_u16_le(&mut buffer, OFF_ADC + channel * 2, *value);
        }
        write_u16_le(&mut buffer, OFF_TEMP, frame.temperature_x10());
        buffer[OFF_CHECKSUM] = xor_checksum(&buffer);
        buffer[OFF_END] = self.config.end_marker;

        buffer
    }
}

fn read_u16_le(raw: &[u8; FRAME_LEN], offset: usize) -> u16 {
    u16::from_le_bytes([raw[offset], raw[offset + 1]])
}

fn write_u16_le(buffer: &mut [u8; FRAME_LEN], offset: usize, value: u16) {
    buffer[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
}

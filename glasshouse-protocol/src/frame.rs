//! Frame layout and the decoded frame type.
//!
//! Frame format (16 bytes, multi-byte fields little-endian):
//! - MAGIC (2 bytes): 0xAA 0x55 synchronization bytes
//! - SEQ (1 byte): free-running sequence counter
//! - STATUS (1 byte): actuator and alarm bit-field
//! - ADC0..ADC3 (4 × 2 bytes): raw ADC channels
//! - TEMP_X10 (2 bytes): temperature in 0.1°C units
//! - CHECKSUM (1 byte): XOR of bytes 0..13
//! - END (1 byte): 0x0D end marker

use core::fmt;
use core::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::status::StatusFlags;

/// Complete frame size in bytes
pub const FRAME_LEN: usize = 16;

/// Number of leading bytes covered by the checksum
pub const CHECKSUM_SPAN: usize = 14;

/// First synchronization byte
pub const MAGIC_A: u8 = 0xAA;

/// Second synchronization byte
pub const MAGIC_B: u8 = 0x55;

/// Trailing end-of-frame marker
pub const END_MARKER: u8 = 0x0D;

/// Number of ADC channels carried in a frame
pub const ADC_CHANNELS: usize = 4;

/// ADC channel wired to the LM35 temperature sensor
pub const ADC_TEMPERATURE: usize = 0;

/// ADC channel wired to the gas sensor
pub const ADC_GAS: usize = 1;

// Byte offsets
pub(crate) const OFF_MAGIC_A: usize = 0;
pub(crate) const OFF_MAGIC_B: usize = 1;
pub(crate) const OFF_SEQ: usize = 2;
pub(crate) const OFF_STATUS: usize = 3;
pub(crate) const OFF_ADC: usize = 4;
pub(crate) const OFF_TEMP: usize = 12;
pub(crate) const OFF_CHECKSUM: usize = 14;
pub(crate) const OFF_END: usize = 15;

/// Reasons a byte block is rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Block is not exactly [`FRAME_LEN`] bytes
    Length { actual: usize },
    /// Magic bytes or end marker do not match
    Framing,
    /// Checksum byte does not match the XOR of the prefix
    Checksum { expected: u8, actual: u8 },
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::Length { actual } => {
                write!(f, "expected {} bytes, got {}", FRAME_LEN, actual)
            }
            FrameError::Framing => f.write_str("bad magic bytes or end marker"),
            FrameError::Checksum { expected, actual } => write!(
                f,
                "checksum mismatch: computed {:#04x}, received {:#04x}",
                expected, actual
            ),
        }
    }
}

#[cfg(any(test, feature = "std"))]
impl std::error::Error for FrameError {}

/// XOR checksum over the first [`CHECKSUM_SPAN`] bytes of `bytes`
///
/// Shorter input is folded as far as it goes. The checksum byte itself and
/// the end marker are never part of the sum.
pub fn xor_checksum(bytes: &[u8]) -> u8 {
    bytes
        .iter()
        .take(CHECKSUM_SPAN)
        .fold(0u8, |checksum, &byte| checksum ^ byte)
}

/// One validated, decoded telemetry frame
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Frame {
    sequence: u8,
    status: StatusFlags,
    adc: [u16; ADC_CHANNELS],
    temperature_x10: u16,
    captured_at: Duration,
}

impl Frame {
    /// Build a frame from its fields
    ///
    /// Used by producers; every such frame encodes to a wire-valid block.
    pub fn new(
        sequence: u8,
        status: StatusFlags,
        adc: [u16; ADC_CHANNELS],
        temperature_x10: u16,
        captured_at: Duration,
    ) -> Self {
        Self {
            sequence,
            status,
            adc,
            temperature_x10,
            captured_at,
        }
    }

    /// Free-running sequence counter
    #[inline]
    pub fn sequence(&self) -> u8 {
        self.sequence
    }

    /// Status bit-field
    #[inline]
    pub fn status(&self) -> StatusFlags {
        self.status
    }

    /// All four raw ADC channels
    #[inline]
    pub fn adc(&self) -> [u16; ADC_CHANNELS] {
        self.adc
    }

    /// Raw temperature sensor reading (ADC channel 0)
    #[inline]
    pub fn temperature_raw(&self) -> u16 {
        self.adc[ADC_TEMPERATURE]
    }

    /// Raw gas sensor reading (ADC channel 1)
    #[inline]
    pub fn gas_raw(&self) -> u16 {
        self.adc[ADC_GAS]
    }

    /// Temperature in 0.1°C units, as transmitted
    #[inline]
    pub fn temperature_x10(&self) -> u16 {
        self.temperature_x10
    }

    /// Temperature in °C
    pub fn temperature_celsius(&self) -> f32 {
        f32::from(self.temperature_x10) / 10.0
    }

    /// Monotonic time at which the frame was decoded
    #[inline]
    pub fn captured_at(&self) -> Duration {
        self.captured_at
    }
}

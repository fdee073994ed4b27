//! Greenhouse sensor board telemetry protocol
//!
//! This crate defines the fixed-size frame the sensor board (STM32, SPI
//! slave) hands to the host on every poll. The board fills the frame from
//! its ADC and alarm logic; the host clocks it out and validates it here.
//!
//! # Frame Layout
//!
//! ```text
//! ┌──────┬──────┬─────┬────────┬───────────┬──────────┬──────────┬─────┐
//! │ 0xAA │ 0x55 │ SEQ │ STATUS │ ADC0..3   │ TEMP_X10 │ CHECKSUM │ END │
//! │ 1B   │ 1B   │ 1B  │ 1B     │ 4 × u16LE │ u16LE    │ 1B       │ 1B  │
//! └──────┴──────┴─────┴────────┴───────────┴──────────┴──────────┴─────┘
//! ```
//!
//! The checksum is the XOR of the first 14 bytes; the end marker is 0x0D.
//! A block that fails any check is rejected whole: there is no repair.

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(unsafe_code)]

pub mod codec;
pub mod frame;
pub mod status;

pub use codec::{FrameCodec, ProtocolConfig};
pub use frame::{
    xor_checksum, Frame, FrameError, ADC_CHANNELS, ADC_GAS, ADC_TEMPERATURE, CHECKSUM_SPAN,
    END_MARKER, FRAME_LEN, MAGIC_A, MAGIC_B,
};
pub use status::StatusFlags;

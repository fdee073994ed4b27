//! Status bit-field carried in byte 3 of every frame

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// Wire bit positions
const BIT_BUZZER: u8 = 0;
const BIT_MOTOR: u8 = 1;
const BIT_GAS_ALARM: u8 = 2;
const BIT_TEMP_ALARM: u8 = 3;

/// Actuator and alarm flags reported by the sensor board
///
/// Bits 4..7 have no assigned meaning but are preserved so that a decoded
/// frame re-encodes to the same bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StatusFlags(u8);

impl StatusFlags {
    /// No flags set
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Wrap a raw status byte
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// Raw status byte
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Buzzer is sounding
    pub fn buzzer(self) -> bool {
        self.is_set(BIT_BUZZER)
    }

    /// Ventilation motor is running
    pub fn motor(self) -> bool {
        self.is_set(BIT_MOTOR)
    }

    /// Board has raised a gas alarm
    pub fn gas_alarm(self) -> bool {
        self.is_set(BIT_GAS_ALARM)
    }

    /// Board has raised a temperature alarm
    pub fn temp_alarm(self) -> bool {
        self.is_set(BIT_TEMP_ALARM)
    }

    /// Returns true if either alarm flag is raised
    pub fn any_alarm(self) -> bool {
        self.gas_alarm() || self.temp_alarm()
    }

    /// Copy with the buzzer flag set or cleared
    pub fn with_buzzer(self, on: bool) -> Self {
        self.with(BIT_BUZZER, on)
    }

    /// Copy with the motor flag set or cleared
    pub fn with_motor(self, on: bool) -> Self {
        self.with(BIT_MOTOR, on)
    }

    /// Copy with the gas alarm flag set or cleared
    pub fn with_gas_alarm(self, on: bool) -> Self {
        self.with(BIT_GAS_ALARM, on)
    }

    /// Copy with the temperature alarm flag set or cleared
    pub fn with_temp_alarm(self, on: bool) -> Self {
        self.with(BIT_TEMP_ALARM, on)
    }

    fn is_set(self, bit: u8) -> bool {
        self.0 & (1 << bit) != 0
    }

    fn with(self, bit: u8, on: bool) -> Self {
        if on {
            Self(self.0 | (1 << bit))
        } else {
            Self(self.0 & !(1 << bit))
        }
    }
}

impl From<u8> for StatusFlags {
    fn from(bits: u8) -> Self {
        Self(bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_positions() {
        assert!(StatusFlags::from_bits(0b0001).buzzer());
        assert!(StatusFlags::from_bits(0b0010).motor());
        assert!(StatusFlags::from_bits(0b0100).gas_alarm());
        assert!(StatusFlags::from_bits(0b1000).temp_alarm());
    }

    #[test]
    fn test_empty_has_no_flags() {
        let flags = StatusFlags::empty();
        assert!(!flags.buzzer());
        assert!(!flags.motor());
        assert!(!flags.any_alarm());
    }

    #[test]
    fn test_builders_toggle_single_bit() {
        let flags = StatusFlags::empty().with_motor(true).with_temp_alarm(true);
        assert_eq!(flags.bits(), 0b1010);
        assert_eq!(flags.with_motor(false).bits(), 0b1000);
    }

    #[test]
    fn test_unnamed_bits_preserved() {
        let flags = StatusFlags::from_bits(0xF0).with_buzzer(true);
        assert_eq!(flags.bits(), 0xF1);
        assert!(!flags.any_alarm());
    }
}

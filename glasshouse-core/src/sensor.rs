//! ADC scaling for the sensor board's analog inputs
//!
//! The board samples with a 12-bit ADC against a 3.3 V reference. Channel 0
//! carries an LM35 (10 mV/°C), so its millivolt reading equals the
//! temperature in 0.1°C units.

/// ADC reference voltage in mV
pub const ADC_VREF_MV: u32 = 3300;

/// Maximum ADC count (12-bit)
pub const ADC_FULL_SCALE: u32 = 4095;

/// Convert a raw ADC count to millivolts
pub fn adc_to_millivolts(raw: u16) -> u16 {
    let mv = u32::from(raw) * ADC_VREF_MV / ADC_FULL_SCALE;
    mv.min(u32::from(u16::MAX)) as u16
}

/// LM35 temperature (×10 for 0.1°C resolution) from a raw ADC count
pub fn lm35_tenths_from_adc(raw: u16) -> u16 {
    adc_to_millivolts(raw)
}

/// Raw ADC count an LM35 produces at the given temperature (×10)
pub fn lm35_adc_from_tenths(temp_x10: u16) -> u16 {
    let raw = u32::from(temp_x10) * ADC_FULL_SCALE / ADC_VREF_MV;
    raw.min(u32::from(u16::MAX)) as u16
}

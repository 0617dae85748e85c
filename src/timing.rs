//! Bus speed presets, and the `TIMINGR` values that produce them.

use crate::{
    error::{Error, Result},
    regs::cr1,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, defmt::Format)]
/// The supported bus speeds. Anything else is a configuration error; we don't round to the
/// nearest preset.
pub enum I2cSpeed {
    /// Standard mode, 100kHz.
    #[default]
    Standard100K,
    /// Fast mode, 200kHz.
    Fast200K,
    /// Fast mode, 400kHz.
    Fast400K,
}

impl I2cSpeed {
    /// Look up the preset for a frequency in Hz.
    pub fn from_hz(hz: u32) -> Result<Self> {
        match hz {
            100_000 => Ok(Self::Standard100K),
            200_000 => Ok(Self::Fast200K),
            400_000 => Ok(Self::Fast400K),
            _ => Err(Error::UnsupportedFrequency(hz)),
        }
    }

    /// Bus frequency, in Hz.
    pub fn hz(&self) -> u32 {
        match self {
            Self::Standard100K => 100_000,
            Self::Fast200K => 200_000,
            Self::Fast400K => 400_000,
        }
    }

    /// `TIMINGR` contents. Values from ST's I2C timing configuration tool (AN4235), with
    /// rise time = 100ns and fall time = 10ns.
    pub fn timingr(&self) -> u32 {
        match self {
            Self::Standard100K => 0x0020_1D2B,
            Self::Fast200K => 0x0010_021E,
            Self::Fast400K => 0x0010_020A,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, defmt::Format)]
/// Set in CR1.
pub enum NoiseFilter {
    /// Analog filter on, digital filter off (width 0).
    #[default]
    Analog,
    /// Analog filter off, digital filter suppressing spikes up to this many I2CCLK periods (1-15).
    Digital(u8),
    /// Both filters off.
    Disabled,
}

impl NoiseFilter {
    /// Values for the CR1 `ANFOFF` and `DNF` fields.
    pub(crate) fn cr1_bits(&self) -> u32 {
        match self {
            Self::Analog => 0,
            Self::Digital(width) => cr1::ANFOFF | (((*width as u32) << cr1::DNF_SHIFT) & cr1::DNF),
            Self::Disabled => cr1::ANFOFF,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supported_frequencies() {
        for hz in [100_000, 200_000, 400_000] {
            let speed = I2cSpeed::from_hz(hz).unwrap();
            assert_eq!(speed.hz(), hz);
        }
        assert_eq!(I2cSpeed::from_hz(100_000).unwrap().timingr(), 0x00201D2B);
        assert_eq!(I2cSpeed::from_hz(200_000).unwrap().timingr(), 0x0010021E);
        assert_eq!(I2cSpeed::from_hz(400_000).unwrap().timingr(), 0x0010020A);
    }

    #[test]
    fn other_frequencies_are_not_rounded() {
        for hz in [0, 1, 99_999, 100_001, 300_000, 399_999, 1_000_000, u32::MAX] {
            assert_eq!(I2cSpeed::from_hz(hz), Err(Error::UnsupportedFrequency(hz)));
        }
    }

    #[test]
    fn defaults() {
        assert_eq!(I2cSpeed::default(), I2cSpeed::Standard100K);
        assert_eq!(NoiseFilter::default(), NoiseFilter::Analog);
    }

    #[test]
    fn filter_bits() {
        assert_eq!(NoiseFilter::Analog.cr1_bits(), 0);
        assert_eq!(NoiseFilter::Disabled.cr1_bits(), cr1::ANFOFF);
        assert_eq!(NoiseFilter::Digital(5).cr1_bits(), cr1::ANFOFF | (5 << 8));
        // Out-of-range widths are clipped to the field.
        assert_eq!(NoiseFilter::Digital(0x1f).cr1_bits(), cr1::ANFOFF | cr1::DNF);
    }
}

//! Resolves an SDA/SCL pin pair to the I2C peripheral that owns both.
//!
//! Pin capability tables are plain `&'static` data passed in by the caller. Lookup has no side
//! effects.

use crate::{
    error::Result,
    gpio::{AltFn, PinFunction, PinName, Port},
    regs::I2cDevice,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, defmt::Format)]
/// Why a pin pair couldn't be resolved.
pub enum PinMapError {
    /// No peripheral lists this pin as a data line.
    SdaNotMapped,
    /// No peripheral lists this pin as a clock line.
    SclNotMapped,
    /// Both pins are valid I2C pins, but never for the same peripheral.
    Mismatch,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// One row of a capability table: `pin` can serve `device` when configured with `function`.
pub struct PinMapEntry {
    pub pin: PinName,
    pub device: I2cDevice,
    pub function: PinFunction,
}

impl PinMapEntry {
    pub const fn new(port: Port, pin: u8, device: I2cDevice, alt_fn: AltFn) -> Self {
        Self {
            pin: PinName::new(port, pin),
            device,
            function: PinFunction::i2c(alt_fn),
        }
    }
}

#[derive(Copy, Clone, Debug)]
/// The SDA and SCL capability tables for one MCU or board.
pub struct PinMap {
    pub sda: &'static [PinMapEntry],
    pub scl: &'static [PinMapEntry],
}

const DISCO_SDA: &[PinMapEntry] = &[PinMapEntry::new(Port::B, 9, I2cDevice::One, AltFn::Af1)];
const DISCO_SCL: &[PinMapEntry] = &[PinMapEntry::new(Port::B, 8, I2cDevice::One, AltFn::Af1)];

const F051_SDA: &[PinMapEntry] = &[
    PinMapEntry::new(Port::B, 7, I2cDevice::One, AltFn::Af1),
    PinMapEntry::new(Port::B, 9, I2cDevice::One, AltFn::Af1),
    PinMapEntry::new(Port::B, 11, I2cDevice::Two, AltFn::Af1),
];
const F051_SCL: &[PinMapEntry] = &[
    PinMapEntry::new(Port::B, 6, I2cDevice::One, AltFn::Af1),
    PinMapEntry::new(Port::B, 8, I2cDevice::One, AltFn::Af1),
    PinMapEntry::new(Port::B, 10, I2cDevice::Two, AltFn::Af1),
];

impl PinMap {
    /// The pins broken out for I2C on the STM32F0 Discovery board (DISCO_F051R8).
    pub const DISCO_F051R8: Self = Self {
        sda: DISCO_SDA,
        scl: DISCO_SCL,
    };

    /// All I2C-capable pins of the STM32F051 in the LQFP64 package, on port B.
    pub const STM32F051: Self = Self {
        sda: F051_SDA,
        scl: F051_SCL,
    };

    /// Find the table entry for `sda`, as a data line.
    pub fn sda_entry(&self, sda: PinName) -> Option<&PinMapEntry> {
        self.sda.iter().find(|e| e.pin == sda)
    }

    /// Find the table entry for `scl`, as a clock line.
    pub fn scl_entry(&self, scl: PinName) -> Option<&PinMapEntry> {
        self.scl.iter().find(|e| e.pin == scl)
    }

    /// Resolve a pin pair to a peripheral. Succeeds only if some peripheral lists `sda` as a
    /// data line *and* `scl` as a clock line. Returns the matching entries, so the caller
    /// knows how to configure each pin.
    pub fn resolve(&self, sda: PinName, scl: PinName) -> Result<(&PinMapEntry, &PinMapEntry)> {
        let mut sda_any = false;

        for sda_entry in self.sda.iter().filter(|e| e.pin == sda) {
            sda_any = true;

            if let Some(scl_entry) = self
                .scl
                .iter()
                .find(|e| e.pin == scl && e.device == sda_entry.device)
            {
                return Ok((sda_entry, scl_entry));
            }
        }

        let err = if !sda_any {
            PinMapError::SdaNotMapped
        } else if self.scl_entry(scl).is_none() {
            PinMapError::SclNotMapped
        } else {
            PinMapError::Mismatch
        };

        Err(err.into())
    }
}

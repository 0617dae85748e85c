//! The register access seam. The driver reads and writes I2C and RCC registers only through
//! [`RegisterAccess`]. On the MCU, `mmio::Stm32f0Regs` implements it over the PAC; tests
//! use a simulated register block.
//!
//! Bit positions are from RM0091 (STM32F0x1/x2/x8 reference manual), section 26.7.

/// The registers the driver touches. I2C registers refer to the instance the accessor was
/// built for; the RCC ones are shared by every peripheral on the chip.
#[derive(Copy, Clone, Debug, PartialEq, Eq, defmt::Format)]
pub enum Register {
    Cr1,
    Cr2,
    Oar1,
    Timingr,
    Isr,
    Icr,
    Rxdr,
    Txdr,
    /// `RCC_APB1ENR`
    RccApb1enr,
    /// `RCC_APB1RSTR`
    RccApb1rstr,
}

/// Word-sized access to peripheral registers.
///
/// Reads take `&mut self`: reading `RXDR` consumes the received byte.
pub trait RegisterAccess {
    fn read(&mut self, reg: Register) -> u32;

    fn write(&mut self, reg: Register, value: u32);

    /// Read-modify-write.
    fn modify<F>(&mut self, reg: Register, f: F)
    where
        F: FnOnce(u32) -> u32,
    {
        let value = self.read(reg);
        self.write(reg, f(value));
    }

    /// Set the bits of `mask`.
    fn set_bits(&mut self, reg: Register, mask: u32) {
        self.modify(reg, |v| v | mask);
    }

    /// Clear the bits of `mask`.
    fn clear_bits(&mut self, reg: Register, mask: u32) {
        self.modify(reg, |v| v & !mask);
    }

    /// Is any bit of `mask` set?
    fn is_set(&mut self, reg: Register, mask: u32) -> bool {
        self.read(reg) & mask != 0
    }

    /// The peripheral instance these registers belong to, if known. The driver refuses pins
    /// that resolve to a different one.
    fn device(&self) -> Option<I2cDevice> {
        None
    }
}

impl<R: RegisterAccess> RegisterAccess for &mut R {
    fn read(&mut self, reg: Register) -> u32 {
        (**self).read(reg)
    }

    fn write(&mut self, reg: Register, value: u32) {
        (**self).write(reg, value)
    }

    fn device(&self) -> Option<I2cDevice> {
        (**self).device()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, defmt::Format)]
/// An I2C peripheral instance.
pub enum I2cDevice {
    One,
    Two,
}

impl I2cDevice {
    /// This peripheral's bit in `RCC_APB1ENR` and `RCC_APB1RSTR`.
    pub fn rcc_bit(&self) -> u32 {
        match self {
            Self::One => 1 << 21,
            Self::Two => 1 << 22,
        }
    }
}

/// `I2C_CR1`
pub mod cr1 {
    pub const PE: u32 = 1 << 0;
    pub const DNF_SHIFT: u32 = 8;
    pub const DNF: u32 = 0xf << DNF_SHIFT;
    pub const ANFOFF: u32 = 1 << 12;
}

/// `I2C_CR2`
pub mod cr2 {
    pub const SADD: u32 = 0x3ff;
    pub const RD_WRN: u32 = 1 << 10;
    pub const ADD10: u32 = 1 << 11;
    pub const START: u32 = 1 << 13;
    pub const STOP: u32 = 1 << 14;
    pub const NACK: u32 = 1 << 15;
    pub const NBYTES_SHIFT: u32 = 16;
    pub const NBYTES: u32 = 0xff << NBYTES_SHIFT;
    pub const RELOAD: u32 = 1 << 24;
    pub const AUTOEND: u32 = 1 << 25;
}

/// `I2C_OAR1`
pub mod oar1 {
    pub const OA1: u32 = 0x3ff;
    /// 7-bit address bits, OA1[7:1].
    pub const OA1_7BIT: u32 = 0xfe;
    pub const OA1MODE: u32 = 1 << 10;
    pub const OA1EN: u32 = 1 << 15;
}

/// `I2C_ISR`
pub mod isr {
    pub const TXIS: u32 = 1 << 1;
    pub const RXNE: u32 = 1 << 2;
    pub const NACKF: u32 = 1 << 4;
    pub const STOPF: u32 = 1 << 5;
    pub const BUSY: u32 = 1 << 15;
}

/// `I2C_ICR`
pub mod icr {
    pub const NACKCF: u32 = 1 << 4;
    pub const STOPCF: u32 = 1 << 5;
}

/// Reserved bits of `I2C_TIMINGR`, which must be kept at reset value (0).
pub const TIMINGR_MASK: u32 = 0xf0ff_ffff;

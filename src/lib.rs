//! A blocking I2C driver for STM32F0 microcontrollers.
//!
//! The driver resolves an SDA/SCL pin pair to a peripheral, configures the bus (clock gate,
//! open-drain pins, reset, timing) and runs addressed master transfers with automatic STOP.
//! Every wait on a status flag has an iteration budget, so a stuck bus returns an error
//! rather than hanging the application.
//!
//! Registers are reached through [`regs::RegisterAccess`]. With a chip feature selected
//! (`f030`, `f051`, `f072`), `mmio::Stm32f0Regs` implements it over the PAC. Without one, the
//! crate builds on the host, and the driver can run against a simulated register block.
//!
//! Example, on a DISCO_F051R8:
//! ```ignore
//! use stm32f0_i2c::{
//!     gpio::{PinName, Port},
//!     i2c::I2c,
//!     mmio::{Stm32f0Pins, Stm32f0Regs},
//!     pac,
//!     pinmap::PinMap,
//! };
//!
//! let dp = pac::Peripherals::take().unwrap();
//! let sda = PinName::new(Port::B, 9);
//! let scl = PinName::new(Port::B, 8);
//!
//! let mut i2c = I2c::new(Stm32f0Regs::new(dp.I2C1), Stm32f0Pins, sda, scl, &PinMap::DISCO_F051R8)?;
//! i2c.set_frequency(400_000)?;
//!
//! let written = i2c.write(0x50, &[0x00, 0x10, 0xab], true)?;
//! if written < 3 {
//!     // NACK or stalled bus partway through.
//! }
//! ```

#![cfg_attr(not(test), no_std)]

cfg_if::cfg_if! {
    if #[cfg(feature = "f030")] {
        pub use stm32f0::stm32f0x0 as pac;
    } else if #[cfg(feature = "f051")] {
        pub use stm32f0::stm32f0x1 as pac;
    } else if #[cfg(feature = "f072")] {
        pub use stm32f0::stm32f0x2 as pac;
    }
}

pub mod error;
pub mod gpio;
pub mod i2c;
mod log;
pub mod pinmap;
pub mod regs;
pub mod slave;
pub mod timing;
pub mod util;

#[cfg(mmio)]
pub mod mmio;

#[cfg(test)]
mod mock;

pub use error::{Error, Result};
pub use i2c::{I2c, I2cConfig, I2cError};
pub use timing::{I2cSpeed, NoiseFilter};

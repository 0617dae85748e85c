//! Pin naming, and the pin-configuration hooks the I2C driver needs from a GPIO layer.
//!
//! This crate doesn't own GPIO. It names pins, describes how an I2C pin must be set up
//! (alternate function, open drain, pull-up), and hands that description to a [`PinMux`]
//! supplied by the caller. With a chip feature, `mmio::Stm32f0Pins` is a register-level
//! implementation for the real MCU.

#[derive(Copy, Clone, Debug, PartialEq, Eq, defmt::Format)]
/// GPIO port letter
pub enum Port {
    A,
    B,
    C,
    D,
    E,
    F,
}

impl Port {
    /// Index of the port; its register block sits at `GPIOA + 0x400 * index`, and its clock
    /// enable is `RCC_AHBENR` bit `17 + index`.
    pub fn index(&self) -> u8 {
        match self {
            Self::A => 0,
            Self::B => 1,
            Self::C => 2,
            Self::D => 3,
            Self::E => 4,
            Self::F => 5,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, defmt::Format)]
/// Identifies a physical pin, eg PB9. Pin number is 0 through 15.
pub struct PinName {
    pub port: Port,
    pub pin: u8,
}

impl PinName {
    pub const fn new(port: Port, pin: u8) -> Self {
        Self { port, pin }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, defmt::Format)]
#[repr(u8)]
/// Values for `GPIOx_AFRL` and `GPIOx_AFRH`. F0 parts only go up to AF7.
pub enum AltFn {
    Af0 = 0b0000,
    Af1 = 0b0001,
    Af2 = 0b0010,
    Af3 = 0b0011,
    Af4 = 0b0100,
    Af5 = 0b0101,
    Af6 = 0b0110,
    Af7 = 0b0111,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, defmt::Format)]
#[repr(u8)]
/// Values for `GPIOx_OTYPER`
pub enum OutputType {
    PushPull = 0,
    OpenDrain = 1,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, defmt::Format)]
#[repr(u8)]
/// Values for `GPIOx_PUPDR`
pub enum Pull {
    Floating = 0b00,
    Up = 0b01,
    Dn = 0b10,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, defmt::Format)]
/// Everything needed to hand a pin over to a peripheral.
pub struct PinFunction {
    pub alt_fn: AltFn,
    pub output_type: OutputType,
    pub pull: Pull,
}

impl PinFunction {
    /// The setting every STM32F0 I2C pin uses: open drain, pull-up, in the given alternate function.
    pub const fn i2c(alt_fn: AltFn) -> Self {
        Self {
            alt_fn,
            output_type: OutputType::OpenDrain,
            pull: Pull::Up,
        }
    }
}

/// Pin multiplexing, implemented by the GPIO layer. The I2C driver calls this during
/// configuration, once per bus line, every time it (re)configures the bus.
pub trait PinMux {
    /// Put `pin` in alternate function mode and apply `function`'s output type and pull.
    fn pinout(&mut self, pin: PinName, function: PinFunction);
}

impl<P: PinMux> PinMux for &mut P {
    fn pinout(&mut self, pin: PinName, function: PinFunction) {
        (**self).pinout(pin, function)
    }
}

//! Scans the I2C bus on a DISCO_F051R8 (SCL PB8, SDA PB9) and prints the address of every
//! device that acknowledges. Run this first when the self-tests fail: it shows whether the
//! EEPROM is wired and pulled up.

#![deny(warnings)]
#![no_std]
#![no_main]

use cortex_m_rt::entry; // The runtime

use hal::{
    gpio::{PinName, Port},
    i2c::I2c,
    mmio::{Stm32f0Pins, Stm32f0Regs},
    pac,
    pinmap::PinMap,
};

// Import the panic handler
use panic_probe as _;

#[entry]
fn main() -> ! {
    rtt_target::rtt_init_defmt!();
    // Set up microcontroller peripherals
    let dp = pac::Peripherals::take().unwrap();

    defmt::println!("Scanning I2C1...");

    let mut i2c = I2c::new(
        Stm32f0Regs::new(dp.I2C1),
        Stm32f0Pins,
        PinName::new(Port::B, 9),
        PinName::new(Port::B, 8),
        &PinMap::DISCO_F051R8,
    )
    .unwrap();

    for addr in 0x08..0x78 {
        match i2c.acknowledges(addr) {
            Ok(true) => defmt::println!("Found device at {=u8:#x}", addr),
            Ok(false) => (),
            Err(e) => {
                defmt::println!("Bus error at {=u8:#x}: {}", addr, e);
                i2c.reset();
                i2c.configure(100_000).unwrap();
            }
        }
    }

    defmt::println!("Scan complete.");

    loop {
        cortex_m::asm::wfi();
    }
}

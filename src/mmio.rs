//! Register access for the real MCU, through the `stm32f0` PAC. Also a register-level
//! [`PinMux`], for applications without their own GPIO layer.

use core::ops::Deref;

use cortex_m::interrupt;
use paste::paste;

use crate::{
    gpio::{PinFunction, PinMux, PinName},
    pac::{self, RCC, i2c1},
    regs::{I2cDevice, Register, RegisterAccess},
};

/// Expand `$body` once per register, with `$r` bound to that register's PAC accessor. The
/// accessors are all different types, so this can't be a function.
macro_rules! dispatch {
    (
        $self:ident, $reg:expr, |$r:ident| $body:expr,
        i2c: [$($i2c_reg:ident),+], rcc: [$($rcc_reg:ident),+], else: $default:expr
    ) => {
        paste! {
            match $reg {
                $(
                    Register::[<$i2c_reg:camel>] => {
                        let $r = $self.regs.$i2c_reg();
                        $body
                    }
                )+
                $(
                    Register::[<Rcc $rcc_reg:camel>] => {
                        let $r = rcc().$rcc_reg();
                        $body
                    }
                )+
                #[allow(unreachable_patterns)]
                _ => $default,
            }
        }
    };
}

fn rcc() -> &'static pac::rcc::RegisterBlock {
    unsafe { &*RCC::ptr() }
}

/// An I2C peripheral's registers (eg `dp.I2C1`), plus the shared RCC registers.
pub struct Stm32f0Regs<R> {
    pub regs: R,
}

impl<R> Stm32f0Regs<R>
where
    R: Deref<Target = i2c1::RegisterBlock>,
{
    pub fn new(regs: R) -> Self {
        Self { regs }
    }
}

impl<R> RegisterAccess for Stm32f0Regs<R>
where
    R: Deref<Target = i2c1::RegisterBlock>,
{
    fn read(&mut self, reg: Register) -> u32 {
        // ICR is write-only.
        dispatch!(
            self, reg, |r| r.read().bits(),
            i2c: [cr1, cr2, oar1, timingr, isr, rxdr, txdr],
            rcc: [apb1enr, apb1rstr],
            else: 0
        )
    }

    #[allow(unused_unsafe)]
    fn write(&mut self, reg: Register, value: u32) {
        // RXDR is read-only.
        dispatch!(
            self, reg, |r| {
                r.write(|w| unsafe { w.bits(value) });
            },
            i2c: [cr1, cr2, oar1, timingr, isr, icr, txdr],
            rcc: [apb1enr, apb1rstr],
            else: ()
        )
    }

    fn modify<F>(&mut self, reg: Register, f: F)
    where
        F: FnOnce(u32) -> u32,
    {
        match reg {
            // RCC is shared with every other peripheral driver, including ones running in
            // interrupt handlers.
            Register::RccApb1enr | Register::RccApb1rstr => interrupt::free(|_| {
                let value = self.read(reg);
                self.write(reg, f(value));
            }),
            _ => {
                let value = self.read(reg);
                self.write(reg, f(value));
            }
        }
    }

    fn device(&self) -> Option<I2cDevice> {
        let block: *const i2c1::RegisterBlock = &*self.regs;

        if block == pac::I2C1::ptr() {
            Some(I2cDevice::One)
        } else if block == pac::I2C2::ptr() {
            Some(I2cDevice::Two)
        } else {
            None
        }
    }
}

/// Configures pins by writing GPIO registers directly. Enables the port's clock as needed.
pub struct Stm32f0Pins;

/// All F0 GPIO ports share a register layout; only reset values differ.
fn gpio_regs(pin: PinName) -> &'static pac::gpioa::RegisterBlock {
    let base = pac::GPIOA::ptr() as usize + 0x400 * pin.port.index() as usize;
    unsafe { &*(base as *const pac::gpioa::RegisterBlock) }
}

impl PinMux for Stm32f0Pins {
    #[allow(unused_unsafe)]
    fn pinout(&mut self, pin: PinName, function: PinFunction) {
        let port_en = 1 << (17 + pin.port.index() as u32);
        interrupt::free(|_| {
            rcc()
                .ahbenr()
                .modify(|r, w| unsafe { w.bits(r.bits() | port_en) });
        });

        let regs = gpio_regs(pin);
        let n = pin.pin as u32;

        // Select the alternate function before handing the pin over, so it never drives the
        // bus with a stale one.
        let af_shift = (n % 8) * 4;
        let af = (function.alt_fn as u32) << af_shift;
        if n < 8 {
            regs.afrl()
                .modify(|r, w| unsafe { w.bits((r.bits() & !(0xf << af_shift)) | af) });
        } else {
            regs.afrh()
                .modify(|r, w| unsafe { w.bits((r.bits() & !(0xf << af_shift)) | af) });
        }

        let ot = (function.output_type as u32) << n;
        regs.otyper()
            .modify(|r, w| unsafe { w.bits((r.bits() & !(1 << n)) | ot) });

        let pupd = (function.pull as u32) << (2 * n);
        regs.pupdr()
            .modify(|r, w| unsafe { w.bits((r.bits() & !(0b11 << (2 * n))) | pupd) });

        // Alternate function mode.
        regs.moder()
            .modify(|r, w| unsafe { w.bits((r.bits() & !(0b11 << (2 * n))) | (0b10 << (2 * n))) });
    }
}

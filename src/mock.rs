//! A simulated I2C + RCC register block, for unit tests.
//!
//! Records every access in order, and models just enough of the peripheral for the driver's
//! polling loops: `BUSY`, `RXNE` (fed from a byte queue), `TXIS` (optionally withdrawn after
//! some number of bytes), `STOPF`/`NACKF` after a START, and the RCC reset line.

use std::{collections::VecDeque, vec::Vec};

use crate::{
    gpio::{PinFunction, PinMux, PinName},
    regs::{I2cDevice, Register, RegisterAccess, cr2, icr, isr},
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Access {
    Read(Register, u32),
    Write(Register, u32),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Busy {
    Free,
    /// `BUSY` reads as set this many more times, then clears.
    For(u32),
    /// Stuck until the peripheral is reset through RCC.
    Stuck,
}

#[derive(Debug)]
pub struct FakeRegs {
    values: [u32; 10],
    /// Which peripheral this block claims to be. `None`: unknown, as with a test double.
    pub instance: Option<I2cDevice>,
    /// Whether the addressed slave ACKs. A NACKed address never asserts `TXIS`, and sets
    /// `NACKF`.
    pub acked: bool,
    /// Whether `STOPF` follows a START. Cleared to model SCL held low.
    pub stop_detected: bool,
    /// A START was written and its flags haven't been cleared through `ICR`.
    stop_pending: bool,
    nack_pending: bool,
    pub log: Vec<Access>,
    pub busy: Busy,
    /// Bytes the "slave" will send. `RXNE` is set while this is non-empty.
    pub rx: VecDeque<u8>,
    /// `TXIS` is set until this many bytes have been written to `TXDR`. `None`: always set.
    pub tx_ready: Option<usize>,
    /// Everything written to `TXDR`.
    pub sent: Vec<u8>,
    /// Completed RCC reset pulses (assert then release).
    pub reset_pulses: usize,
}

impl Default for FakeRegs {
    fn default() -> Self {
        Self {
            values: [0; 10],
            instance: None,
            acked: true,
            stop_detected: true,
            stop_pending: false,
            nack_pending: false,
            log: Vec::new(),
            busy: Busy::Free,
            rx: VecDeque::new(),
            tx_ready: None,
            sent: Vec::new(),
            reset_pulses: 0,
        }
    }
}

fn index(reg: Register) -> usize {
    match reg {
        Register::Cr1 => 0,
        Register::Cr2 => 1,
        Register::Oar1 => 2,
        Register::Timingr => 3,
        Register::Isr => 4,
        Register::Icr => 5,
        Register::Rxdr => 6,
        Register::Txdr => 7,
        Register::RccApb1enr => 8,
        Register::RccApb1rstr => 9,
    }
}

impl FakeRegs {
    pub fn new() -> Self {
        Self::default()
    }

    /// A block that identifies as `device`, like the PAC-backed one does.
    pub fn for_device(device: I2cDevice) -> Self {
        Self {
            instance: Some(device),
            ..Self::default()
        }
    }

    /// Stored value, without logging or side effects.
    pub fn value(&self, reg: Register) -> u32 {
        self.values[index(reg)]
    }

    /// Preload a register, without logging.
    pub fn preset(&mut self, reg: Register, value: u32) {
        self.values[index(reg)] = value;
    }

    pub fn clear_log(&mut self) {
        self.log.clear();
    }

    /// Values written to `reg`, in order.
    pub fn writes_to(&self, reg: Register) -> Vec<u32> {
        self.log
            .iter()
            .filter_map(|a| match a {
                Access::Write(r, v) if *r == reg => Some(*v),
                _ => None,
            })
            .collect()
    }

    pub fn reads_of(&self, reg: Register) -> usize {
        self.log
            .iter()
            .filter(|a| matches!(a, Access::Read(r, _) if *r == reg))
            .count()
    }

    /// Has any `CR2` write set all bits of `mask`?
    pub fn cr2_written_with(&self, mask: u32) -> bool {
        self.writes_to(Register::Cr2).iter().any(|v| v & mask == mask)
    }

    fn isr(&mut self) -> u32 {
        let mut bits = self.value(Register::Isr)
            & !(isr::BUSY | isr::RXNE | isr::TXIS | isr::NACKF | isr::STOPF);

        match self.busy {
            Busy::Free => (),
            Busy::For(0) => self.busy = Busy::Free,
            Busy::For(n) => {
                bits |= isr::BUSY;
                self.busy = Busy::For(n - 1);
            }
            Busy::Stuck => bits |= isr::BUSY,
        }

        if !self.rx.is_empty() {
            bits |= isr::RXNE;
        }

        if self.acked && self.tx_ready.is_none_or(|n| self.sent.len() < n) {
            bits |= isr::TXIS;
        }

        if self.stop_pending && self.stop_detected {
            bits |= isr::STOPF;
        }
        if self.nack_pending {
            bits |= isr::NACKF;
        }

        bits
    }
}

impl RegisterAccess for FakeRegs {
    fn device(&self) -> Option<I2cDevice> {
        self.instance
    }

    fn read(&mut self, reg: Register) -> u32 {
        let value = match reg {
            Register::Isr => self.isr(),
            Register::Rxdr => self.rx.pop_front().unwrap_or(0) as u32,
            _ => self.value(reg),
        };
        self.log.push(Access::Read(reg, value));
        value
    }

    fn write(&mut self, reg: Register, value: u32) {
        self.log.push(Access::Write(reg, value));

        match reg {
            Register::Txdr => self.sent.push(value as u8),
            Register::Cr2 if value & cr2::START != 0 => {
                self.stop_pending = true;
                self.nack_pending = !self.acked;
            }
            Register::Icr => {
                if value & icr::STOPCF != 0 {
                    self.stop_pending = false;
                }
                if value & icr::NACKCF != 0 {
                    self.nack_pending = false;
                }
            }
            Register::RccApb1rstr => {
                let was_asserted = self.value(reg) != 0;
                if value != 0 {
                    // Held in reset: every I2C register returns to its reset value.
                    for r in 0..index(Register::RccApb1enr) {
                        self.values[r] = 0;
                    }
                    self.busy = Busy::Free;
                    self.stop_pending = false;
                    self.nack_pending = false;
                } else if was_asserted {
                    self.reset_pulses += 1;
                }
            }
            _ => (),
        }

        if reg != Register::Txdr {
            self.values[index(reg)] = value;
        }
    }
}

/// Records the pin configuration requests the driver makes.
#[derive(Debug, Default)]
pub struct FakePins {
    pub configured: Vec<(PinName, PinFunction)>,
}

impl PinMux for FakePins {
    fn pinout(&mut self, pin: PinName, function: PinFunction) {
        self.configured.push((pin, function));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn busy_clears_after_count() {
        let mut regs = FakeRegs::new();
        regs.busy = Busy::For(2);
        assert!(regs.is_set(Register::Isr, isr::BUSY));
        assert!(regs.is_set(Register::Isr, isr::BUSY));
        assert!(!regs.is_set(Register::Isr, isr::BUSY));
    }

    #[test]
    fn reset_clears_stuck_busy_and_registers() {
        let mut regs = FakeRegs::new();
        regs.busy = Busy::Stuck;
        regs.preset(Register::Cr1, 1);

        regs.set_bits(Register::RccApb1rstr, 1 << 21);
        regs.clear_bits(Register::RccApb1rstr, 1 << 21);

        assert_eq!(regs.reset_pulses, 1);
        assert_eq!(regs.value(Register::Cr1), 0);
        assert!(!regs.is_set(Register::Isr, isr::BUSY));
    }

    #[test]
    fn start_raises_stop_and_nack_until_cleared() {
        let mut regs = FakeRegs::new();
        regs.acked = false;
        regs.write(Register::Cr2, cr2::START);
        assert!(regs.is_set(Register::Isr, isr::STOPF));
        assert!(regs.is_set(Register::Isr, isr::NACKF));
        assert!(!regs.is_set(Register::Isr, isr::TXIS));

        regs.write(Register::Icr, icr::STOPCF | icr::NACKCF);
        assert!(!regs.is_set(Register::Isr, isr::STOPF | isr::NACKF));
    }

    #[test]
    fn txis_withdrawn_after_limit() {
        let mut regs = FakeRegs::new();
        regs.tx_ready = Some(1);
        assert!(regs.is_set(Register::Isr, isr::TXIS));
        regs.write(Register::Txdr, 0xab);
        assert!(!regs.is_set(Register::Isr, isr::TXIS));
        assert_eq!(regs.sent, [0xab]);
    }
}

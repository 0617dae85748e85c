//! Slave-mode support. Minimal: own-address programming, and byte loops built on the master's
//! byte primitives. Address-match event decoding isn't implemented, so `slave_receive` never
//! reports being addressed.

use crate::{
    gpio::PinMux,
    i2c::I2c,
    log::i2c_warn,
    regs::{Register, RegisterAccess, oar1},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, defmt::Format)]
#[repr(u8)]
/// What the bus master asked of this slave.
pub enum SlaveEvent {
    /// The slave hasn't been addressed.
    NoData = 0,
    /// The master requested a read from this slave (slave = transmitter).
    ReadAddressed = 1,
    /// The master is writing to all slaves (general call).
    WriteGeneral = 2,
    /// The master is writing to this slave (slave = receiver).
    WriteAddressed = 3,
}

impl<R, P> I2c<R, P>
where
    R: RegisterAccess,
    P: PinMux,
{
    /// Set the 7-bit own address, in `OAR1`. Only the address field is rewritten; the enable
    /// and mode bits, and reserved bits, keep their values.
    ///
    /// There's one own-address register in use: `_idx` and `_mask` are ignored.
    pub fn set_own_address(&mut self, _idx: u8, address: u8, _mask: u32) {
        self.regs.modify(Register::Oar1, |v| {
            (v & !oar1::OA1) | (((address as u32) << 1) & oar1::OA1_7BIT)
        });
    }

    /// Switch between master and slave operation. The peripheral does both without
    /// reconfiguration, so there's nothing to do.
    pub fn set_slave_mode(&mut self, _enable: bool) {}

    /// Check whether, and how, the master has addressed this slave. Not implemented: always
    /// returns `NoData`.
    pub fn slave_receive(&mut self) -> SlaveEvent {
        SlaveEvent::NoData
    }

    /// Read `buf.len()` bytes from the master. As with the master `read`, a byte that doesn't
    /// arrive in time is stored as 0; the return value is always `buf.len()`.
    pub fn slave_read(&mut self, buf: &mut [u8]) -> usize {
        for byte in buf.iter_mut() {
            *byte = self.read_byte(false).unwrap_or(0);
        }

        buf.len()
    }

    /// Write `bytes` to the master, stopping at the first byte the peripheral doesn't take in
    /// time. Returns the number of bytes written.
    pub fn slave_write(&mut self, bytes: &[u8]) -> usize {
        for (sent, byte) in bytes.iter().enumerate() {
            if self.write_byte(*byte).is_err() {
                i2c_warn!("I2C slave write stopped after {} of {} bytes", sent, bytes.len());
                return sent;
            }
        }

        bytes.len()
    }
}

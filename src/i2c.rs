//! Inter-Integrated Circuit (I2C) bus, master mode. For the STM32F0 I2C peripheral
//! (the same block as on F3, L4, G0 etc: `TIMINGR`, and `NBYTES`/`AUTOEND` in `CR2`).
//!
//! Blocking, and polled: every wait spins on a status flag with an iteration budget (see
//! [`crate::util`]), so a stuck or unplugged bus returns an error instead of hanging.
//!
//! STOP is always generated by the peripheral at the end of a transfer (`AUTOEND`); repeated
//! starts aren't supported. Transfers are limited to 255 bytes (no `RELOAD` chaining).

use crate::{
    error::{Error, Result},
    gpio::{PinMux, PinName},
    log::{i2c_debug, i2c_error, i2c_trace, i2c_warn},
    pinmap::{PinMap, PinMapEntry, PinMapError},
    regs::{I2cDevice, Register, RegisterAccess, TIMINGR_MASK, cr1, cr2, icr, isr, oar1},
    timing::{I2cSpeed, NoiseFilter},
    util::{FLAG_TIMEOUT, LONG_TIMEOUT, bounded_loop},
};

#[non_exhaustive]
#[derive(Debug, Clone, Copy, Eq, PartialEq, defmt::Format)]
pub enum I2cError {
    /// The bus stayed busy for the whole wait before START; START wasn't issued.
    Busy,
    /// A byte wasn't received (`RXNE`), or the peripheral wasn't ready for the next one
    /// (`TXIS`), in time.
    Timeout,
    /// A write ended early. The peripheral stops asking for data when the slave NACKs, so
    /// this is how a NACK shows up. Only returned by the `embedded-hal` implementation; the
    /// inherent API reports the short count instead.
    Nack,
    /// More than 255 bytes in one transfer.
    Overlength,
    /// Above 0x7f. Only 7-bit addresses are supported; the peripheral would silently drop the
    /// high bits.
    InvalidAddress,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, defmt::Format)]
/// Transfer direction, from the master's point of view.
pub enum Direction {
    Read,
    Write,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// A single addressed transfer.
pub struct Transfer {
    /// 7-bit slave address.
    pub addr: u8,
    pub len: u8,
    pub dir: Direction,
}

impl Transfer {
    pub fn new(addr: u8, len: usize, dir: Direction) -> Result<Self> {
        if addr > 0x7f {
            return Err(Error::I2cError(I2cError::InvalidAddress));
        }
        let len = u8::try_from(len).map_err(|_| Error::I2cError(I2cError::Overlength))?;
        Ok(Self { addr, len, dir })
    }

    /// New `CR2` contents from the current ones: address, byte count, automatic end, START.
    pub fn cr2(&self, current: u32) -> u32 {
        let cleared = current
            & !(cr2::SADD
                | cr2::NBYTES
                | cr2::RELOAD
                | cr2::AUTOEND
                | cr2::RD_WRN
                | cr2::START
                | cr2::STOP);

        let dir = match self.dir {
            Direction::Read => cr2::RD_WRN,
            Direction::Write => 0,
        };

        cleared
            | ((self.addr as u32) << 1 & cr2::SADD)
            | ((self.len as u32) << cr2::NBYTES_SHIFT)
            | cr2::AUTOEND
            | cr2::START
            | dir
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, defmt::Format)]
/// Configuration data for the I2C peripheral.
pub struct I2cConfig {
    /// Bus speed. Defaults to 100kHz.
    pub speed: I2cSpeed,
    /// Defaults to the analog filter, with the digital filter off.
    pub noise_filter: NoiseFilter,
}

/// Represents an Inter-Integrated Circuit (I2C) peripheral, in master mode.
///
/// The driver isn't reentrant: it takes `&mut self` for everything that touches the bus, and
/// sharing one peripheral between execution contexts needs a lock around whole transfers.
pub struct I2c<R, P> {
    pub regs: R,
    pins: P,
    device: I2cDevice,
    sda: PinMapEntry,
    scl: PinMapEntry,
    cfg: I2cConfig,
}

impl<R, P> I2c<R, P>
where
    R: RegisterAccess,
    P: PinMux,
{
    /// Initialize an I2C peripheral at 100kHz. `map` says which pins can serve which
    /// peripheral; `sda` and `scl` must resolve to the same one, and `regs` must be that
    /// peripheral's registers. Enables its clock, configures both pins through `pins`, resets
    /// the peripheral, then sets timing and enables it.
    pub fn new(regs: R, pins: P, sda: PinName, scl: PinName, map: &PinMap) -> Result<Self> {
        Self::new_with_config(regs, pins, sda, scl, map, Default::default())
    }

    /// Like `new`, with a custom speed and noise filter.
    pub fn new_with_config(
        regs: R,
        pins: P,
        sda: PinName,
        scl: PinName,
        map: &PinMap,
        cfg: I2cConfig,
    ) -> Result<Self> {
        let (sda, scl) = map.resolve(sda, scl).inspect_err(|_| {
            i2c_error!("I2C pin mapping failed");
        })?;

        if regs.device().is_some_and(|d| d != sda.device) {
            i2c_error!("I2C pins belong to a different peripheral than the registers passed");
            return Err(PinMapError::Mismatch.into());
        }

        let mut result = Self {
            regs,
            pins,
            device: sda.device,
            sda: *sda,
            scl: *scl,
            cfg,
        };

        i2c_debug!("I2C pins resolved; configuring at {} Hz", cfg.speed.hz());
        result.configure(cfg.speed.hz())?;

        Ok(result)
    }

    /// (Re)configure the bus from scratch: clock, pins, peripheral reset, then timing for
    /// `hz`, which must be 100_000, 200_000 or 400_000. Safe to call repeatedly; nothing from
    /// an earlier configuration survives the reset.
    ///
    /// If `hz` isn't supported, the peripheral is left reset and disabled.
    pub fn configure(&mut self, hz: u32) -> Result<()> {
        self.regs
            .set_bits(Register::RccApb1enr, self.device.rcc_bit());

        self.pins.pinout(self.scl.pin, self.scl.function);
        self.pins.pinout(self.sda.pin, self.sda.function);

        // Clears any flags left over from a previous run.
        self.reset();

        let speed = self.lookup_speed(hz)?;
        self.cfg.speed = speed;

        // Make sure the I2C unit is disabled so we can configure it
        self.regs.clear_bits(Register::Cr1, cr1::PE);

        let filter = self.cfg.noise_filter.cr1_bits();
        self.regs
            .modify(Register::Cr1, |v| (v & !(cr1::ANFOFF | cr1::DNF)) | filter);

        self.regs
            .write(Register::Timingr, speed.timingr() & TIMINGR_MASK);

        // Own address 0, 7-bit. (Slave-side address matching isn't used by the master.)
        self.regs.clear_bits(Register::Oar1, oar1::OA1EN);
        self.regs.write(Register::Oar1, 0);

        // Acknowledge received bytes; 7-bit addressing.
        self.regs.clear_bits(Register::Cr2, cr2::NACK | cr2::ADD10);

        self.regs.set_bits(Register::Cr1, cr1::PE);

        Ok(())
    }

    /// Change the bus speed, without otherwise touching the configuration. `hz` must be
    /// 100_000, 200_000 or 400_000; on anything else, returns an error and leaves the
    /// registers alone.
    pub fn set_frequency(&mut self, hz: u32) -> Result<()> {
        let speed = self.lookup_speed(hz)?;

        self.regs.clear_bits(Register::Cr1, cr1::PE);
        self.regs
            .write(Register::Timingr, speed.timingr() & TIMINGR_MASK);
        self.regs.set_bits(Register::Cr1, cr1::PE);

        self.cfg.speed = speed;
        i2c_debug!("I2C frequency set to {} Hz", hz);

        Ok(())
    }

    fn lookup_speed(&self, hz: u32) -> Result<I2cSpeed> {
        I2cSpeed::from_hz(hz).inspect_err(|_| {
            i2c_error!(
                "Only 100kHz, 200kHz and 400kHz I2C frequencies are supported; requested {}",
                hz
            );
        })
    }

    /// Pulse the peripheral's RCC reset line. All I2C registers return to their reset values,
    /// which also disables the peripheral: call `configure` before the next transfer.
    pub fn reset(&mut self) {
        let bit = self.device.rcc_bit();
        self.regs.set_bits(Register::RccApb1rstr, bit);
        self.regs.clear_bits(Register::RccApb1rstr, bit);
        i2c_trace!("I2C peripheral reset");
    }

    fn wait_not_busy(&mut self) -> Result<()> {
        bounded_loop!(
            LONG_TIMEOUT,
            self.regs.is_set(Register::Isr, isr::BUSY),
            Error::I2cError(I2cError::Busy)
        );
        Ok(())
    }

    /// Wait for the bus to be free, then generate a START condition.
    pub fn start(&mut self) -> Result<()> {
        self.wait_not_busy().inspect_err(|_| {
            i2c_warn!("I2C bus busy; START not generated");
        })?;

        self.regs.set_bits(Register::Cr2, cr2::START);
        Ok(())
    }

    /// Generate a STOP condition.
    pub fn stop(&mut self) {
        self.regs.set_bits(Register::Cr2, cr2::STOP);
    }

    /// Wait until a byte has been received, then return it.
    ///
    /// `_last` is accepted for API symmetry; with automatic end mode the peripheral NACKs the
    /// last byte of a transfer itself.
    pub fn read_byte(&mut self, _last: bool) -> Result<u8> {
        bounded_loop!(
            FLAG_TIMEOUT,
            !self.regs.is_set(Register::Isr, isr::RXNE),
            Error::I2cError(I2cError::Timeout)
        );

        Ok(self.regs.read(Register::Rxdr) as u8)
    }

    /// Wait until the peripheral can take another byte, then queue `byte` for transmission.
    pub fn write_byte(&mut self, byte: u8) -> Result<()> {
        bounded_loop!(
            FLAG_TIMEOUT,
            !self.regs.is_set(Register::Isr, isr::TXIS),
            Error::I2cError(I2cError::Timeout)
        );

        self.regs.write(Register::Txdr, byte as u32);
        Ok(())
    }

    fn begin(&mut self, transfer: Transfer) -> Result<()> {
        self.wait_not_busy().inspect_err(|_| {
            i2c_warn!("I2C bus busy; transfer to {} not started", transfer.addr);
        })?;

        self.regs.modify(Register::Cr2, |v| transfer.cr2(v));
        Ok(())
    }

    /// Read `buf.len()` bytes from the slave at 7-bit address `addr`, and return how many
    /// were read. An empty `buf` does nothing and returns 0.
    ///
    /// A byte that doesn't arrive in time is stored as 0 and the read carries on, so the count
    /// is always `buf.len()`: a timed-out byte is indistinguishable from a received 0 here. Use
    /// `start`/`read_byte` directly to see per-byte timeouts.
    ///
    /// `_generate_stop` is ignored; STOP is always generated after the last byte.
    pub fn read(&mut self, addr: u8, buf: &mut [u8], _generate_stop: bool) -> Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        self.begin(Transfer::new(addr, buf.len(), Direction::Read)?)?;

        for byte in buf.iter_mut() {
            *byte = match self.read_byte(false) {
                Ok(b) => b,
                Err(_) => {
                    i2c_warn!("I2C read from {}: RXNE timeout, byte stored as 0", addr);
                    0
                }
            };
        }

        Ok(buf.len())
    }

    /// Write `bytes` to the slave at 7-bit address `addr`, and return how many were sent.
    /// An empty `bytes` does nothing and returns 0.
    ///
    /// If the peripheral stops accepting data partway (slave NACK, or a stalled bus), a STOP
    /// is generated and the count of bytes sent so far is returned. Treat a count below
    /// `bytes.len()` as a failure.
    ///
    /// `_generate_stop` is ignored; STOP is always generated after the last byte.
    pub fn write(&mut self, addr: u8, bytes: &[u8], _generate_stop: bool) -> Result<usize> {
        if bytes.is_empty() {
            return Ok(0);
        }

        self.begin(Transfer::new(addr, bytes.len(), Direction::Write)?)?;

        for (sent, byte) in bytes.iter().enumerate() {
            if self.write_byte(*byte).is_err() {
                self.stop();
                i2c_warn!(
                    "I2C write to {} stopped after {} of {} bytes",
                    addr,
                    sent,
                    bytes.len()
                );
                return Ok(sent);
            }
        }

        Ok(bytes.len())
    }

    /// Address the slave at `addr` with no data bytes: START, address, STOP. Returns whether
    /// it acknowledged. Useful for scanning the bus.
    pub fn acknowledges(&mut self, addr: u8) -> Result<bool> {
        let transfer = Transfer::new(addr, 0, Direction::Write)?;

        // Earlier transfers leave STOPF (and maybe NACKF) set.
        self.regs
            .write(Register::Icr, icr::STOPCF | icr::NACKCF);
        self.begin(transfer)?;

        // With AUTOEND the peripheral generates STOP whether or not the address was ACKed.
        bounded_loop!(
            FLAG_TIMEOUT,
            !self.regs.is_set(Register::Isr, isr::STOPF),
            Error::RegisterUnchanged
        );

        let acked = !self.regs.is_set(Register::Isr, isr::NACKF);
        self.regs
            .write(Register::Icr, icr::STOPCF | icr::NACKCF);

        i2c_trace!("I2C address {} acknowledged: {}", addr, acked);
        Ok(acked)
    }

    /// The peripheral the pins resolved to.
    pub fn device(&self) -> I2cDevice {
        self.device
    }

    pub fn config(&self) -> &I2cConfig {
        &self.cfg
    }

    /// Release the register block and pin configurator.
    pub fn free(self) -> (R, P) {
        (self.regs, self.pins)
    }
}

#[cfg(feature = "embedded_hal")]
mod embedded_hal_impl {
    use embedded_hal::i2c::{ErrorType, I2c as I2cEh, Operation, SevenBitAddress};

    use super::*;

    impl<R, P> ErrorType for I2c<R, P>
    where
        R: RegisterAccess,
        P: PinMux,
    {
        type Error = crate::error::Error;
    }

    impl<R, P> I2cEh<SevenBitAddress> for I2c<R, P>
    where
        R: RegisterAccess,
        P: PinMux,
    {
        /// Note: Each operation is its own transfer, with a START before and a STOP after;
        /// repeated starts between operations aren't supported.
        ///
        /// An empty write addresses the slave without data, and fails with `Nack` if nothing
        /// answers. An empty read does nothing.
        fn transaction(
            &mut self,
            address: SevenBitAddress,
            operations: &mut [Operation<'_>],
        ) -> core::result::Result<(), Self::Error> {
            for op in operations {
                match op {
                    Operation::Read(buffer) => {
                        self.read(address, buffer, true)?;
                    }
                    Operation::Write(buffer) if buffer.is_empty() => {
                        if !self.acknowledges(address)? {
                            return Err(Error::I2cError(I2cError::Nack));
                        }
                    }
                    Operation::Write(buffer) => {
                        if self.write(address, buffer, true)? < buffer.len() {
                            return Err(Error::I2cError(I2cError::Nack));
                        }
                    }
                }
            }

            Ok(())
        }
    }
}

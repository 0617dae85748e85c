//! Common error definitions.

use crate::{i2c::I2cError, pinmap::PinMapError};

macro_rules! impl_from_error {
    ($error:ident) => {
        impl From<$error> for Error {
            fn from(error: $error) -> Self {
                Self::$error(error)
            }
        }
    };
}

/// Alias for Result<T, Error>.
pub type Result<T> = core::result::Result<T, Error>;

/// Collection of all errors that can occur.
///
/// `PinMapError` and `UnsupportedFrequency` are configuration mistakes: the bus is not usable
/// and the caller should stop. `I2cError` covers bus conditions a caller may retry.
#[derive(Debug, Clone, Copy, Eq, PartialEq, defmt::Format)]
pub enum Error {
    /// Occurs when an expected change of a register doesn't happen in time.
    ///
    /// This is returned when a bounded loop exceeds its alotted iteration count.
    RegisterUnchanged,
    /// The SDA/SCL pair doesn't belong to a single I2C peripheral.
    PinMapError(PinMapError),
    /// Only 100kHz, 200kHz and 400kHz are supported. Holds the requested value, in Hz.
    UnsupportedFrequency(u32),
    I2cError(I2cError),
}

impl_from_error!(PinMapError);
impl_from_error!(I2cError);

impl Error {
    /// True for errors that mean the peripheral was never (or is no longer) correctly set up.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::PinMapError(_) | Self::UnsupportedFrequency(_))
    }
}

#[cfg(feature = "embedded_hal")]
mod embedded_hal_impl {
    use embedded_hal::i2c::{Error as I2cEhError, ErrorKind as I2cErrorKind, NoAcknowledgeSource};

    use super::{Error, I2cError};

    impl I2cEhError for Error {
        fn kind(&self) -> I2cErrorKind {
            match self {
                Error::I2cError(i) => match i {
                    // A short write is the only place a missing ACK becomes visible here;
                    // the peripheral stops asserting TXIS.
                    I2cError::Nack => I2cErrorKind::NoAcknowledge(NoAcknowledgeSource::Unknown),
                    I2cError::Overlength => I2cErrorKind::Overrun,
                    I2cError::Busy | I2cError::Timeout | I2cError::InvalidAddress => {
                        I2cErrorKind::Other
                    }
                },
                _ => I2cErrorKind::Other,
            }
        }
    }
}


#[cfg(all(test, feature = "embedded_hal"))]
mod embedded_hal_tests {
    use embedded_hal::i2c::{Error as _, ErrorKind, NoAcknowledgeSource};

    use super::*;

    #[test]
    fn i2c_error_kinds() {
        assert_eq!(
            Error::I2cError(I2cError::Nack).kind(),
            ErrorKind::NoAcknowledge(NoAcknowledgeSource::Unknown)
        );
        assert_eq!(Error::I2cError(I2cError::Overlength).kind(), ErrorKind::Overrun);

        for e in [
            Error::I2cError(I2cError::Busy),
            Error::I2cError(I2cError::Timeout),
            Error::I2cError(I2cError::InvalidAddress),
            Error::UnsupportedFrequency(1),
            Error::PinMapError(PinMapError::Mismatch),
            Error::RegisterUnchanged,
        ] {
            assert_eq!(e.kind(), ErrorKind::Other);
        }
    }
}

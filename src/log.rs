//! Logging macros used throughout the crate.
//!
//! On the MCU these forward to `defmt`. In host unit tests they print to stdout, so a failing
//! test shows the bus events leading up to it. Anywhere else they compile to nothing.
//! Arguments must be both `defmt::Format` and `core::fmt::Display`; stick to integers.

macro_rules! i2c_log {
    ($defmt:ident, $level:literal, $($arg:tt)*) => {{
        #[cfg(defmt_log)]
        ::defmt::$defmt!($($arg)*);

        #[cfg(all(not(defmt_log), test))]
        std::println!("[{}] {}", $level, std::format!($($arg)*));
    }};
}

macro_rules! i2c_trace {
    ($($arg:tt)*) => { $crate::log::i2c_log!(trace, "TRACE", $($arg)*) };
}

macro_rules! i2c_debug {
    ($($arg:tt)*) => { $crate::log::i2c_log!(debug, "DEBUG", $($arg)*) };
}

macro_rules! i2c_warn {
    ($($arg:tt)*) => { $crate::log::i2c_log!(warn, "WARN", $($arg)*) };
}

macro_rules! i2c_error {
    ($($arg:tt)*) => { $crate::log::i2c_log!(error, "ERROR", $($arg)*) };
}

pub(crate) use {i2c_debug, i2c_error, i2c_log, i2c_trace, i2c_warn};

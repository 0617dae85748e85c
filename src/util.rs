//! This is an internal module that contains utility functionality used by other modules.

/// Iteration budget for per-byte flag polling (`RXNE`, `TXIS`).
///
/// These are loop counts, not durations: they don't track real time, they guarantee that a
/// stalled or disconnected bus can't hang the application.
pub const FLAG_TIMEOUT: u32 = 0x1000;

/// Iteration budget for waiting on a busy bus before a START condition.
pub const LONG_TIMEOUT: u32 = 0x8000;

/// Spin while `$cond` holds, re-evaluating it at most `$budget` times. If it still holds after
/// that, return `Err($err)` from the enclosing function. The optional block runs after each
/// unsuccessful check.
///
/// Example: `bounded_loop!(FLAG_TIMEOUT, !self.regs.is_set(Register::Isr, isr::RXNE), Error::RegisterUnchanged);`
macro_rules! bounded_loop {
    ($budget:expr, $cond:expr, $err:expr, $body:block) => {{
        let mut i: u32 = 0;
        while $cond {
            $body
            i += 1;
            if i >= $budget {
                return Err($err);
            }
        }
    }};
    ($budget:expr, $cond:expr, $err:expr) => {
        bounded_loop!($budget, $cond, $err, {})
    };
}

pub(crate) use bounded_loop;

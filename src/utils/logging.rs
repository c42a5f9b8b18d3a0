//! Conditional logging macros gated on a module-level `ENABLE_LOGS` const.
//!
//! A module opts in by defining the flag and importing the macros from the
//! crate root:
//! ```rust
//! const ENABLE_LOGS: bool = true;
//!
//! use spireworks_timer::{log_info, log_warn};
//! # fn main() { log_info!("logged only when ENABLE_LOGS is true"); }
//! ```

/// Info-level logging, gated on the calling module's `ENABLE_LOGS` const.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::info!($($arg)*);
        }
    };
}

/// Warn-level logging, gated on the calling module's `ENABLE_LOGS` const.
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::warn!($($arg)*);
        }
    };
}

/// Error-level logging, gated on the calling module's `ENABLE_LOGS` const.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::error!($($arg)*);
        }
    };
}

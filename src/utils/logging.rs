//! Logger setup plus macros that honour a module-level `ENABLE_LOGS` flag.
//!
//! ```text
//! const ENABLE_LOGS: bool = true;
//! use crate::{log_info, log_warn, log_error};
//!
//! log_info!("only printed while ENABLE_LOGS is true");
//! ```

use env_logger::Env;

use crate::config::debug_mode;

/// Install the global logger. `RUST_LOG` wins; otherwise `info`, or `debug`
/// when `ENGRESS_DEBUG` is set.
pub fn init() {
    let default_level = if debug_mode() { "debug" } else { "info" };
    // A second init (tests, embedding) keeps the first logger.
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or(default_level))
        .format_timestamp_millis()
        .try_init();
}

/// Info log, skipped when the calling module sets `ENABLE_LOGS = false`.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::info!($($arg)*);
        }
    };
}

/// Warn log, skipped when the calling module sets `ENABLE_LOGS = false`.
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::warn!($($arg)*);
        }
    };
}

/// Error log, skipped when the calling module sets `ENABLE_LOGS = false`.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::error!($($arg)*);
        }
    };
}

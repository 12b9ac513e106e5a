//! Logging setup and helpers.
//!
//! The library only emits records through the `log` facade: block and record
//! parsing at trace level, frame detection and table misses at debug level.
//! Binaries pick a backend; [`init_logger`] installs `env_logger`, filtered
//! by `RUST_LOG`.

use log::{debug, error, info, log_enabled, warn, Level};

/// Initializes the logger with the `env_logger` crate.
///
/// Defaults to `warn` when `RUST_LOG` is unset. Calling it again is a no-op.
pub fn init_logger() {
    let env = env_logger::Env::default().default_filter_or("warn");
    let _ = env_logger::Builder::from_env(env).try_init();
}

/// Logs an error message.
pub fn log_error(message: &str) {
    if log_enabled!(Level::Error) {
        error!("{message}");
    }
}

/// Logs a warning message.
pub fn log_warn(message: &str) {
    if log_enabled!(Level::Warn) {
        warn!("{message}");
    }
}

/// Logs an informational message.
pub fn log_info(message: &str) {
    if log_enabled!(Level::Info) {
        info!("{message}");
    }
}

/// Logs a debug message.
pub fn log_debug(message: &str) {
    if log_enabled!(Level::Debug) {
        debug!("{message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice() {
        init_logger();
        init_logger();
        log_error("error");
        log_warn("warn");
        log_info("info");
        log_debug("debug");
    }
}

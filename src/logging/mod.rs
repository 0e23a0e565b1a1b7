//! Logging
//!
//! Rolling daily log files plus the `log` backend that feeds them.

pub mod bridge;
pub mod entry;
pub mod rolling;

pub use bridge::{AUDIT_TARGET, FileLogBridge};
pub use entry::LogEntry;
pub use rolling::{Clock, ManualClock, RollingFileLogger, SystemClock};

use std::sync::Arc;

use crate::error::ServerError;

/// Install the process logger.
///
/// `RUST_LOG` wins over `default_level` for console filtering; whatever passes
/// the filter is also written to `file`.
pub fn setup_logging(default_level: &str, file: Arc<RollingFileLogger>) -> Result<(), ServerError> {
    let console = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_level),
    )
    .build();

    let bridge = FileLogBridge::new(console, file);
    let max_level = bridge.filter();

    log::set_boxed_logger(Box::new(bridge)).map_err(|e| ServerError::Logger(e.to_string()))?;
    log::set_max_level(max_level);
    Ok(())
}

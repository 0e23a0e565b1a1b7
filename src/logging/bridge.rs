//! Process-wide `log` backend
//!
//! Console output and filtering are delegated to env_logger; every record it
//! lets through is also appended to the rolling log file.

use log::{Log, Metadata, Record};
use std::sync::Arc;

use crate::logging::entry::LogEntry;
use crate::logging::rolling::RollingFileLogger;

/// Target used for store outcome records. The service persists these itself,
/// so the bridge only mirrors them to the console.
pub const AUDIT_TARGET: &str = "docstore::audit";

pub struct FileLogBridge {
    console: env_logger::Logger,
    file: Arc<RollingFileLogger>,
}

impl FileLogBridge {
    pub fn new(console: env_logger::Logger, file: Arc<RollingFileLogger>) -> Self {
        Self { console, file }
    }

    pub fn filter(&self) -> log::LevelFilter {
        self.console.filter()
    }
}

impl Log for FileLogBridge {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.console.enabled(metadata)
    }

    fn log(&self, record: &Record) {
        if !self.console.matches(record) {
            return;
        }

        self.console.log(record);

        if record.target() == AUDIT_TARGET {
            return;
        }

        let message = record.args().to_string();
        let entry = LogEntry::new(record.level(), record.target(), &message);
        if let Err(e) = self.file.append(&entry.to_string()) {
            eprintln!("Failed to write log file {}: {}", self.file.current_file().display(), e);
        }
    }

    fn flush(&self) {
        self.console.flush();
    }
}

//! Rolling file logger
//!
//! Appends lines to `{dir}/{base_name}_{YYYY-MM-DD}.log`. The active file is
//! chosen per write from the injected clock, so day rollover is noticed on the
//! first write of a new day. Each rollover prunes the directory down to the
//! newest `retention` files.
//!
//! Nothing in here may use the `log` macros: the process logger forwards to
//! this type and would re-enter the lock.

use chrono::{Local, NaiveDateTime, Timelike};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

/// Default number of daily files kept on disk
pub const DEFAULT_RETENTION: usize = 10;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Source of the current local time
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Wall clock in the local timezone
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<NaiveDateTime>,
}

impl ManualClock {
    pub fn new(start: NaiveDateTime) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn set(&self, now: NaiveDateTime) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = now;
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> NaiveDateTime {
        (**self).now()
    }
}

pub struct RollingFileLogger {
    log_dir: PathBuf,
    base_name: String,
    retention: usize,
    clock: Box<dyn Clock>,
    current_file: Mutex<PathBuf>,
}

impl RollingFileLogger {
    /// Open a logger on an existing directory using the system clock
    pub fn new(log_dir: impl Into<PathBuf>, base_name: &str, retention: usize) -> Self {
        Self::with_clock(log_dir, base_name, retention, Box::new(SystemClock))
    }

    /// Open a logger with an explicit clock. Runs one retention pass.
    pub fn with_clock(
        log_dir: impl Into<PathBuf>,
        base_name: &str,
        retention: usize,
        clock: Box<dyn Clock>,
    ) -> Self {
        let log_dir = log_dir.into();
        let current = file_name_for(&log_dir, base_name, clock.now());
        let logger = Self {
            log_dir,
            base_name: base_name.to_string(),
            retention,
            clock,
            current_file: Mutex::new(current.clone()),
        };
        logger.prune(&current);
        logger
    }

    /// File the next append will go to, as last recorded
    pub fn current_file(&self) -> PathBuf {
        self.current_file
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Append one timestamped entry, rotating first if the day changed.
    ///
    /// The write is synced to disk before the lock is released. Errors are returned
    /// to the caller; only retention cleanup failures are swallowed.
    pub fn append(&self, message: &str) -> io::Result<()> {
        let mut current = self
            .current_file
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let now = self.clock.now();
        let target = file_name_for(&self.log_dir, &self.base_name, now);

        if *current != target {
            *current = target.clone();
            self.prune(&target);
        }

        let entry = format!(
            "[{}.{:02}] {}\n",
            now.format(TIMESTAMP_FORMAT),
            (now.nanosecond() / 10_000_000).min(99),
            message
        );

        let mut file = OpenOptions::new().create(true).append(true).open(&target)?;
        file.write_all(entry.as_bytes())?;
        file.sync_data()?;
        Ok(())
    }

    /// Delete all but the newest `retention` log files, counting the active one.
    ///
    /// Returns how many files were removed. A file that cannot be deleted is
    /// skipped and will be tried again on the next rotation.
    pub fn clean_up_old_files(&self) -> usize {
        let current = self
            .current_file
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        self.prune(&current)
    }

    fn prune(&self, current: &Path) -> usize {
        let mut files = self.list_log_files();
        if !files.iter().any(|f| f == current) {
            files.push(current.to_path_buf());
        }
        files.sort_by(|a, b| b.cmp(a));

        files
            .into_iter()
            .skip(self.retention)
            .filter(|path| fs::remove_file(path).is_ok())
            .count()
    }

    /// Paths in the log directory matching `{base_name}_*.log`
    pub fn list_log_files(&self) -> Vec<PathBuf> {
        let prefix = format!("{}_", self.base_name);
        let Ok(entries) = fs::read_dir(&self.log_dir) else {
            return Vec::new();
        };

        entries
            .flatten()
            .filter(|entry| {
                entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| name.starts_with(&prefix) && name.ends_with(".log"))
            })
            .map(|entry| entry.path())
            .collect()
    }
}

fn file_name_for(log_dir: &Path, base_name: &str, now: NaiveDateTime) -> PathBuf {
    log_dir.join(format!("{}_{}.log", base_name, now.format("%Y-%m-%d")))
}

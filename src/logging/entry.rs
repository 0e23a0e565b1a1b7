//! Log entry formatting
//!
//! Renders `[{level}] {category}: {message}` with an optional second line
//! `Exception: {detail}`. The rolling logger adds the timestamp.
//!
//! Caller-supplied text can end up in any field, so control characters are
//! written as escapes: an entry never spans more lines than its layout allows.

use log::Level;
use std::fmt::{self, Write};

#[derive(Debug, Clone)]
pub struct LogEntry<'a> {
    pub level: Level,
    pub category: &'a str,
    pub message: &'a str,
    pub detail: Option<&'a str>,
}

impl<'a> LogEntry<'a> {
    pub fn new(level: Level, category: &'a str, message: &'a str) -> Self {
        Self {
            level,
            category,
            message,
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: Option<&'a str>) -> Self {
        self.detail = detail;
        self
    }
}

impl fmt::Display for LogEntry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.level,
            Escaped(self.category),
            Escaped(self.message)
        )?;
        if let Some(detail) = self.detail {
            write!(f, "\nException: {}", Escaped(detail))?;
        }
        Ok(())
    }
}

/// Writes `\n`, `\r`, `\t` and other control characters as escape sequences
struct Escaped<'a>(&'a str);

impl fmt::Display for Escaped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.0.chars() {
            if c.is_control() {
                write!(f, "{}", c.escape_default())?;
            } else {
                f.write_char(c)?;
            }
        }
        Ok(())
    }
}

//! Content kinds
//!
//! A kind decides where a resource lives, what its file extension is, how its
//! body is validated, and what media type it is served with.

use serde::de::IgnoredAny;
use std::fmt;

/// The two resource namespaces served by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Json,
    Text,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 2] = [ResourceKind::Json, ResourceKind::Text];

    /// Subdirectory of the data directory holding this kind
    pub fn subdir(self) -> &'static str {
        match self {
            ResourceKind::Json => "configs",
            ResourceKind::Text => "texts",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ResourceKind::Json => "json",
            ResourceKind::Text => "txt",
        }
    }

    pub fn media_type(self) -> &'static str {
        match self {
            ResourceKind::Json => "application/json",
            ResourceKind::Text => "text/plain; charset=utf-8",
        }
    }

    /// Check a body against this kind's content rule.
    ///
    /// JSON bodies must be UTF-8 and parse as a single JSON value; the parse
    /// result is discarded and the stored bytes stay exactly as received.
    /// Text bodies are accepted unconditionally.
    pub fn validate_content(self, body: &[u8]) -> Result<(), String> {
        match self {
            ResourceKind::Json => {
                // from_slice copies invalid UTF-8 inside strings without checking it
                let text = std::str::from_utf8(body).map_err(|e| e.to_string())?;
                serde_json::from_str::<IgnoredAny>(text)
                    .map(|_| ())
                    .map_err(|e| e.to_string())
            }
            ResourceKind::Text => Ok(()),
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Json => write!(f, "json"),
            ResourceKind::Text => write!(f, "text"),
        }
    }
}

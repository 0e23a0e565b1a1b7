//! Storage result types
//!
//! Defines result structures returned by storage operations.

use std::path::PathBuf;

use crate::storage::ResourceKind;

/// Result of a fetch operation
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub kind: ResourceKind,
    pub id: String,
    pub path: PathBuf,
    /// Stored bytes, verbatim
    pub content: Vec<u8>,
}

impl FetchResult {
    pub fn media_type(&self) -> &'static str {
        self.kind.media_type()
    }
}

/// Result of a create or upsert operation
#[derive(Debug, Clone)]
pub struct WriteResult {
    pub kind: ResourceKind,
    pub id: String,
    pub path: PathBuf,
    /// False when an upsert replaced an existing file
    pub created: bool,
    pub bytes_written: usize,
}

/// Result of a remove operation
#[derive(Debug, Clone)]
pub struct RemoveResult {
    pub kind: ResourceKind,
    pub id: String,
    pub path: PathBuf,
}

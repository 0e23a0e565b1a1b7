//! Storage operations
//!
//! Fetch, create, upsert and remove for named resources. Every operation
//! validates the identifier first; the filesystem is never touched for an
//! invalid one. There is no in-memory index: each call re-checks the file.

use log::{debug, error};
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs;

use crate::error::{StoreError, StoreResult};
use crate::storage::ResourceKind;
use crate::storage::filesystem::{file_exists, write_atomic};
use crate::storage::locks::{DEFAULT_STRIPES, StripedLocks};
use crate::storage::results::{FetchResult, RemoveResult, WriteResult};
use crate::storage::validation::validate_identifier;

/// File-backed store with one subdirectory per content kind
pub struct ResourceStore {
    root: PathBuf,
    locks: StripedLocks,
}

impl ResourceStore {
    /// Create a store rooted at `root` with the default number of lock stripes
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_stripes(root, DEFAULT_STRIPES)
    }

    pub fn with_stripes(root: impl Into<PathBuf>, stripes: usize) -> Self {
        Self {
            root: root.into(),
            locks: StripedLocks::new(stripes),
        }
    }

    /// Directory holding resources of `kind`
    pub fn kind_dir(&self, kind: ResourceKind) -> PathBuf {
        self.root.join(kind.subdir())
    }

    /// Derived location of a resource. Callers must validate `id` first.
    pub fn location(&self, kind: ResourceKind, id: &str) -> PathBuf {
        self.kind_dir(kind).join(format!("{}.{}", id, kind.extension()))
    }

    fn checked_location(&self, kind: ResourceKind, id: &str) -> StoreResult<PathBuf> {
        validate_identifier(id).map_err(|e| StoreError::from_identifier(kind, e))?;
        Ok(self.location(kind, id))
    }

    fn check_content(kind: ResourceKind, id: &str, body: &[u8]) -> StoreResult<()> {
        kind.validate_content(body)
            .map_err(|reason| StoreError::InvalidContent {
                kind,
                id: id.to_string(),
                reason,
            })
    }

    /// Read a resource. Stored JSON that no longer parses is an internal error.
    pub async fn fetch(&self, kind: ResourceKind, id: &str) -> StoreResult<FetchResult> {
        let path = self.checked_location(kind, id)?;

        let content = match fs::read(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::NotFound {
                    kind,
                    id: id.to_string(),
                });
            }
            Err(e) => {
                error!("Failed to read {} (real: {}): {}", id, path.display(), e);
                return Err(StoreError::io(kind, id, "read failed", e));
            }
        };

        if let Err(reason) = kind.validate_content(&content) {
            error!("Stored {} resource {} is corrupt: {}", kind, id, reason);
            return Err(StoreError::Internal {
                kind,
                id: id.to_string(),
                detail: format!("stored content failed validation: {}", reason),
            });
        }

        debug!("Fetched {} resource {} ({} bytes)", kind, id, content.len());

        Ok(FetchResult {
            kind,
            id: id.to_string(),
            path,
            content,
        })
    }

    /// Write a new resource; fails if one already exists under `id`
    pub async fn create(
        &self,
        kind: ResourceKind,
        id: &str,
        body: &[u8],
    ) -> StoreResult<WriteResult> {
        let path = self.checked_location(kind, id)?;
        Self::check_content(kind, id, body)?;

        let _guard = self.locks.lock(kind, id).await;

        let exists = file_exists(&path)
            .await
            .map_err(|e| StoreError::io(kind, id, "existence check failed", e))?;
        if exists {
            return Err(StoreError::AlreadyExists {
                kind,
                id: id.to_string(),
            });
        }

        write_atomic(&path, body)
            .await
            .map_err(|e| StoreError::io(kind, id, "write failed", e))?;

        debug!("Created {} resource {} (real: {})", kind, id, path.display());

        Ok(WriteResult {
            kind,
            id: id.to_string(),
            path,
            created: true,
            bytes_written: body.len(),
        })
    }

    /// Write a resource unconditionally, replacing any prior content
    pub async fn upsert(
        &self,
        kind: ResourceKind,
        id: &str,
        body: &[u8],
    ) -> StoreResult<WriteResult> {
        let path = self.checked_location(kind, id)?;
        Self::check_content(kind, id, body)?;

        let _guard = self.locks.lock(kind, id).await;

        let existed = file_exists(&path)
            .await
            .map_err(|e| StoreError::io(kind, id, "existence check failed", e))?;

        write_atomic(&path, body)
            .await
            .map_err(|e| StoreError::io(kind, id, "write failed", e))?;

        debug!(
            "{} {} resource {} (real: {})",
            if existed { "Replaced" } else { "Created" },
            kind,
            id,
            path.display()
        );

        Ok(WriteResult {
            kind,
            id: id.to_string(),
            path,
            created: !existed,
            bytes_written: body.len(),
        })
    }

    /// Delete a resource; fails if it does not exist
    pub async fn remove(&self, kind: ResourceKind, id: &str) -> StoreResult<RemoveResult> {
        let path = self.checked_location(kind, id)?;

        let _guard = self.locks.lock(kind, id).await;

        let exists = file_exists(&path)
            .await
            .map_err(|e| StoreError::io(kind, id, "existence check failed", e))?;
        if !exists {
            return Err(StoreError::NotFound {
                kind,
                id: id.to_string(),
            });
        }

        match fs::remove_file(&path).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::NotFound {
                    kind,
                    id: id.to_string(),
                });
            }
            Err(e) => {
                error!("Failed to delete {} (real: {}): {}", id, path.display(), e);
                return Err(StoreError::io(kind, id, "delete failed", e));
            }
        }

        debug!("Deleted {} resource {} (real: {})", kind, id, path.display());

        Ok(RemoveResult {
            kind,
            id: id.to_string(),
            path,
        })
    }
}

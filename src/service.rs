//! Resource service
//!
//! The entry point the HTTP layer calls. Each operation runs against the
//! store and its outcome is appended to the audit log before the result is
//! returned. If the audit entry cannot be written the call fails with an
//! internal error, even though the filesystem effect has already happened.

use log::{Level, error, log};
use std::fmt;
use std::sync::Arc;

use crate::error::{StoreError, StoreResult};
use crate::logging::{AUDIT_TARGET, LogEntry, RollingFileLogger};
use crate::storage::{FetchResult, RemoveResult, ResourceKind, ResourceStore, WriteResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Fetch,
    Create,
    Upsert,
    Remove,
}

impl Operation {
    fn past_tense(self) -> &'static str {
        match self {
            Operation::Fetch => "served",
            Operation::Create => "created",
            Operation::Upsert => "saved",
            Operation::Remove => "removed",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Fetch => "fetch",
            Operation::Create => "create",
            Operation::Upsert => "upsert",
            Operation::Remove => "remove",
        };
        write!(f, "{}", name)
    }
}

pub struct ResourceService {
    store: ResourceStore,
    audit: Arc<RollingFileLogger>,
}

impl ResourceService {
    pub fn new(store: ResourceStore, audit: Arc<RollingFileLogger>) -> Self {
        Self { store, audit }
    }

    pub fn store(&self) -> &ResourceStore {
        &self.store
    }

    pub async fn fetch(&self, kind: ResourceKind, id: &str) -> StoreResult<FetchResult> {
        let result = self.store.fetch(kind, id).await;
        self.finish(Operation::Fetch, kind, id, result)
    }

    pub async fn create(
        &self,
        kind: ResourceKind,
        id: &str,
        body: &[u8],
    ) -> StoreResult<WriteResult> {
        let result = self.store.create(kind, id, body).await;
        self.finish(Operation::Create, kind, id, result)
    }

    pub async fn upsert(
        &self,
        kind: ResourceKind,
        id: &str,
        body: &[u8],
    ) -> StoreResult<WriteResult> {
        let result = self.store.upsert(kind, id, body).await;
        self.finish(Operation::Upsert, kind, id, result)
    }

    pub async fn remove(&self, kind: ResourceKind, id: &str) -> StoreResult<RemoveResult> {
        let result = self.store.remove(kind, id).await;
        self.finish(Operation::Remove, kind, id, result)
    }

    /// Record the outcome, then hand the result back
    fn finish<T>(
        &self,
        op: Operation,
        kind: ResourceKind,
        id: &str,
        result: StoreResult<T>,
    ) -> StoreResult<T> {
        let (level, message, detail) = match &result {
            Ok(_) => (
                Level::Info,
                format!("Successfully {} {} resource {}", op.past_tense(), kind, id),
                None,
            ),
            Err(err @ StoreError::Internal { .. }) => (
                Level::Error,
                format!("Error processing {} for {} resource {}", op, kind, id),
                err.detail(),
            ),
            Err(err) => (Level::Warn, format!("Rejected {}: {}", op, err), None),
        };

        let entry = LogEntry::new(level, AUDIT_TARGET, &message).with_detail(detail);
        if let Err(e) = self.audit.append(&entry.to_string()) {
            error!("Failed to record {} outcome for {} resource {}: {}", op, kind, id, e);
            return Err(StoreError::Internal {
                kind,
                id: id.to_string(),
                detail: format!("audit log append failed: {}", e),
            });
        }

        log!(target: AUDIT_TARGET, level, "{}", message.escape_debug());
        result
    }
}

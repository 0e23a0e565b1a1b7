//! Error types
//!
//! Defines the failure taxonomy for identifier validation, store operations,
//! and server startup.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::storage::ResourceKind;

/// Identifier validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    #[error("Missing required 'id' parameter")]
    Missing,

    #[error("Invalid identifier format: {0}")]
    Malformed(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Store operation errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Missing required 'id' parameter for {kind} resource")]
    MissingIdentifier { kind: ResourceKind },

    #[error("Invalid identifier format for {kind} resource: {id}")]
    InvalidIdentifier { kind: ResourceKind, id: String },

    #[error("Invalid {kind} content for {id}: {reason}")]
    InvalidContent {
        kind: ResourceKind,
        id: String,
        reason: String,
    },

    #[error("{kind} resource not found: {id}")]
    NotFound { kind: ResourceKind, id: String },

    #[error("{kind} resource already exists: {id}")]
    AlreadyExists { kind: ResourceKind, id: String },

    #[error("Internal error on {kind} resource {id}: {detail}")]
    Internal {
        kind: ResourceKind,
        id: String,
        detail: String,
    },
}

impl StoreError {
    pub fn from_identifier(kind: ResourceKind, err: IdentifierError) -> Self {
        match err {
            IdentifierError::Missing => StoreError::MissingIdentifier { kind },
            IdentifierError::Malformed(id) => StoreError::InvalidIdentifier { kind, id },
        }
    }

    /// Wrap an I/O failure that is not about existence
    pub fn io(kind: ResourceKind, id: &str, context: &str, err: io::Error) -> Self {
        StoreError::Internal {
            kind,
            id: id.to_string(),
            detail: format!("{}: {}", context, err),
        }
    }

    /// Stable machine-readable code for the failure category
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::MissingIdentifier { .. } => "missing_identifier",
            StoreError::InvalidIdentifier { .. } => "invalid_identifier",
            StoreError::InvalidContent { .. } => "invalid_content",
            StoreError::NotFound { .. } => "not_found",
            StoreError::AlreadyExists { .. } => "already_exists",
            StoreError::Internal { .. } => "internal_error",
        }
    }

    /// HTTP status code class for the failure
    pub fn status_code(&self) -> u16 {
        match self {
            StoreError::MissingIdentifier { .. } => 400,
            StoreError::InvalidIdentifier { .. } => 400,
            StoreError::InvalidContent { .. } => 400,
            StoreError::NotFound { .. } => 404,
            StoreError::AlreadyExists { .. } => 409,
            StoreError::Internal { .. } => 500,
        }
    }

    /// Message safe to hand to an external caller.
    ///
    /// Internal errors collapse to a generic message; the full detail goes
    /// to the log only.
    pub fn public_message(&self) -> String {
        match self {
            StoreError::MissingIdentifier { .. } => "Missing required 'id' parameter".to_string(),
            StoreError::InvalidIdentifier { .. } => "Invalid identifier format".to_string(),
            StoreError::InvalidContent { kind, .. } => match kind {
                ResourceKind::Json => "Invalid JSON format".to_string(),
                ResourceKind::Text => "Invalid text content".to_string(),
            },
            StoreError::NotFound { kind, id } => {
                format!("{} resource not found for identifier {}", kind, id)
            }
            StoreError::AlreadyExists { kind, id } => {
                format!("{} resource already exists for identifier {}", kind, id)
            }
            StoreError::Internal { .. } => "Internal server error".to_string(),
        }
    }

    /// Diagnostic detail recorded as the `Exception:` line of a log entry
    pub fn detail(&self) -> Option<&str> {
        match self {
            StoreError::InvalidContent { reason, .. } => Some(reason),
            StoreError::Internal { detail, .. } => Some(detail),
            _ => None,
        }
    }
}

/// Server startup errors
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Directory {0} does not exist or is not accessible")]
    DataDirMissing(PathBuf),

    #[error("Failed to install logger: {0}")]
    Logger(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn not_found() -> StoreError {
        StoreError::NotFound {
            kind: ResourceKind::Json,
            id: "cfg1".into(),
        }
    }

    #[test]
    fn status_codes_follow_failure_class() {
        assert_eq!(
            StoreError::from_identifier(ResourceKind::Json, IdentifierError::Missing).status_code(),
            400
        );
        let malformed = IdentifierError::Malformed("a:b".into());
        assert_eq!(
            StoreError::from_identifier(ResourceKind::Text, malformed).status_code(),
            400
        );
        assert_eq!(not_found().status_code(), 404);
        assert_eq!(
            StoreError::AlreadyExists {
                kind: ResourceKind::Json,
                id: "cfg1".into()
            }
            .status_code(),
            409
        );
        assert_eq!(
            StoreError::Internal {
                kind: ResourceKind::Json,
                id: "cfg1".into(),
                detail: "disk full".into()
            }
            .status_code(),
            500
        );
    }

    #[test]
    fn internal_detail_is_not_public() {
        let err = StoreError::io(
            ResourceKind::Text,
            "notes",
            "write failed",
            io::Error::new(io::ErrorKind::PermissionDenied, "/secret/path denied"),
        );
        assert_eq!(err.public_message(), "Internal server error");
        assert!(err.detail().unwrap().contains("/secret/path denied"));
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn identifier_errors_keep_the_offending_id() {
        let malformed = IdentifierError::Malformed("a:b".into());
        let err = StoreError::from_identifier(ResourceKind::Json, malformed);
        assert!(matches!(err, StoreError::InvalidIdentifier { ref id, .. } if id == "a:b"));
        assert_eq!(err.code(), "invalid_identifier");
    }
}

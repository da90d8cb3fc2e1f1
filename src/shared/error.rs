//! Sync Error Types
//!
//! This module defines the single error type used across the offline sync layer.
//! The variants follow the three-way split the coordinator cares about:
//!
//! - `StorageUnavailable` / `Storage` - the local store failed; always propagated
//! - `NetworkFailure` - the remote call produced no response
//! - `RemoteRejected` - the remote answered with a non-success status
//!
//! # Usage
//!
//! ```rust
//! use studyhub::shared::error::SyncError;
//!
//! let error = SyncError::rejected(404, "Progress not found");
//! assert!(error.is_rejection());
//! ```
use thiserror::Error;

use crate::shared::config::ConfigError;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, SyncError>;

/// Errors produced by the local store, the remote client and the coordinator
#[derive(Debug, Error)]
pub enum SyncError {
    /// The local database could not be opened or migrated
    #[error("Local storage unavailable: {message}")]
    StorageUnavailable {
        /// Human-readable error message
        message: String,
    },

    /// A storage operation failed after the store was opened
    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    /// The remote call could not complete (no response)
    #[error("Network failure: {message}")]
    NetworkFailure {
        /// Human-readable error message
        message: String,
    },

    /// The remote call completed but reported an application-level failure
    #[error("Remote rejected request ({status}): {message}")]
    RemoteRejected {
        /// HTTP status returned by the server
        status: u16,
        /// Response body or reason phrase
        message: String,
    },

    /// A queued payload could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl SyncError {
    /// Create a new storage-unavailable error
    pub fn storage_unavailable(message: impl Into<String>) -> Self {
        Self::StorageUnavailable {
            message: message.into(),
        }
    }

    /// Create a new network failure
    pub fn network(message: impl Into<String>) -> Self {
        Self::NetworkFailure {
            message: message.into(),
        }
    }

    /// Create a new remote rejection
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::RemoteRejected {
            status,
            message: message.into(),
        }
    }

    /// Whether the remote never answered
    pub fn is_network(&self) -> bool {
        matches!(self, Self::NetworkFailure { .. })
    }

    /// Whether the remote answered with a failure status
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::RemoteRejected { .. })
    }

    /// Whether the failure came from the local store
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::StorageUnavailable { .. } | Self::Storage(_))
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Self::rejected(status.as_u16(), err.to_string()),
            None => Self::network(err.to_string()),
        }
    }
}

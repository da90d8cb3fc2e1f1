//! Shared Module
//!
//! Types used by every part of the sync layer: the deferrable action model,
//! configuration and the crate error type. None of these touch storage or the
//! network.

/// Deferrable action model
pub mod action;

/// Application configuration
pub mod config;

/// Shared error types
pub mod error;

/// Re-export commonly used types for convenience
pub use action::{PendingActionKind, TIME_TRACK, TOPIC_COMPLETE};
pub use config::{AppConfig, AppConfigBuilder, ConfigError, RejectionPolicy};
pub use error::{Result, SyncError};

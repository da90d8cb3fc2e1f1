//! StudyHub - Offline Sync Library
//!
//! Offline-first synchronization layer for the StudyHub study portal. Progress
//! actions taken while the device has no connectivity are persisted locally
//! and replayed against the server, in order, once connectivity returns.
//!
//! # Overview
//!
//! This library provides:
//! - A durable local store with a pending-action queue, a progress cache and a
//!   scores cache (SQLite via sqlx)
//! - A connectivity signal that can be driven by the host or by a
//!   reachability probe
//! - A sync coordinator that executes actions immediately when possible and
//!   defers them otherwise
//!
//! # Module Structure
//!
//! - **`shared`** - Types shared by every component
//!   - Pending action kinds and their wire payloads
//!   - Configuration (file, environment, builder)
//!   - Error types
//!
//! - **`client`** - The on-device sync client
//!   - Local store and migrations
//!   - Progress API client
//!   - Network monitor and sync coordinator
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use studyhub::client::{
//!     Config, LocalStore, NetworkMonitor, NetworkStatus, ProgressApiClient, SyncCoordinator,
//!     TracingNotifier,
//! };
//!
//! # async fn example() -> studyhub::shared::Result<()> {
//! let config = Config::load()?;
//! let api = Arc::new(ProgressApiClient::new(config.clone())?);
//! let store = LocalStore::initialize(config.database_path()).await?;
//!
//! let monitor = NetworkMonitor::new(NetworkStatus::Offline);
//! let coordinator = Arc::new(SyncCoordinator::new(store, api, monitor.clone(), Arc::new(TracingNotifier)));
//! coordinator.spawn();
//!
//! // Host reports connectivity; the coordinator drains the queue
//! monitor.set_status(NetworkStatus::Online);
//! # Ok(())
//! # }
//! ```
//!
//! # Thread Safety
//!
//! - **Store**: `LocalStore` wraps a pooled `SqlitePool` and is cheap to clone
//! - **Coordinator**: shared as `Arc<SyncCoordinator>`; drain passes are
//!   serialized by an internal lock
//! - **Signal**: `NetworkMonitor` clones share one `watch` channel
//!
//! # Error Handling
//!
//! Every fallible operation returns `shared::error::Result`. Remote and
//! connectivity failures are absorbed by the coordinator; only local storage
//! problems reach callers of `perform_action`.

/// Shared types and data structures
pub mod shared;

/// On-device sync client
pub mod client;

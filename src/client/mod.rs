//! Offline-first sync client
//!
//! Everything that runs on the learner's device: the local store, the remote
//! API client, the connectivity signal and the coordinator that ties them
//! together.
//!
//! # Architecture
//!
//! - **`config`** - Client configuration (server URL, database path, probe)
//! - **`api_client`** - reqwest client for the progress endpoints
//! - **`local_db`** - SQLite store: pending queue, progress cache, scores cache
//! - **`notifier`** - User-visible toasts
//! - **`sync`** - Network monitor and sync coordinator
//! - **`main`** - `studyhub-sync` binary (background sync agent)
//!
//! # Module Structure
//!
//! ```text
//! client/
//! ├── mod.rs        - Module exports and documentation
//! ├── main.rs       - Background sync agent entry point
//! ├── config.rs     - Configuration management
//! ├── api_client.rs - Progress API client and remote traits
//! ├── notifier.rs   - Notification sinks
//! ├── local_db/     - Local SQLite store
//! └── sync/         - Coordinator, network monitor, sync state
//! ```

pub mod api_client;
pub mod config;
pub mod local_db;
pub mod notifier;
pub mod sync;

// Re-export commonly used types
pub use api_client::{
    CompletionResponse, ConfirmedCompletion, ProgressApiClient, ReachabilityProbe, RemoteService,
};
pub use config::Config;
pub use local_db::LocalStore;
pub use notifier::{ChannelNotifier, Notification, Notifier, Severity, TracingNotifier};
pub use sync::{
    ActionOutcome, DrainReport, NetworkMonitor, NetworkStatus, OfflineAck, SyncCoordinator,
    SyncState,
};

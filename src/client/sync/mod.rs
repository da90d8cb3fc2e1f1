//! # Sync Coordinator
//!
//! Gates every state-changing user action through a connectivity-aware
//! execute-or-defer policy, and replays the deferred queue when connectivity
//! returns.
//!
//! ## Architecture
//!
//! - **Network Monitor**: the connectivity signal (`watch` channel)
//! - **Local Store**: the pending-action queue and the progress cache
//! - **Remote Service**: the endpoints queued actions are replayed against
//! - **Notifier**: toasts for connectivity transitions
//! - **Sync State**: the outcome of the last drain pass
//!
//! ## Ordering
//!
//! A drain pass walks a snapshot of the queue in enqueue order and never skips
//! past an item that failed: the first failure ends the pass and leaves that
//! item and everything after it queued. Only one pass runs at a time.
//!
//! Two `perform_action` calls for the same topic are not serialized against
//! each other; callers are expected to be driven by discrete user interactions.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use studyhub::client::api_client::{ProgressApiClient, RemoteService};
//! use studyhub::client::local_db::LocalStore;
//! use studyhub::client::notifier::TracingNotifier;
//! use studyhub::client::sync::{NetworkMonitor, NetworkStatus, SyncCoordinator};
//! use studyhub::client::Config;
//! use studyhub::shared::PendingActionKind;
//!
//! # async fn example() -> studyhub::shared::Result<()> {
//! let config = Config::load()?;
//! let api = Arc::new(ProgressApiClient::new(config.clone())?);
//! let store = LocalStore::initialize(config.database_path()).await?;
//! let monitor = NetworkMonitor::new(NetworkStatus::Online);
//!
//! let coordinator = Arc::new(SyncCoordinator::new(
//!     store,
//!     api.clone(),
//!     monitor.clone(),
//!     Arc::new(TracingNotifier),
//! ));
//! coordinator.spawn();
//!
//! let outcome = coordinator
//!     .perform_action(PendingActionKind::topic_complete("t-1"), || api.complete_topic("t-1"))
//!     .await?;
//! println!("offline: {}", outcome.is_offline());
//! # Ok(())
//! # }
//! ```

pub mod network_monitor;
pub mod sync_state;

pub use network_monitor::{NetworkMonitor, NetworkStatus};
pub use sync_state::{DrainReport, SyncState};

use crate::client::api_client::{ConfirmedCompletion, RemoteService};
use crate::client::local_db::{LocalStore, ProgressFields};
use crate::client::notifier::{Notifier, Severity};
use crate::shared::action::PendingActionKind;
use crate::shared::config::RejectionPolicy;
use crate::shared::error::Result;
use chrono::Utc;
use serde::Serialize;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{watch, Mutex, RwLock};
use tokio::task::JoinHandle;

/// Toast shown when connectivity returns
pub const BACK_ONLINE_MESSAGE: &str = "You are back online. Syncing progress...";

/// Toast shown when connectivity is lost
pub const OFFLINE_MESSAGE: &str = "Working offline. Progress saved locally.";

/// Synthesized success returned for a deferred action.
///
/// Serializes to the body the portal UI expects from the real endpoint:
/// `{"success": true, "offline": true, "completed": ...}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OfflineAck {
    pub success: bool,
    pub offline: bool,
    /// New cached completion state for a topic toggle; `true` otherwise
    pub completed: bool,
    /// Queue id of the deferred action
    #[serde(skip)]
    pub action_id: i64,
}

impl OfflineAck {
    fn new(action_id: i64, completed: bool) -> Self {
        Self {
            success: true,
            offline: true,
            completed,
            action_id,
        }
    }
}

/// Result of [`SyncCoordinator::perform_action`]
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome<T> {
    /// The remote call succeeded; its result is passed through untouched
    Delivered(T),
    /// The action was queued for a later drain pass
    Deferred(OfflineAck),
}

impl<T> ActionOutcome<T> {
    pub fn is_offline(&self) -> bool {
        matches!(self, Self::Deferred(_))
    }

    pub fn delivered(self) -> Option<T> {
        match self {
            Self::Delivered(value) => Some(value),
            Self::Deferred(_) => None,
        }
    }
}

/// Execute-or-defer coordinator over the local store and the remote service
pub struct SyncCoordinator {
    /// `None` when local storage was unavailable at startup
    store: Option<LocalStore>,
    remote: Arc<dyn RemoteService>,
    monitor: NetworkMonitor,
    notifier: Arc<dyn Notifier>,
    rejection_policy: RejectionPolicy,
    drain_lock: Mutex<()>,
    state: RwLock<SyncState>,
}

impl SyncCoordinator {
    pub fn new(
        store: LocalStore,
        remote: Arc<dyn RemoteService>,
        monitor: NetworkMonitor,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self::build(Some(store), remote, monitor, notifier)
    }

    /// Coordinator for when the local store could not be opened: every action
    /// goes straight to the remote and nothing is ever queued.
    pub fn online_only(
        remote: Arc<dyn RemoteService>,
        monitor: NetworkMonitor,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self::build(None, remote, monitor, notifier)
    }

    fn build(
        store: Option<LocalStore>,
        remote: Arc<dyn RemoteService>,
        monitor: NetworkMonitor,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            store,
            remote,
            monitor,
            notifier,
            rejection_policy: RejectionPolicy::default(),
            drain_lock: Mutex::new(()),
            state: RwLock::new(SyncState::default()),
        }
    }

    pub fn with_rejection_policy(mut self, policy: RejectionPolicy) -> Self {
        self.rejection_policy = policy;
        self
    }

    pub fn store(&self) -> Option<&LocalStore> {
        self.store.as_ref()
    }

    pub fn monitor(&self) -> &NetworkMonitor {
        &self.monitor
    }

    pub fn is_online(&self) -> bool {
        self.monitor.is_online()
    }

    pub async fn state(&self) -> SyncState {
        self.state.read().await.clone()
    }

    /// Run `remote_call` now if online, otherwise (or if it fails) queue
    /// `action` and answer with an optimistic [`OfflineAck`].
    ///
    /// Connectivity and remote failures never surface here; only local store
    /// errors do. Without a local store the remote error is returned instead.
    ///
    /// A delivered topic toggle updates the progress cache with the completion
    /// state the server confirmed.
    pub async fn perform_action<F, Fut, T>(
        &self,
        action: PendingActionKind,
        remote_call: F,
    ) -> Result<ActionOutcome<T>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
        T: ConfirmedCompletion,
    {
        let Some(store) = &self.store else {
            return remote_call().await.map(ActionOutcome::Delivered);
        };

        if self.is_online() {
            match remote_call().await {
                Ok(value) => {
                    if let (PendingActionKind::TopicComplete { topic_id }, Some(completed)) =
                        (&action, value.confirmed_completion())
                    {
                        // Already applied remotely; a cache failure is only logged
                        if let Err(err) = record_delivered_toggle(store, topic_id, completed).await
                        {
                            tracing::warn!(topic_id = %topic_id, error = %err, "Failed to cache confirmed completion");
                        }
                    }
                    return Ok(ActionOutcome::Delivered(value));
                }
                Err(err) => tracing::warn!(
                    action = action.type_name(),
                    error = %err,
                    "Network request failed, queueing for sync"
                ),
            }
        }

        let action_id = store.enqueue_action(&action).await?;

        let completed = match &action {
            PendingActionKind::TopicComplete { topic_id } => {
                toggle_cached_completion(store, topic_id).await?
            }
            _ => true,
        };

        Ok(ActionOutcome::Deferred(OfflineAck::new(action_id, completed)))
    }

    /// Replay the queue in enqueue order, stopping at the first failure.
    ///
    /// Never fails: problems are logged and recorded in the returned report and
    /// in [`SyncState`].
    pub async fn sync_pending(&self) -> DrainReport {
        let Some(store) = &self.store else {
            return DrainReport::default();
        };

        let _pass = self.drain_lock.lock().await;
        self.state.write().await.is_syncing = true;

        let mut report = DrainReport::default();
        if let Err(err) = self.drain(store, &mut report).await {
            tracing::error!(error = %err, "Sync pass aborted by local store error");
            report.error = Some(err.to_string());
        }

        let pending = store.pending_count().await;

        let mut state = self.state.write().await;
        state.is_syncing = false;
        match pending {
            Ok(count) => state.pending_actions = count,
            Err(err) => tracing::error!(error = %err, "Failed to count pending actions"),
        }
        if report.is_complete() {
            state.last_sync = Some(Utc::now());
        }
        state.last_report = Some(report.clone());

        report
    }

    async fn drain(&self, store: &LocalStore, report: &mut DrainReport) -> Result<()> {
        let queue = store.list_pending_actions().await?;
        if queue.is_empty() {
            return Ok(());
        }

        tracing::info!(count = queue.len(), "Syncing pending items");

        // Queued toggles per topic; the server's answer is only cached once the
        // last one for that topic has been delivered.
        let mut toggles_left: HashMap<String, usize> = HashMap::new();
        for action in &queue {
            if let PendingActionKind::TopicComplete { topic_id } = &action.kind {
                *toggles_left.entry(topic_id.clone()).or_default() += 1;
            }
        }

        for action in queue {
            let result = match &action.kind {
                PendingActionKind::TopicComplete { topic_id } => {
                    self.remote.complete_topic(topic_id).await.map(Some)
                }
                PendingActionKind::TimeTrack {
                    topic_id,
                    time_spent,
                } => self
                    .remote
                    .track_time(topic_id, *time_spent)
                    .await
                    .map(|()| None),
                PendingActionKind::Unknown { kind, .. } => {
                    tracing::warn!(id = action.id, kind = %kind, "Skipping queued action of unknown type");
                    report.skipped.push(action.id);
                    continue;
                }
            };
            report.attempted += 1;

            match result {
                Ok(confirmed) => {
                    store.remove_pending_action(action.id).await?;
                    report.delivered += 1;
                    tracing::debug!(id = action.id, action = action.kind.type_name(), "Synced");

                    if let PendingActionKind::TopicComplete { topic_id } = &action.kind {
                        let last_toggle = take_toggle(&mut toggles_left, topic_id);
                        if let (true, Some(response)) = (last_toggle, confirmed) {
                            store
                                .upsert_progress(
                                    topic_id,
                                    &ProgressFields::completed(response.completed),
                                )
                                .await?;
                        }
                    }
                }
                Err(err)
                    if err.is_rejection() && self.rejection_policy == RejectionPolicy::Skip =>
                {
                    tracing::warn!(id = action.id, error = %err, "Server rejected queued action, dropping it");
                    store.remove_pending_action(action.id).await?;
                    report.dropped.push(action.id);
                    if let PendingActionKind::TopicComplete { topic_id } = &action.kind {
                        take_toggle(&mut toggles_left, topic_id);
                        // Undo the optimistic flip the server never applied
                        toggle_cached_completion(store, topic_id).await?;
                    }
                }
                Err(err) => {
                    tracing::warn!(id = action.id, error = %err, "Failed to sync item, stopping pass");
                    report.halted_at = Some(action.id);
                    report.error = Some(err.to_string());
                    break;
                }
            }
        }

        tracing::info!(
            delivered = report.delivered,
            skipped = report.skipped.len(),
            dropped = report.dropped.len(),
            halted = report.halted_at.is_some(),
            "Sync pass finished"
        );
        Ok(())
    }

    /// React to a connectivity change: toast, and drain when coming online
    pub async fn handle_transition(&self, status: NetworkStatus) {
        match status {
            NetworkStatus::Online => {
                tracing::info!("App is online, starting sync");
                self.notifier.notify(BACK_ONLINE_MESSAGE, Severity::Success);
                self.sync_pending().await;
            }
            NetworkStatus::Offline => {
                tracing::info!("App is offline, progress will be saved locally");
                self.notifier.notify(OFFLINE_MESSAGE, Severity::Info);
            }
        }
    }

    /// Follow the connectivity signal: drain once at startup if online, then
    /// handle every transition. Returns when the signal's sender is gone.
    pub async fn run(&self, mut connectivity: watch::Receiver<NetworkStatus>) {
        let initial = *connectivity.borrow_and_update();
        self.follow(initial, connectivity).await;
    }

    /// Spawn [`run`](Self::run) on the monitor this coordinator was built with.
    ///
    /// The starting status is read before this returns, so a change published
    /// right after is handled as a transition.
    pub fn spawn(self: &Arc<Self>) -> JoinHandle<()> {
        let coordinator = Arc::clone(self);
        let mut connectivity = self.monitor.subscribe();
        let initial = *connectivity.borrow_and_update();
        tokio::spawn(async move { coordinator.follow(initial, connectivity).await })
    }

    async fn follow(
        &self,
        mut current: NetworkStatus,
        mut connectivity: watch::Receiver<NetworkStatus>,
    ) {
        if current.is_online() {
            self.sync_pending().await;
        }

        while connectivity.changed().await.is_ok() {
            let next = *connectivity.borrow_and_update();
            if next == current {
                continue;
            }
            current = next;
            self.handle_transition(next).await;
        }

        tracing::debug!("Connectivity signal closed, sync coordinator stopping");
    }
}

/// Flip the cached completion state for `topic_id` and return the stored value
async fn toggle_cached_completion(store: &LocalStore, topic_id: &str) -> Result<bool> {
    let current = store
        .get_progress(topic_id)
        .await?
        .map(|entry| entry.completed)
        .unwrap_or(false);

    store
        .upsert_progress(topic_id, &ProgressFields::completed(!current))
        .await?;

    Ok(store
        .get_progress(topic_id)
        .await?
        .map(|entry| entry.completed)
        .unwrap_or(!current))
}

/// Cache the outcome of a toggle the server applied outside a drain pass.
///
/// With no toggle for the topic still queued the confirmed value is stored.
/// Otherwise the cache holds the state expected once the queue drains, and the
/// delivered toggle flips that expectation.
async fn record_delivered_toggle(store: &LocalStore, topic_id: &str, completed: bool) -> Result<()> {
    let queued_toggles = store
        .list_pending_actions()
        .await?
        .into_iter()
        .filter(|pending| {
            matches!(&pending.kind, PendingActionKind::TopicComplete { topic_id: queued } if queued == topic_id)
        })
        .count();

    if queued_toggles == 0 {
        store
            .upsert_progress(topic_id, &ProgressFields::completed(completed))
            .await
    } else {
        toggle_cached_completion(store, topic_id).await.map(|_| ())
    }
}

/// Count one toggle for `topic_id` as handled; true if it was the last one
fn take_toggle(toggles_left: &mut HashMap<String, usize>, topic_id: &str) -> bool {
    match toggles_left.get_mut(topic_id) {
        Some(left) => {
            *left = left.saturating_sub(1);
            *left == 0
        }
        None => true,
    }
}

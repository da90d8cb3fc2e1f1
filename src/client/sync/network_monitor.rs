//! # Network Monitor
//!
//! Owns the process-wide connectivity signal. The value lives in a `watch`
//! channel: the host (or the built-in reachability probe) pushes changes with
//! [`NetworkMonitor::set_status`], and the coordinator subscribes to them.
//!
//! The signal is advisory. A request that actually fails still counts as a
//! failure even while the monitor says `Online`.

use crate::client::api_client::ReachabilityProbe;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkStatus {
    Online,
    Offline,
}

impl NetworkStatus {
    pub fn from_online(online: bool) -> Self {
        if online {
            Self::Online
        } else {
            Self::Offline
        }
    }

    pub fn is_online(self) -> bool {
        self == Self::Online
    }
}

/// Shared handle to the connectivity signal; clones observe the same value
#[derive(Debug, Clone)]
pub struct NetworkMonitor {
    tx: Arc<watch::Sender<NetworkStatus>>,
}

impl NetworkMonitor {
    pub fn new(initial: NetworkStatus) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    pub fn status(&self) -> NetworkStatus {
        *self.tx.borrow()
    }

    pub fn is_online(&self) -> bool {
        self.status().is_online()
    }

    /// Publish a new status. Returns whether it differed from the previous one;
    /// repeating the current status wakes nobody.
    pub fn set_status(&self, status: NetworkStatus) -> bool {
        let changed = self.tx.send_if_modified(|current| {
            if *current == status {
                false
            } else {
                *current = status;
                true
            }
        });
        if changed {
            tracing::debug!(?status, "Connectivity changed");
        }
        changed
    }

    pub fn subscribe(&self) -> watch::Receiver<NetworkStatus> {
        self.tx.subscribe()
    }

    /// Poll `probe` every `interval` and publish the result.
    ///
    /// Runs until the returned handle is aborted.
    pub fn spawn_probe<P>(&self, probe: Arc<P>, interval: Duration) -> JoinHandle<()>
    where
        P: ReachabilityProbe + ?Sized + 'static,
    {
        let monitor = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                let reachable = probe.is_reachable().await;
                monitor.set_status(NetworkStatus::from_online(reachable));
            }
        })
    }
}

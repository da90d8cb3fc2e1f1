//! Spawned coordinator following the connectivity signal

use crate::common::{Harness, RemoteCall};
use pretty_assertions::assert_eq;
use std::time::Duration;
use studyhub::client::sync::OFFLINE_MESSAGE;
use studyhub::client::{LocalStore, NetworkStatus};

/// Poll until the queue is empty or give up after two seconds
async fn wait_for_empty_queue(store: &LocalStore) {
    tokio::time::timeout(Duration::from_secs(2), async {
        while store.pending_count().await.unwrap() > 0 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("queue was not drained in time");
}

#[tokio::test]
async fn test_reconnect_drains_queue() {
    let mut h = Harness::new(NetworkStatus::Offline).await;
    assert_ok!(h.complete_topic("T1").await);
    assert_ok!(h.track_time("T1", 30).await);

    let task = h.coordinator.spawn();
    h.monitor.set_status(NetworkStatus::Online);

    wait_for_empty_queue(h.store()).await;
    assert_eq!(
        h.remote.calls(),
        vec![
            RemoteCall::Complete("T1".to_string()),
            RemoteCall::Time("T1".to_string(), 30),
        ]
    );
    let online = h.notifications.recv().await.unwrap();
    assert_contains!(online.message, "back online");

    task.abort();
}

#[tokio::test]
async fn test_startup_drain_when_online() {
    let h = Harness::new(NetworkStatus::Offline).await;
    assert_ok!(h.complete_topic("T1").await);
    h.monitor.set_status(NetworkStatus::Online);

    let task = h.coordinator.spawn();

    wait_for_empty_queue(h.store()).await;
    assert!(h.remote.completed("T1"));

    task.abort();
}

#[tokio::test]
async fn test_going_offline_notifies_without_remote_calls() {
    let mut h = Harness::new(NetworkStatus::Online).await;
    let task = h.coordinator.spawn();

    h.monitor.set_status(NetworkStatus::Offline);

    let notification = tokio::time::timeout(Duration::from_secs(2), h.notifications.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(notification.message, OFFLINE_MESSAGE);
    assert_eq!(h.remote.call_count(), 0);

    task.abort();
}

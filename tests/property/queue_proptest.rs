//! Property-based tests for the pending-action queue

use crate::common::TestStore;
use proptest::prelude::*;
use studyhub::shared::PendingActionKind;

fn action_strategy() -> impl Strategy<Value = PendingActionKind> {
    prop_oneof![
        "[a-z0-9]{1,8}".prop_map(|topic| PendingActionKind::topic_complete(topic)),
        ("[a-z0-9]{1,8}", 0i64..10_000)
            .prop_map(|(topic, secs)| PendingActionKind::time_track(topic, secs)),
    ]
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn test_queue_preserves_enqueue_order(actions in prop::collection::vec(action_strategy(), 1..20)) {
        let (ids, pending) = runtime().block_on(async {
            let db = TestStore::new().await;
            let mut ids = Vec::new();
            for action in &actions {
                ids.push(db.store().enqueue_action(action).await.unwrap());
            }
            (ids, db.store().list_pending_actions().await.unwrap())
        });

        prop_assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
        prop_assert_eq!(pending.iter().map(|a| a.id).collect::<Vec<_>>(), ids);
        prop_assert_eq!(pending.into_iter().map(|a| a.kind).collect::<Vec<_>>(), actions);
    }

    #[test]
    fn test_removal_keeps_relative_order(
        actions in prop::collection::vec(action_strategy(), 2..15),
        remove_mask in prop::collection::vec(any::<bool>(), 15),
    ) {
        let (kept, pending) = runtime().block_on(async {
            let db = TestStore::new().await;
            let mut kept = Vec::new();
            for (action, remove) in actions.iter().zip(&remove_mask) {
                let id = db.store().enqueue_action(action).await.unwrap();
                if *remove {
                    db.store().remove_pending_action(id).await.unwrap();
                } else {
                    kept.push(id);
                }
            }
            (kept, db.store().list_pending_actions().await.unwrap())
        });

        prop_assert_eq!(pending.into_iter().map(|a| a.id).collect::<Vec<_>>(), kept);
    }
}

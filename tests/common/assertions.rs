//! Custom assertion macros and utilities
//!
//! Provides assertion macros with more descriptive failure output for the
//! shapes sync tests check over and over.

/// Assert that a result is ok and return the value
#[macro_export]
macro_rules! assert_ok {
    ($result:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
    ($result:expr, $message:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("{}: {:?}", $message, e),
        }
    };
}

/// Assert that a string contains a substring
#[macro_export]
macro_rules! assert_contains {
    ($haystack:expr, $needle:expr) => {
        assert!(
            $haystack.contains($needle),
            "Expected '{}' to contain '{}'",
            $haystack,
            $needle
        );
    };
}

/// Assert that an action outcome was deferred and return its acknowledgement
#[macro_export]
macro_rules! assert_deferred {
    ($outcome:expr) => {
        match $outcome {
            studyhub::client::ActionOutcome::Deferred(ack) => ack,
            studyhub::client::ActionOutcome::Delivered(value) => {
                panic!("Expected action to be deferred, got delivered: {:?}", value)
            }
        }
    };
}

/// Assert the topic ids of the pending queue, in queue order
#[macro_export]
macro_rules! assert_queue_topics {
    ($store:expr, [$($topic:expr),* $(,)?]) => {{
        let pending = $store
            .list_pending_actions()
            .await
            .expect("Failed to list pending actions");
        let topics: Vec<Option<&str>> = pending.iter().map(|action| action.kind.topic_id()).collect();
        let expected: Vec<Option<&str>> = vec![$(Some($topic)),*];
        pretty_assertions::assert_eq!(topics, expected, "Unexpected pending queue");
    }};
}

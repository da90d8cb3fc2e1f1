//! Scripted in-memory remote service
//!
//! Stands in for the progress API. Outcomes are consumed in call order from a
//! script; once the script runs out every call succeeds. Successful calls are
//! applied to an in-memory model of the server so tests can check what the
//! server ended up with.

use futures_util::future::{self, BoxFuture};
use futures_util::FutureExt;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use studyhub::client::{CompletionResponse, RemoteService};
use studyhub::shared::{Result, SyncError};

/// One recorded remote call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteCall {
    Complete(String),
    Time(String, i64),
}

/// Outcome for the next remote call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scripted {
    Ok,
    Network,
    Rejected(u16),
}

#[derive(Default)]
pub struct FakeRemote {
    script: Mutex<VecDeque<Scripted>>,
    calls: Mutex<Vec<RemoteCall>>,
    completed: Mutex<HashMap<String, bool>>,
    time_spent: Mutex<HashMap<String, i64>>,
}

impl FakeRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue outcomes for the next calls
    pub fn script(&self, outcomes: impl IntoIterator<Item = Scripted>) {
        self.script.lock().unwrap().extend(outcomes);
    }

    pub fn calls(&self) -> Vec<RemoteCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Server-side completion state of `topic_id`
    pub fn completed(&self, topic_id: &str) -> bool {
        self.completed
            .lock()
            .unwrap()
            .get(topic_id)
            .copied()
            .unwrap_or(false)
    }

    /// Server-side accumulated study time of `topic_id`
    pub fn time_spent(&self, topic_id: &str) -> i64 {
        self.time_spent
            .lock()
            .unwrap()
            .get(topic_id)
            .copied()
            .unwrap_or(0)
    }

    fn next_outcome(&self, call: RemoteCall) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        match self.script.lock().unwrap().pop_front().unwrap_or(Scripted::Ok) {
            Scripted::Ok => Ok(()),
            Scripted::Network => Err(SyncError::network("connection refused")),
            Scripted::Rejected(status) => Err(SyncError::rejected(status, "Topic not found")),
        }
    }
}

impl RemoteService for FakeRemote {
    fn complete_topic<'a>(&'a self, topic_id: &'a str) -> BoxFuture<'a, Result<CompletionResponse>> {
        let result = self
            .next_outcome(RemoteCall::Complete(topic_id.to_string()))
            .map(|()| {
                let mut completed = self.completed.lock().unwrap();
                let state = completed.entry(topic_id.to_string()).or_insert(false);
                *state = !*state;
                CompletionResponse {
                    success: true,
                    completed: *state,
                }
            });
        future::ready(result).boxed()
    }

    fn track_time<'a>(&'a self, topic_id: &'a str, time_spent: i64) -> BoxFuture<'a, Result<()>> {
        let result = self
            .next_outcome(RemoteCall::Time(topic_id.to_string(), time_spent))
            .map(|()| {
                *self
                    .time_spent
                    .lock()
                    .unwrap()
                    .entry(topic_id.to_string())
                    .or_insert(0) += time_spent;
            });
        future::ready(result).boxed()
    }
}

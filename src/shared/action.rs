//! Deferrable user actions
//!
//! Every state-changing action the coordinator can defer is a variant of
//! [`PendingActionKind`]. On disk an action is stored as its type tag plus a
//! JSON payload using the portal's field names (`topicId`, `timeSpent`).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Type tag for a topic completion toggle
pub const TOPIC_COMPLETE: &str = "TOPIC_COMPLETE";

/// Type tag for a time-tracking increment
pub const TIME_TRACK: &str = "TIME_TRACK";

/// A deferrable action with its typed payload
#[derive(Debug, Clone, PartialEq)]
pub enum PendingActionKind {
    /// Toggle the completion state of a topic
    TopicComplete { topic_id: String },
    /// Add study time (seconds) to a topic
    TimeTrack { topic_id: String, time_spent: i64 },
    /// A stored action this build does not understand
    Unknown { kind: String, payload: Value },
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TopicPayload {
    topic_id: String,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimeTrackPayload {
    topic_id: String,
    time_spent: i64,
}

impl PendingActionKind {
    pub fn topic_complete(topic_id: impl Into<String>) -> Self {
        Self::TopicComplete {
            topic_id: topic_id.into(),
        }
    }

    pub fn time_track(topic_id: impl Into<String>, time_spent: i64) -> Self {
        Self::TimeTrack {
            topic_id: topic_id.into(),
            time_spent,
        }
    }

    /// The stored type tag
    pub fn type_name(&self) -> &str {
        match self {
            Self::TopicComplete { .. } => TOPIC_COMPLETE,
            Self::TimeTrack { .. } => TIME_TRACK,
            Self::Unknown { kind, .. } => kind,
        }
    }

    pub fn topic_id(&self) -> Option<&str> {
        match self {
            Self::TopicComplete { topic_id } | Self::TimeTrack { topic_id, .. } => Some(topic_id),
            Self::Unknown { .. } => None,
        }
    }

    /// The stored JSON payload
    pub fn payload(&self) -> Result<Value, serde_json::Error> {
        match self {
            Self::TopicComplete { topic_id } => serde_json::to_value(TopicPayload {
                topic_id: topic_id.clone(),
            }),
            Self::TimeTrack {
                topic_id,
                time_spent,
            } => serde_json::to_value(TimeTrackPayload {
                topic_id: topic_id.clone(),
                time_spent: *time_spent,
            }),
            Self::Unknown { payload, .. } => Ok(payload.clone()),
        }
    }

    /// Rebuild an action from its stored type tag and payload.
    ///
    /// A known tag whose payload does not match its shape comes back as
    /// `Unknown`, so the row is kept rather than lost.
    pub fn from_parts(kind: &str, payload: Value) -> Self {
        let decoded = match kind {
            TOPIC_COMPLETE => serde_json::from_value::<TopicPayload>(payload.clone())
                .ok()
                .map(|p| Self::TopicComplete {
                    topic_id: p.topic_id,
                }),
            TIME_TRACK => serde_json::from_value::<TimeTrackPayload>(payload.clone())
                .ok()
                .map(|p| Self::TimeTrack {
                    topic_id: p.topic_id,
                    time_spent: p.time_spent,
                }),
            _ => None,
        };

        decoded.unwrap_or_else(|| Self::Unknown {
            kind: kind.to_string(),
            payload,
        })
    }
}

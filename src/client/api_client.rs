//! Study Portal API Client
//!
//! HTTP access to the two progress endpoints the sync layer replays, plus a
//! cheap reachability check used to drive the connectivity signal.
//!
//! - `POST /topics/{id}/complete` toggles completion, answers `{success, completed}`
//! - `POST /topics/{id}/time` with `{"timeSpent": n}` adds study time
//!
//! Any 2xx is success. Any other status becomes `RemoteRejected`; a request
//! that never got a response becomes `NetworkFailure`. Redirects are not
//! followed: an expired session answers `302 /login`, which must not count as
//! an applied change.

use crate::client::config::Config;
use crate::shared::config::ConfigError;
use crate::shared::error::{Result, SyncError};
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use reqwest::{header, redirect, Client, ClientBuilder, RequestBuilder, Response, Url};
use serde::{Deserialize, Serialize};

/// Remote endpoints a queued action can be replayed against
pub trait RemoteService: Send + Sync {
    /// Toggle completion of a topic
    fn complete_topic<'a>(&'a self, topic_id: &'a str) -> BoxFuture<'a, Result<CompletionResponse>>;

    /// Add `time_spent` seconds to a topic
    fn track_time<'a>(&'a self, topic_id: &'a str, time_spent: i64) -> BoxFuture<'a, Result<()>>;
}

/// Something that can tell whether the server answers at all
pub trait ReachabilityProbe: Send + Sync {
    fn is_reachable(&self) -> BoxFuture<'_, bool>;
}

/// Body returned by the completion endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub completed: bool,
}

/// Completion state confirmed by a successful remote call, if it carries one
pub trait ConfirmedCompletion {
    fn confirmed_completion(&self) -> Option<bool>;
}

impl ConfirmedCompletion for CompletionResponse {
    fn confirmed_completion(&self) -> Option<bool> {
        Some(self.completed)
    }
}

impl ConfirmedCompletion for () {
    fn confirmed_completion(&self) -> Option<bool> {
        None
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TimeTrackRequest {
    time_spent: i64,
}

/// reqwest-backed client for the progress endpoints
#[derive(Debug, Clone)]
pub struct ProgressApiClient {
    config: Config,
    client: Client,
}

impl ProgressApiClient {
    pub fn new(config: Config) -> Result<Self> {
        let mut builder = Client::builder().redirect(redirect::Policy::none());
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = build_client(builder)?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn post(&self, url: Url) -> RequestBuilder {
        let request = self
            .client
            .post(url)
            .header(header::ACCEPT, "application/json");
        self.with_session(request)
    }

    fn with_session(&self, request: RequestBuilder) -> RequestBuilder {
        match self.config.session_cookie() {
            Some(cookie) => request.header(header::COOKIE, cookie),
            None => request,
        }
    }

    async fn send_completion(&self, topic_id: &str) -> Result<CompletionResponse> {
        let response = self
            .post(self.config.topic_url(topic_id, "complete")?)
            .header(header::CONTENT_TYPE, "application/json")
            .send()
            .await?;
        let response = ensure_success(response).await?;

        let status = response.status().as_u16();
        response
            .json::<CompletionResponse>()
            .await
            .map_err(|e| SyncError::rejected(status, format!("Failed to parse response: {}", e)))
    }

    async fn send_time(&self, topic_id: &str, time_spent: i64) -> Result<()> {
        let response = self
            .post(self.config.topic_url(topic_id, "time")?)
            .json(&TimeTrackRequest { time_spent })
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn probe(&self) -> bool {
        let request = self.with_session(self.client.get(self.config.probe_url()));
        match request.send().await {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(error = %e, "Reachability probe failed");
                false
            }
        }
    }
}

/// A client that cannot be built is a local setup fault, not a lost response
fn build_client(builder: ClientBuilder) -> Result<Client> {
    builder
        .build()
        .map_err(|e| ConfigError::HttpClient(e.to_string()).into())
}

async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let error_text = response
        .text()
        .await
        .ok()
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| status.to_string());
    Err(SyncError::rejected(status.as_u16(), error_text))
}

impl RemoteService for ProgressApiClient {
    fn complete_topic<'a>(&'a self, topic_id: &'a str) -> BoxFuture<'a, Result<CompletionResponse>> {
        self.send_completion(topic_id).boxed()
    }

    fn track_time<'a>(&'a self, topic_id: &'a str, time_spent: i64) -> BoxFuture<'a, Result<()>> {
        self.send_time(topic_id, time_spent).boxed()
    }
}

impl ReachabilityProbe for ProgressApiClient {
    fn is_reachable(&self) -> BoxFuture<'_, bool> {
        self.probe().boxed()
    }
}

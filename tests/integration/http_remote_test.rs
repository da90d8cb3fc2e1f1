//! Progress API client against a mock HTTP server

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::Duration;
use studyhub::client::{Config, ProgressApiClient, ReachabilityProbe, RemoteService};
use studyhub::shared::{AppConfig, AppConfigBuilder, SyncError};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer, builder: AppConfigBuilder) -> ProgressApiClient {
    let config = Config::with_builder(builder.server_url(server.uri())).unwrap();
    ProgressApiClient::new(config).unwrap()
}

#[tokio::test]
async fn test_complete_topic_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/topics/T1/complete"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "success": true, "completed": true })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, AppConfig::builder());
    let response = client.complete_topic("T1").await.unwrap();

    assert!(response.success);
    assert!(response.completed);
}

#[tokio::test]
async fn test_track_time_sends_camel_case_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/topics/T1/time"))
        .and(body_json(json!({ "timeSpent": 90 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, AppConfig::builder());
    client.track_time("T1", 90).await.unwrap();
}

#[tokio::test]
async fn test_session_cookie_is_forwarded() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/topics/T1/complete"))
        .and(header("cookie", "connect.sid=s%3Aabc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(
        &server,
        AppConfig::builder().session_cookie("connect.sid=s%3Aabc"),
    );
    let response = client.complete_topic("T1").await.unwrap();

    assert!(!response.completed);
}

#[tokio::test]
async fn test_failure_status_is_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/topics/missing/complete"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Topic not found"))
        .mount(&server)
        .await;

    let client = client_for(&server, AppConfig::builder());
    let err = client.complete_topic("missing").await.unwrap_err();

    assert!(err.is_rejection());
    assert_eq!(err.to_string(), "Remote rejected request (404): Topic not found");
}

#[tokio::test]
async fn test_login_redirect_is_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/topics/T1/time"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/login"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>Login</html>"))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server, AppConfig::builder());
    let err = client.track_time("T1", 90).await.unwrap_err();

    assert!(err.is_rejection());
    assert_matches!(err, SyncError::RemoteRejected { status: 302, .. });
}

#[tokio::test]
async fn test_topic_id_is_a_single_path_segment() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/topics/unit%2F3/complete"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "success": true, "completed": true })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, AppConfig::builder());
    let response = client.complete_topic("unit/3").await.unwrap();

    assert!(response.completed);
}

#[tokio::test]
async fn test_timeout_is_network_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let client = client_for(&server, AppConfig::builder().request_timeout_secs(1));
    let err = client.track_time("T1", 5).await.unwrap_err();

    assert!(err.is_network());
}

#[tokio::test]
async fn test_probe_counts_any_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = client_for(&server, AppConfig::builder().probe_path("/health"));

    assert!(client.is_reachable().await);
}

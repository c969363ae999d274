//! Tests for the HTTP client module

use super::*;
use crate::auth::AuthConfig;
use crate::error::Error;
use crate::types::BackoffType;
use reqwest::header::HeaderMap;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> HttpClient {
    let config = HttpClientConfig::builder()
        .base_url(server.uri())
        .no_rate_limit()
        .build();
    HttpClient::with_config(config).unwrap()
}

#[test]
fn test_http_client_config_default() {
    let config = HttpClientConfig::default();
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert_eq!(config.max_retries, 3);
    assert!(config.base_url.is_none());
    assert!(config.rate_limit.is_some());
    assert!(config.auth.is_none());
}

#[test]
fn test_http_client_config_builder() {
    let config = HttpClientConfig::builder()
        .base_url("https://manila.example.com/v2/project")
        .timeout(Duration::from_secs(60))
        .max_retries(5)
        .backoff(
            BackoffType::Linear,
            Duration::from_millis(200),
            Duration::from_secs(30),
        )
        .header("X-OpenStack-Manila-API-Version", "2.7")
        .user_agent("test-agent/1.0")
        .auth(AuthConfig::token("tok"))
        .build();

    assert_eq!(
        config.base_url.as_deref(),
        Some("https://manila.example.com/v2/project")
    );
    assert_eq!(config.timeout, Duration::from_secs(60));
    assert_eq!(config.max_retries, 5);
    assert_eq!(config.backoff_type, BackoffType::Linear);
    assert_eq!(config.initial_backoff, Duration::from_millis(200));
    assert_eq!(config.max_backoff, Duration::from_secs(30));
    assert_eq!(
        config
            .default_headers
            .get("X-OpenStack-Manila-API-Version")
            .map(String::as_str),
        Some("2.7")
    );
    assert_eq!(config.user_agent, "test-agent/1.0");
    assert_eq!(config.auth, AuthConfig::token("tok"));
}

#[test]
fn test_request_config_builder() {
    let config = RequestConfig::new()
        .query("limit", "10")
        .query("offset", "20")
        .header("X-Request-Id", "abc123")
        .header("bad header", "x")
        .json(serde_json::json!({"key": "value"}))
        .ok_codes(&[200, 201])
        .timeout(Duration::from_secs(10))
        .retries(2);

    assert_eq!(
        config.query,
        vec![
            ("limit".to_string(), "10".to_string()),
            ("offset".to_string(), "20".to_string())
        ]
    );
    assert_eq!(config.headers.get("X-Request-Id").unwrap(), "abc123");
    assert_eq!(config.headers.len(), 1);
    assert!(config.body.is_some());
    assert_eq!(config.ok_codes, vec![200, 201]);
    assert_eq!(config.timeout, Some(Duration::from_secs(10)));
    assert_eq!(config.max_retries, Some(2));
}

#[tokio::test]
async fn test_http_client_get() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/shares"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "shares": [{"id": "1", "name": "alpha"}]
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let response = client.get("/shares").await.unwrap();

    assert_eq!(response.status, 200);
    let body: serde_json::Value = response.json().unwrap();
    assert_eq!(body["shares"][0]["name"], "alpha");
}

#[tokio::test]
async fn test_http_client_post_json_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/shares"))
        .and(body_json(serde_json::json!({"share": {"size": 1}})))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "share": {"id": "abc"}
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let response = client
        .post("/shares", serde_json::json!({"share": {"size": 1}}))
        .await
        .unwrap();

    assert_eq!(response.status, 201);
}

#[tokio::test]
async fn test_http_client_ok_codes() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/shares/abc"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client
        .request(
            crate::types::Method::DELETE,
            "/shares/abc",
            RequestConfig::new().ok_codes(&[202]),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, Error::HttpStatus { status: 200, .. }));
}

#[tokio::test]
async fn test_http_client_query_params() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/share-networks"))
        .and(query_param("name", "net"))
        .and(query_param("limit", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "share_networks": []
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let response = client
        .get_with_config(
            "/share-networks",
            RequestConfig::new().query("name", "net").query("limit", "2"),
        )
        .await
        .unwrap();

    assert_eq!(response.status, 200);
}

#[tokio::test]
async fn test_http_client_default_headers_and_auth() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/shares"))
        .and(header("X-OpenStack-Manila-API-Version", "2.7"))
        .and(header("X-Auth-Token", "secret123"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let config = HttpClientConfig::builder()
        .base_url(mock_server.uri())
        .header("X-OpenStack-Manila-API-Version", "2.7")
        .auth(AuthConfig::token("secret123"))
        .no_rate_limit()
        .build();

    let client = HttpClient::with_config(config).unwrap();
    let response = client.get("/shares").await.unwrap();

    assert_eq!(response.status, 200);
}

#[tokio::test]
async fn test_transport_get_passes_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/shares"))
        .and(header("X-Request-Id", "req-456"))
        .respond_with(ResponseTemplate::new(200).insert_header("X-Compute-Request-Id", "r1"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let mut headers = HeaderMap::new();
    headers.insert("X-Request-Id", "req-456".parse().unwrap());

    let url = format!("{}/shares", mock_server.uri());
    let response = Transport::get(&client, &url, &headers).await.unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.headers.get("X-Compute-Request-Id").unwrap(), "r1");
    assert_eq!(response.url.path(), "/shares");
}

#[tokio::test]
async fn test_http_client_404_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/shares/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not found"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client.get("/shares/missing").await.unwrap_err();

    assert!(matches!(err, Error::HttpStatus { status: 404, .. }));
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_http_client_retry_on_500() {
    let mock_server = MockServer::start().await;

    // First two calls return 500, third succeeds
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
        .mount(&mock_server)
        .await;

    let config = HttpClientConfig::builder()
        .base_url(mock_server.uri())
        .max_retries(3)
        .backoff(
            BackoffType::Constant,
            Duration::from_millis(10),
            Duration::from_secs(1),
        )
        .no_rate_limit()
        .build();

    let client = HttpClient::with_config(config).unwrap();
    let response = client.get("/flaky").await.unwrap();

    assert_eq!(response.status, 200);
}

#[tokio::test]
async fn test_http_client_max_retries_exceeded() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/always-fail"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Server error"))
        .expect(3)
        .mount(&mock_server)
        .await;

    let config = HttpClientConfig::builder()
        .base_url(mock_server.uri())
        .max_retries(2)
        .backoff(
            BackoffType::Constant,
            Duration::from_millis(10),
            Duration::from_secs(1),
        )
        .no_rate_limit()
        .build();

    let client = HttpClient::with_config(config).unwrap();
    let err = client.get("/always-fail").await.unwrap_err();

    assert!(matches!(err, Error::HttpStatus { status: 500, .. }));
}

#[tokio::test]
async fn test_http_client_full_url() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/test"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let config = HttpClientConfig::builder().no_rate_limit().build();
    let client = HttpClient::with_config(config).unwrap();

    let response = client
        .get(&format!("{}/api/test", mock_server.uri()))
        .await
        .unwrap();
    assert_eq!(response.status, 200);
}

fn backoff_client(backoff_type: BackoffType, max: Duration) -> HttpClient {
    let config = HttpClientConfig::builder()
        .backoff(backoff_type, Duration::from_millis(100), max)
        .no_rate_limit()
        .build();
    HttpClient::with_config(config).unwrap()
}

#[test]
fn test_calculate_backoff_constant() {
    let client = backoff_client(BackoffType::Constant, Duration::from_secs(10));

    assert_eq!(client.calculate_backoff(0), Duration::from_millis(100));
    assert_eq!(client.calculate_backoff(5), Duration::from_millis(100));
}

#[test]
fn test_calculate_backoff_linear() {
    let client = backoff_client(BackoffType::Linear, Duration::from_secs(10));

    assert_eq!(client.calculate_backoff(0), Duration::from_millis(100));
    assert_eq!(client.calculate_backoff(1), Duration::from_millis(200));
    assert_eq!(client.calculate_backoff(2), Duration::from_millis(300));
}

#[test]
fn test_calculate_backoff_exponential() {
    let client = backoff_client(BackoffType::Exponential, Duration::from_secs(10));

    assert_eq!(client.calculate_backoff(0), Duration::from_millis(100));
    assert_eq!(client.calculate_backoff(1), Duration::from_millis(200));
    assert_eq!(client.calculate_backoff(3), Duration::from_millis(800));
}

#[test]
fn test_calculate_backoff_respects_max() {
    let client = backoff_client(BackoffType::Exponential, Duration::from_millis(500));
    assert_eq!(client.calculate_backoff(10), Duration::from_millis(500));
}

#[test]
fn test_http_client_debug_redacts_token() {
    let config = HttpClientConfig::builder()
        .auth(AuthConfig::token("very-secret"))
        .build();
    let client = HttpClient::with_config(config).unwrap();
    let debug_str = format!("{client:?}");
    assert!(debug_str.contains("HttpClient"));
    assert!(!debug_str.contains("very-secret"));
    assert!(client.has_rate_limiter());
}

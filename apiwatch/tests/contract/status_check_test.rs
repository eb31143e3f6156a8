//! Contract Test: GET /status/check

use crate::support::status::{build_app, build_app_with_tokens, get_json, mount_endpoint, provider, TEST_TOKEN};
use apiwatch::token::ClientCredentialsTokenProvider;
use axum::http::StatusCode;
use std::sync::Arc;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_status_check_response_shape() {
    let mock = MockServer::start().await;
    mount_endpoint(&mock, "/customers", 200, 150).await;
    mount_endpoint(&mock, "/orders", 404, 100).await;
    mount_endpoint(&mock, "/invoices", 200, 200).await;

    let test = build_app(
        vec![provider(
            "erp",
            &mock.uri(),
            &[
                ("customers", "/customers"),
                ("orders", "/orders"),
                ("invoices", "/invoices"),
            ],
        )],
        None,
    )
    .await;

    let (status, headers, body) = get_json(&test.app, "/status/check", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        headers.get("cache-control").unwrap(),
        "no-store, max-age=0"
    );

    assert_eq!(body["overallStatus"], "degraded");
    assert!(body["lastUpdated"].is_string());
    assert!(body.get("cached").is_none());

    let api = &body["apis"][0];
    assert_eq!(api["id"], "erp");
    assert_eq!(api["name"], "erp API");
    assert_eq!(api["status"], "degraded");
    assert_eq!(api["uptime"], 100.0);
    assert!(api["responseTime"].as_u64().unwrap() >= 150);
    assert!(api["lastChecked"].is_string());

    let endpoints = api["endpoints"].as_array().unwrap();
    let ids: Vec<&str> = endpoints.iter().map(|e| e["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["customers", "orders", "invoices"]);
    assert_eq!(endpoints[0]["status"], "operational");
    assert_eq!(endpoints[0]["url"], "/customers");
    assert!(endpoints[0].get("error").is_none());
    assert_eq!(endpoints[1]["status"], "degraded");
    assert_eq!(endpoints[1]["error"], "HTTP 404");
    assert_eq!(endpoints[2]["status"], "operational");
}

#[tokio::test]
async fn test_status_check_sends_bearer_token() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ping"))
        .and(header("authorization", format!("Bearer {TEST_TOKEN}").as_str()))
        .and(header("user-agent", "OryonAI-StatusMonitor/1.0"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock)
        .await;

    let test = build_app(vec![provider("erp", &mock.uri(), &[("ping", "/ping")])], None).await;

    let (status, _, body) = get_json(&test.app, "/status/check", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["overallStatus"], "operational");
}

#[tokio::test]
async fn test_token_failure_reports_failed_to_check() {
    let mock = MockServer::start().await;
    mount_endpoint(&mock, "/a", 200, 0).await;

    let test = build_app_with_tokens(
        vec![provider("erp", &mock.uri(), &[("a", "/a"), ("b", "/b")])],
        None,
        Arc::new(ClientCredentialsTokenProvider::new(reqwest::Client::new(), None)),
    )
    .await;

    let (status, _, body) = get_json(&test.app, "/status/check", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["overallStatus"], "outage");

    let api = &body["apis"][0];
    assert_eq!(api["status"], "outage");
    assert_eq!(api["uptime"], 0.0);
    assert!(api.get("responseTime").is_none());
    for endpoint in api["endpoints"].as_array().unwrap() {
        assert_eq!(endpoint["status"], "outage");
        assert_eq!(endpoint["error"], "Failed to check");
    }
}

#[tokio::test]
async fn test_failed_run_serves_cached_snapshot() {
    let mock = MockServer::start().await;
    mount_endpoint(&mock, "/a", 200, 0).await;

    let test = build_app(vec![provider("erp", &mock.uri(), &[("a", "/a")])], None).await;

    let (status, _, fresh) = get_json(&test.app, "/status/check", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(fresh.get("cached").is_none());

    // ステータスログが使えなくなるとチェックは失敗する
    test.pool.close().await;

    let (status, headers, cached) = get_json(&test.app, "/status/check", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers.get("cache-control").unwrap(), "no-store, max-age=0");
    assert_eq!(cached["cached"], true);
    assert_eq!(cached["lastUpdated"], fresh["lastUpdated"]);
    assert_eq!(cached["apis"], fresh["apis"]);
    assert_eq!(cached["overallStatus"], fresh["overallStatus"]);
}

#[tokio::test]
async fn test_failed_run_without_cache_is_500() {
    let mock = MockServer::start().await;
    mount_endpoint(&mock, "/a", 200, 0).await;

    let test = build_app(vec![provider("erp", &mock.uri(), &[("a", "/a")])], None).await;
    test.pool.close().await;

    let (status, _, body) = get_json(&test.app, "/status/check", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to check API health");
    assert!(body["details"].as_str().unwrap().contains("Status log"));
}

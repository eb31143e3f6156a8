//! Contract Test: GET /cron/status-check

use crate::support::status::{build_app, get_json, mount_endpoint, provider};
use axum::http::StatusCode;
use wiremock::MockServer;

#[tokio::test]
async fn test_cron_requires_matching_secret() {
    let mock = MockServer::start().await;
    mount_endpoint(&mock, "/a", 200, 0).await;
    let test = build_app(
        vec![provider("erp", &mock.uri(), &[("a", "/a")])],
        Some("cron-secret"),
    )
    .await;

    let (status, _, body) = get_json(&test.app, "/cron/status-check", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Unauthorized - Invalid cron secret");

    let (status, _, _) =
        get_json(&test.app, "/cron/status-check", Some("Bearer wrong")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_cron_without_configured_secret_always_rejects() {
    let mock = MockServer::start().await;
    let test = build_app(vec![provider("erp", &mock.uri(), &[("a", "/a")])], None).await;

    let (status, _, _) = get_json(&test.app, "/cron/status-check", Some("Bearer anything")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_cron_runs_status_check() {
    let mock = MockServer::start().await;
    mount_endpoint(&mock, "/a", 200, 0).await;
    mount_endpoint(&mock, "/b", 200, 0).await;
    let test = build_app(
        vec![
            provider("erp", &mock.uri(), &[("a", "/a")]),
            provider("payroll", &mock.uri(), &[("b", "/b")]),
        ],
        Some("cron-secret"),
    )
    .await;

    let (status, headers, body) =
        get_json(&test.app, "/cron/status-check", Some("Bearer cron-secret")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers.get("cache-control").unwrap(), "no-store, max-age=0");
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Status check completed");
    assert_eq!(body["overallStatus"], "operational");
    assert_eq!(body["checkedApis"], 2);
    assert!(body["timestamp"].is_string());

    // cron経由の実行も前回成功結果として記録される
    assert!(test.state.gate.last_good().is_some());
}

#[tokio::test]
async fn test_cron_failure_is_500() {
    let mock = MockServer::start().await;
    mount_endpoint(&mock, "/a", 200, 0).await;
    let test = build_app(
        vec![provider("erp", &mock.uri(), &[("a", "/a")])],
        Some("cron-secret"),
    )
    .await;
    test.pool.close().await;

    let (status, _, body) =
        get_json(&test.app, "/cron/status-check", Some("Bearer cron-secret")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());
}

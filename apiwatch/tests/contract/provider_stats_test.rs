//! Contract Test: GET /status/providers/:id/stats

use crate::support::status::{build_app, get_json, mount_endpoint, provider};
use apiwatch::db::StatusLogStore;
use apiwatch::types::{HealthStatus, StatusLogEntry};
use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::Value;
use wiremock::MockServer;

fn entry(status: HealthStatus, response_time_ms: u64, minutes_ago: i64) -> StatusLogEntry {
    StatusLogEntry {
        provider_id: "erp".into(),
        provider_name: "erp API".into(),
        status,
        response_time_ms,
        checked_at: Utc::now() - Duration::minutes(minutes_ago),
    }
}

#[tokio::test]
async fn test_unknown_provider_is_404() {
    let mock = MockServer::start().await;
    let test = build_app(vec![provider("erp", &mock.uri(), &[("a", "/a")])], None).await;

    let (status, _, body) = get_json(&test.app, "/status/providers/nope/stats", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not found");
}

#[tokio::test]
async fn test_no_history_is_null() {
    let mock = MockServer::start().await;
    let test = build_app(vec![provider("erp", &mock.uri(), &[("a", "/a")])], None).await;

    let (status, _, body) = get_json(&test.app, "/status/providers/erp/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::Null);
}

#[tokio::test]
async fn test_stats_cover_requested_window() {
    let mock = MockServer::start().await;
    let test = build_app(vec![provider("erp", &mock.uri(), &[("a", "/a")])], None).await;

    test.pool.append(&entry(HealthStatus::Operational, 100, 5)).await.unwrap();
    test.pool.append(&entry(HealthStatus::Degraded, 7_000, 10)).await.unwrap();
    test.pool.append(&entry(HealthStatus::Operational, 200, 20)).await.unwrap();
    test.pool.append(&entry(HealthStatus::Outage, 0, 120)).await.unwrap();

    let (status, _, body) = get_json(&test.app, "/status/providers/erp/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["apiId"], "erp");
    assert_eq!(body["apiName"], "erp API");
    assert_eq!(body["totalCalls"], 3);
    assert_eq!(body["successfulCalls"], 2);
    assert_eq!(body["uptime"], 66.67);
    assert_eq!(body["avgResponseTime"], 2433);
    assert_eq!(body["timeRange"], "Last 60 minutes");

    let (_, _, wide) =
        get_json(&test.app, "/status/providers/erp/stats?minutes=180", None).await;
    assert_eq!(wide["totalCalls"], 4);
    assert_eq!(wide["timeRange"], "Last 180 minutes");
}

#[tokio::test]
async fn test_non_positive_window_is_400() {
    let mock = MockServer::start().await;
    let test = build_app(vec![provider("erp", &mock.uri(), &[("a", "/a")])], None).await;

    let (status, _, _) =
        get_json(&test.app, "/status/providers/erp/stats?minutes=0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_out_of_range_window_is_400() {
    let mock = MockServer::start().await;
    let test = build_app(vec![provider("erp", &mock.uri(), &[("a", "/a")])], None).await;

    for minutes in ["1000000000000", "9223372036854775807"] {
        let uri = format!("/status/providers/erp/stats?minutes={minutes}");
        let (status, _, body) = get_json(&test.app, &uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "minutes={minutes}");
        assert_eq!(body["error"], "Request error");
    }
}

#[tokio::test]
async fn test_status_check_feeds_stats() {
    let mock = MockServer::start().await;
    mount_endpoint(&mock, "/a", 200, 0).await;
    let test = build_app(vec![provider("erp", &mock.uri(), &[("a", "/a")])], None).await;

    get_json(&test.app, "/status/check", None).await;
    get_json(&test.app, "/status/check", None).await;

    let (_, _, body) = get_json(&test.app, "/status/providers/erp/stats", None).await;
    assert_eq!(body["totalCalls"], 2);
    assert_eq!(body["successfulCalls"], 2);
    assert_eq!(body["uptime"], 100.0);
}

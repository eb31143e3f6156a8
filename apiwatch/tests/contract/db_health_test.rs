//! Contract Test: GET /health/db

use crate::support::status::{build_app, get_json, provider};
use axum::http::StatusCode;

#[tokio::test]
async fn test_db_health_ok() {
    let test = build_app(vec![provider("erp", "http://127.0.0.1:1", &[("a", "/a")])], None).await;

    let (status, _, body) = get_json(&test.app, "/health/db", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert!(body["durationMs"].is_u64());
}

#[tokio::test]
async fn test_db_health_reports_failure() {
    let test = build_app(vec![provider("erp", "http://127.0.0.1:1", &[("a", "/a")])], None).await;
    test.pool.close().await;

    let (status, _, body) = get_json(&test.app, "/health/db", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["ok"], false);
    assert!(body["error"].is_string());
}

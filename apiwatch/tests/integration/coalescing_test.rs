//! Integration Test: 同時リクエストの共有
//!
//! 実ソケット経由で同時に届いた `/status/check` が1回のチェックを共有することを確認する。

use crate::support::http::spawn_app;
use crate::support::status::{build_app, mount_endpoint, provider};
use apiwatch::db::StatusLogStore;
use serde_json::Value;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_concurrent_requests_share_single_check() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(300)))
        .expect(1)
        .mount(&mock)
        .await;

    let test = build_app(vec![provider("erp", &mock.uri(), &[("slow", "/slow")])], None).await;
    let server = spawn_app(test.app.clone()).await;
    let client = reqwest::Client::new();
    let url = server.url("/status/check");

    let fetch = || async {
        client
            .get(&url)
            .send()
            .await
            .unwrap()
            .json::<Value>()
            .await
            .unwrap()
    };
    let (a, b, c) = tokio::join!(fetch(), fetch(), fetch());

    assert_eq!(a["lastUpdated"], b["lastUpdated"]);
    assert_eq!(b["lastUpdated"], c["lastUpdated"]);
    assert_eq!(a["overallStatus"], "operational");
    assert_eq!(test.pool.query_recent("erp", 10).await.unwrap().len(), 1);
    assert!(!test.state.gate.is_running());

    server.stop().await;
    mock.verify().await;
}

#[tokio::test]
async fn test_sequential_requests_run_fresh_checks() {
    let mock = MockServer::start().await;
    mount_endpoint(&mock, "/a", 200, 0).await;

    let test = build_app(vec![provider("erp", &mock.uri(), &[("a", "/a")])], None).await;
    let server = spawn_app(test.app.clone()).await;
    let client = reqwest::Client::new();

    for _ in 0..2 {
        let response = client.get(server.url("/status/check")).send().await.unwrap();
        assert!(response.status().is_success());
    }

    assert_eq!(test.pool.query_recent("erp", 10).await.unwrap().len(), 2);
    server.stop().await;
}

#[tokio::test]
async fn test_uptime_reflects_history_before_current_run() {
    let mock = MockServer::start().await;
    // 最初の1回だけ失敗させ、以降は成功させる
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&mock)
        .await;
    mount_endpoint(&mock, "/flaky", 200, 0).await;

    let test = build_app(vec![provider("erp", &mock.uri(), &[("flaky", "/flaky")])], None).await;
    let server = spawn_app(test.app.clone()).await;
    let client = reqwest::Client::new();
    let url = server.url("/status/check");

    let first: Value = client.get(&url).send().await.unwrap().json().await.unwrap();
    assert_eq!(first["apis"][0]["status"], "outage");
    assert_eq!(first["apis"][0]["uptime"], 100.0);

    let second: Value = client.get(&url).send().await.unwrap().json().await.unwrap();
    assert_eq!(second["apis"][0]["status"], "operational");
    assert_eq!(second["apis"][0]["uptime"], 0.0);

    let third: Value = client.get(&url).send().await.unwrap().json().await.unwrap();
    assert_eq!(third["apis"][0]["uptime"], 50.0);

    server.stop().await;
}

//! Integration Test: 定期ステータスチェック

use crate::support::status::{create_test_db_pool, mount_endpoint, provider, TEST_TOKEN};
use apiwatch::bootstrap::{assemble, start_scheduler};
use apiwatch::config::StatusCheckConfig;
use apiwatch::db::StatusLogStore;
use apiwatch::registry::ProviderRegistry;
use apiwatch::token::StaticTokenProvider;
use std::sync::Arc;
use std::time::Duration;
use wiremock::MockServer;

#[tokio::test]
async fn test_scheduler_runs_checks_until_shutdown() {
    let mock = MockServer::start().await;
    mount_endpoint(&mock, "/a", 200, 0).await;

    let pool = create_test_db_pool().await;
    let registry =
        ProviderRegistry::new(vec![provider("erp", &mock.uri(), &[("a", "/a")])]).unwrap();
    let config = StatusCheckConfig::default()
        .with_probe_timeout(Duration::from_secs(5))
        .with_check_interval(Some(Duration::from_millis(100)));

    let ctx = assemble(
        registry,
        Arc::new(StaticTokenProvider::new(TEST_TOKEN)),
        Arc::new(pool.clone()),
        reqwest::Client::new(),
        config,
        None,
    );

    let handle = start_scheduler(&ctx).expect("scheduler should start when interval is set");
    tokio::time::sleep(Duration::from_millis(350)).await;

    ctx.state.shutdown.request_shutdown();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("scheduler did not stop")
        .unwrap();

    let runs = pool.query_recent("erp", 100).await.unwrap().len();
    assert!(runs >= 2, "expected repeated checks, got {runs}");
    assert!(ctx.state.gate.last_good().is_some());
}

#[tokio::test]
async fn test_scheduler_disabled_without_interval() {
    let pool = create_test_db_pool().await;
    let registry =
        ProviderRegistry::new(vec![provider("erp", "http://127.0.0.1:1", &[("a", "/a")])])
            .unwrap();

    let ctx = assemble(
        registry,
        Arc::new(StaticTokenProvider::new(TEST_TOKEN)),
        Arc::new(pool),
        reqwest::Client::new(),
        StatusCheckConfig::default(),
        None,
    );

    assert!(start_scheduler(&ctx).is_none());
}

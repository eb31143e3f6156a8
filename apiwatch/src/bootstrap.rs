//! サーバー初期化ロジック
//!
//! データベース接続、レジストリ・トークン取得・ヘルスチェックエンジンの組み立てを担当する。
//! `serve`と`check`の両サブコマンドが同じ初期化を使う。

use crate::common::error::StatusResult;
use crate::config::{get_cron_secret, get_database_url, StatusCheckConfig};
use crate::db::{migrations, StatusLogStore};
use crate::health::{
    EndpointProber, ProviderHealthAggregator, StatusGate, StatusOrchestrator, StatusScheduler,
};
use crate::registry::ProviderRegistry;
use crate::shutdown::ShutdownController;
use crate::token::{token_provider_from_env, TokenProvider};
use crate::AppState;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// 初期化結果
pub struct InitContext {
    /// アプリケーション状態
    pub state: AppState,
    /// 1回分のチェックを直接実行するオーケストレーター
    pub orchestrator: Arc<StatusOrchestrator>,
    /// ステータスチェック設定
    pub config: StatusCheckConfig,
}

/// 共有HTTPクライアント（接続プーリング有効）を作成
pub fn build_http_client() -> StatusResult<reqwest::Client> {
    let client = reqwest::Client::builder()
        .pool_max_idle_per_host(32)
        .pool_idle_timeout(Duration::from_secs(60))
        .tcp_keepalive(Duration::from_secs(30))
        .build()?;
    Ok(client)
}

/// 依存コンポーネントからエンジンと`AppState`を組み立てる
pub fn assemble(
    registry: ProviderRegistry,
    tokens: Arc<dyn TokenProvider>,
    status_log: Arc<dyn StatusLogStore>,
    http_client: reqwest::Client,
    config: StatusCheckConfig,
    cron_secret: Option<String>,
) -> InitContext {
    let prober = EndpointProber::new(http_client, &config);
    let aggregator =
        ProviderHealthAggregator::new(prober, tokens, Arc::clone(&status_log), &config);
    let orchestrator = Arc::new(StatusOrchestrator::new(registry.clone(), aggregator));
    let gate = StatusGate::new(orchestrator.clone());

    let state = AppState {
        gate,
        registry,
        status_log,
        cron_secret,
        shutdown: ShutdownController::default(),
    };

    InitContext {
        state,
        orchestrator,
        config,
    }
}

/// 環境変数から全コンポーネントを初期化する
pub async fn initialize() -> StatusResult<InitContext> {
    info!("API status monitor v{}", env!("CARGO_PKG_VERSION"));

    let config = StatusCheckConfig::from_env();
    let database_url = get_database_url();
    let db_pool = migrations::initialize_database(&database_url).await?;
    info!("Status log initialized at {}", database_url);

    let registry = ProviderRegistry::builtin()?;
    info!(
        providers = registry.len(),
        endpoints = registry
            .list()
            .iter()
            .map(|p| p.endpoints.len())
            .sum::<usize>(),
        "Provider registry loaded"
    );

    let http_client = build_http_client()?;
    let tokens = token_provider_from_env(http_client.clone());

    let cron_secret = get_cron_secret();
    if cron_secret.is_none() {
        info!("APIWATCH_CRON_SECRET is not set; /cron/status-check will reject every request");
    }

    Ok(assemble(
        registry,
        tokens,
        Arc::new(db_pool),
        http_client,
        config,
        cron_secret,
    ))
}

/// 設定されていれば定期チェックを開始する
pub fn start_scheduler(ctx: &InitContext) -> Option<tokio::task::JoinHandle<()>> {
    let interval = ctx.config.check_interval?;
    let scheduler = StatusScheduler::new(
        ctx.state.gate.clone(),
        interval,
        ctx.state.shutdown.clone(),
    );
    Some(scheduler.start())
}

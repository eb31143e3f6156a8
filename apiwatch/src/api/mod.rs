//! REST APIハンドラー
//!
//! ステータスチェック、cronトリガー、統計、ストレージ疎通確認

pub mod cron;
pub mod error;
pub mod health;
pub mod status;

use crate::AppState;
use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

/// APIルーターを作成
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/status/check", get(status::check_status))
        .route(
            "/status/providers/:id/stats",
            get(status::provider_stats),
        )
        .route("/cron/status-check", get(cron::run_status_check))
        .route("/health/db", get(health::database_health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

//! ステータスAPI
//!
//! `GET /status/check` と プロバイダー別統計

use super::error::AppError;
use crate::common::error::{CommonError, StatusError};
use crate::db::status_log::summarize_statistics;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{Duration, Utc};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

/// HTTPキャッシュを無効化するヘッダー
pub(crate) const NO_STORE: [(header::HeaderName, &str); 1] =
    [(header::CACHE_CONTROL, "no-store, max-age=0")];

/// 統計の既定集計期間（分）
const DEFAULT_STATS_MINUTES: i64 = 60;

/// GET /status/check
///
/// 実行中のチェックがあればその結果を共有し、失敗時は前回成功結果を返す。
pub async fn check_status(State(state): State<AppState>) -> Response {
    match state.gate.get_status().await {
        Ok(snapshot) => (NO_STORE, Json(&*snapshot)).into_response(),
        Err(e) => {
            error!(error = %e, "Status check failed with no cached snapshot");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                NO_STORE,
                Json(json!({
                    "error": "Failed to check API health",
                    "details": e.to_string(),
                })),
            )
                .into_response()
        }
    }
}

/// 統計クエリ
#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    /// 集計期間（分）
    pub minutes: Option<i64>,
}

/// GET /status/providers/:id/stats
///
/// 直近N分間のログから統計を返す。履歴が無ければ`null`。
pub async fn provider_stats(
    State(state): State<AppState>,
    Path(provider_id): Path<String>,
    Query(query): Query<StatsQuery>,
) -> Result<Response, AppError> {
    let minutes = query.minutes.unwrap_or(DEFAULT_STATS_MINUTES);
    if minutes <= 0 {
        return Err(CommonError::Validation("minutes must be positive".to_string()).into());
    }

    let provider = state
        .registry
        .get(&provider_id)
        .ok_or_else(|| StatusError::NotFound(format!("provider '{provider_id}'")))?;

    let since = Duration::try_minutes(minutes)
        .and_then(|window| Utc::now().checked_sub_signed(window))
        .ok_or_else(|| CommonError::Validation("minutes is out of range".to_string()))?;
    let entries = state
        .status_log
        .query_since(&provider.id, since)
        .await
        .map_err(StatusError::from)?;

    let stats = summarize_statistics(
        &provider.id,
        &provider.name,
        &entries,
        &format!("Last {minutes} minutes"),
    );

    Ok(Json(stats).into_response())
}

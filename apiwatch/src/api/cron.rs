//! cronトリガーAPI
//!
//! 外部スケジューラーから定期的に呼ばれ、`/status/check`と同じゲートでチェックを実行する。

use super::status::NO_STORE;
use crate::AppState;
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde_json::json;
use tracing::{error, info, warn};

/// `Authorization: Bearer <secret>`が一致するか
fn is_authorized(headers: &HeaderMap, secret: Option<&str>) -> bool {
    let Some(secret) = secret else {
        return false;
    };
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .is_some_and(|token| token == secret)
}

/// GET /cron/status-check
pub async fn run_status_check(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if !is_authorized(&headers, state.cron_secret.as_deref()) {
        warn!("Rejected cron request with invalid secret");
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Unauthorized - Invalid cron secret" })),
        )
            .into_response();
    }

    match state.gate.get_status().await {
        Ok(snapshot) => {
            info!(
                status = %snapshot.overall_status,
                providers = snapshot.apis.len(),
                "Cron status check completed"
            );
            (
                NO_STORE,
                Json(json!({
                    "success": true,
                    "message": "Status check completed",
                    "timestamp": Utc::now(),
                    "overallStatus": snapshot.overall_status,
                    "checkedApis": snapshot.apis.len(),
                })),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "Cron status check failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                NO_STORE,
                Json(json!({
                    "success": false,
                    "error": e.to_string(),
                    "timestamp": Utc::now(),
                })),
            )
                .into_response()
        }
    }
}

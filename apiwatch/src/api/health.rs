//! ストレージ疎通確認API

use crate::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::time::Instant;
use tracing::error;

/// GET /health/db
pub async fn database_health(State(state): State<AppState>) -> Response {
    let started = Instant::now();
    let result = state.status_log.ping().await;
    let duration_ms = started.elapsed().as_millis() as u64;

    match result {
        Ok(()) => Json(json!({ "ok": true, "durationMs": duration_ms })).into_response(),
        Err(e) => {
            error!(error = %e, "Status log health check failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "ok": false,
                    "durationMs": duration_ms,
                    "error": e.to_string(),
                })),
            )
                .into_response()
        }
    }
}

//! APIエラーレスポンス型
//!
//! axum用の共通エラーハンドリング

use crate::common::error::StatusError;
use axum::{response::IntoResponse, Json};
use serde_json::json;
use tracing::debug;

/// Axum用のエラーレスポンス型
#[derive(Debug)]
pub struct AppError(pub StatusError);

impl From<StatusError> for AppError {
    fn from(err: StatusError) -> Self {
        AppError(err)
    }
}

impl From<crate::common::error::CommonError> for AppError {
    fn from(err: crate::common::error::CommonError) -> Self {
        AppError(StatusError::Common(err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        // Use external_message() so upstream URLs and database paths stay in the server logs
        debug!(error = %self.0, "Request failed");
        let payload = json!({
            "error": self.0.external_message()
        });

        (self.0.status_code(), Json(payload)).into_response()
    }
}

//! エラー型定義
//!
//! 統一エラー型（thiserror使用）
//!
//! `StatusError`は`Clone`可能で、実行中チェックの結果を待機中の全呼び出し元に
//! そのまま配布できる。外部向けには`external_message()`と`status_code()`を使う。

use axum::http::StatusCode;
use thiserror::Error;

/// Common layer error type
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CommonError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<serde_json::Error> for CommonError {
    fn from(err: serde_json::Error) -> Self {
        CommonError::Serialization(err.to_string())
    }
}

/// ステータスチェックのエラー型
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StatusError {
    /// Common layer error
    #[error(transparent)]
    Common(#[from] CommonError),

    /// Bearer token acquisition failed
    #[error("Token error: {0}")]
    Token(String),

    /// Status log store read/write failed
    #[error("Status log error: {0}")]
    StatusLog(String),

    /// HTTP client error
    #[error("HTTP client error: {0}")]
    Http(String),

    /// Endpoint sweep aborted unexpectedly
    #[error("Endpoint sweep failed: {0}")]
    Sweep(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller is not authorized
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sqlx::Error> for StatusError {
    fn from(err: sqlx::Error) -> Self {
        StatusError::StatusLog(err.to_string())
    }
}

impl From<reqwest::Error> for StatusError {
    fn from(err: reqwest::Error) -> Self {
        StatusError::Http(err.to_string())
    }
}

impl StatusError {
    /// Returns a safe error message for external clients.
    ///
    /// Full details (upstream URLs, database paths) stay in server logs via
    /// the `Display` implementation.
    pub fn external_message(&self) -> &'static str {
        match self {
            Self::Common(_) => "Request error",
            Self::Token(_) => "Upstream authentication failed",
            Self::StatusLog(_) => "Status log unavailable",
            Self::Http(_) => "Upstream service unavailable",
            Self::Sweep(_) => "Health check failed",
            Self::NotFound(_) => "Not found",
            Self::Unauthorized(_) => "Unauthorized",
            Self::Internal(_) => "Internal server error",
        }
    }

    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Common(CommonError::Validation(_)) => StatusCode::BAD_REQUEST,
            Self::Common(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Token(_) => StatusCode::BAD_GATEWAY,
            Self::StatusLog(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Http(_) => StatusCode::BAD_GATEWAY,
            Self::Sweep(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Result type alias (Common)
pub type CommonResult<T> = Result<T, CommonError>;

/// Result type alias (status check)
pub type StatusResult<T> = Result<T, StatusError>;

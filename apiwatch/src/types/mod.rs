//! 型定義モジュール
//!
//! ステータスチェックのドメイン型を提供

/// ステータス関連の型定義
pub mod status;

pub use status::{
    ApiHealthCheck, EndpointHealthCheck, HealthStatus, ProviderStatistics, StatusLogEntry,
    StatusResponse,
};

//! ステータスチェックの型定義
//!
//! `GET /status/check` のレスポンス形式（camelCase）と、
//! ステータスログに永続化される履歴エントリを定義する。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// 3段階のヘルス分類（深刻度順）
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    /// 正常稼働
    Operational,
    /// 性能低下・部分的な失敗
    Degraded,
    /// 停止
    Outage,
}

impl HealthStatus {
    /// HealthStatusを文字列に変換
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Operational => "operational",
            Self::Degraded => "degraded",
            Self::Outage => "outage",
        }
    }

    /// アップタイム計算上「稼働中」とみなすか（degradedも含む）
    pub fn counts_as_up(&self) -> bool {
        !matches!(self, Self::Outage)
    }
}

impl FromStr for HealthStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "operational" => Ok(Self::Operational),
            "degraded" => Ok(Self::Degraded),
            "outage" => Ok(Self::Outage),
            other => Err(format!("unknown health status: {other}")),
        }
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 単一エンドポイントのプローブ結果
///
/// プローブ1回ごとに生成され、集計後は破棄される（個別には永続化しない）。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EndpointHealthCheck {
    /// エンドポイントID
    pub id: String,
    /// 表示名
    pub name: String,
    /// 相対パス（クエリ文字列を含む）
    pub url: String,
    /// 分類結果
    pub status: HealthStatus,
    /// 応答時間（ミリ秒）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time: Option<u64>,
    /// エラーメッセージ
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// プロバイダー単位のヘルス集計
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealthCheck {
    /// プロバイダーID
    pub id: String,
    /// 表示名
    pub name: String,
    /// プロバイダー全体のステータス
    pub status: HealthStatus,
    /// 直近履歴から算出した稼働率（%、小数第1位）
    pub uptime: f64,
    /// 平均応答時間（ミリ秒、四捨五入）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time: Option<u64>,
    /// チェック日時
    pub last_checked: DateTime<Utc>,
    /// エンドポイント別の結果（設定順）
    pub endpoints: Vec<EndpointHealthCheck>,
}

/// システム全体のステータススナップショット
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    /// 全体ステータス
    pub overall_status: HealthStatus,
    /// プロバイダー別の結果
    pub apis: Vec<ApiHealthCheck>,
    /// スナップショット生成日時
    pub last_updated: DateTime<Utc>,
    /// 前回成功時のキャッシュから返した場合のみ `true`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cached: Option<bool>,
}

impl StatusResponse {
    /// キャッシュ由来であることを示すコピーを作成
    pub fn as_cached(&self) -> Self {
        Self {
            cached: Some(true),
            ..self.clone()
        }
    }
}

/// ステータスログの1エントリ（追記専用）
#[derive(Debug, Clone, PartialEq)]
pub struct StatusLogEntry {
    /// プロバイダーID
    pub provider_id: String,
    /// プロバイダー名
    pub provider_name: String,
    /// プロバイダー全体のステータス
    pub status: HealthStatus,
    /// 平均応答時間（ミリ秒）
    pub response_time_ms: u64,
    /// チェック日時
    pub checked_at: DateTime<Utc>,
}

/// 直近N分間の履歴統計
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProviderStatistics {
    /// プロバイダーID
    pub api_id: String,
    /// プロバイダー名
    pub api_name: String,
    /// 対象期間の記録数
    pub total_calls: usize,
    /// operationalだった記録数
    pub successful_calls: usize,
    /// operational率（%、小数第2位）
    pub uptime: f64,
    /// 平均応答時間（ミリ秒）
    pub avg_response_time: u64,
    /// 対象期間の説明
    pub time_range: String,
}

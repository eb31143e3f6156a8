//! Repository traitパターン定義
//!
//! ステータスログ操作を抽象化し、ヘルスチェック側を永続化方式から切り離す。
//! SQLite実装は`status_log`モジュールのフリー関数に委譲する。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::types::status::StatusLogEntry;

use super::status_log::compute_uptime;

/// ステータスログのRepository trait
#[async_trait]
pub trait StatusLogStore: Send + Sync {
    /// ログを1件追記
    async fn append(&self, entry: &StatusLogEntry) -> Result<(), sqlx::Error>;
    /// 直近`limit`件を新しい順に取得
    async fn query_recent(
        &self,
        provider_id: &str,
        limit: u32,
    ) -> Result<Vec<StatusLogEntry>, sqlx::Error>;
    /// 指定日時以降のログを新しい順に取得
    async fn query_since(
        &self,
        provider_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<StatusLogEntry>, sqlx::Error>;
    /// ストレージの疎通確認
    async fn ping(&self) -> Result<(), sqlx::Error>;

    /// 直近`window`件の履歴からアップタイム（%）を計算
    async fn uptime(&self, provider_id: &str, window: u32) -> Result<f64, sqlx::Error> {
        let recent = self.query_recent(provider_id, window).await?;
        Ok(compute_uptime(&recent))
    }
}

#[async_trait]
impl StatusLogStore for SqlitePool {
    async fn append(&self, entry: &StatusLogEntry) -> Result<(), sqlx::Error> {
        super::status_log::append_status_log(self, entry).await?;
        Ok(())
    }

    async fn query_recent(
        &self,
        provider_id: &str,
        limit: u32,
    ) -> Result<Vec<StatusLogEntry>, sqlx::Error> {
        super::status_log::list_recent_status_logs(self, provider_id, limit).await
    }

    async fn query_since(
        &self,
        provider_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<StatusLogEntry>, sqlx::Error> {
        super::status_log::list_status_logs_since(self, provider_id, since).await
    }

    async fn ping(&self) -> Result<(), sqlx::Error> {
        super::status_log::ping(self).await
    }
}

//! ステータスログ（SQLite）
//!
//! プロバイダー単位の (status, response_time, checked_at) を追記専用で保存する。
//! このモジュールは削除・更新を行わない（保持期間の管理は外部の責務）。

use crate::types::status::{HealthStatus, ProviderStatistics, StatusLogEntry};
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::SqlitePool;

/// `checked_at`を固定幅のRFC3339文字列に変換（文字列順 = 時刻順）
fn format_checked_at(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// ステータスログを1件追記
pub async fn append_status_log(
    pool: &SqlitePool,
    entry: &StatusLogEntry,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO api_status_logs (api_id, api_name, status, response_time, checked_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&entry.provider_id)
    .bind(&entry.provider_name)
    .bind(entry.status.as_str())
    .bind(entry.response_time_ms as i64)
    .bind(format_checked_at(&entry.checked_at))
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// プロバイダーの直近ログを新しい順に取得
pub async fn list_recent_status_logs(
    pool: &SqlitePool,
    provider_id: &str,
    limit: u32,
) -> Result<Vec<StatusLogEntry>, sqlx::Error> {
    let rows = sqlx::query_as::<_, StatusLogRow>(
        r#"
        SELECT api_id, api_name, status, response_time, checked_at
        FROM api_status_logs
        WHERE api_id = ?
        ORDER BY checked_at DESC, id DESC
        LIMIT ?
        "#,
    )
    .bind(provider_id)
    .bind(limit as i64)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(StatusLogEntry::try_from).collect()
}

/// 指定日時以降のログを新しい順に取得
pub async fn list_status_logs_since(
    pool: &SqlitePool,
    provider_id: &str,
    since: DateTime<Utc>,
) -> Result<Vec<StatusLogEntry>, sqlx::Error> {
    let rows = sqlx::query_as::<_, StatusLogRow>(
        r#"
        SELECT api_id, api_name, status, response_time, checked_at
        FROM api_status_logs
        WHERE api_id = ? AND checked_at >= ?
        ORDER BY checked_at DESC, id DESC
        "#,
    )
    .bind(provider_id)
    .bind(format_checked_at(&since))
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(StatusLogEntry::try_from).collect()
}

/// 疎通確認
pub async fn ping(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// 直近履歴からアップタイム（%）を計算
///
/// outage以外（degradedを含む）を稼働扱いとし、小数第1位で丸める。
/// 履歴が無い場合は100.0。
pub fn compute_uptime(entries: &[StatusLogEntry]) -> f64 {
    if entries.is_empty() {
        return 100.0;
    }
    let up = entries.iter().filter(|e| e.status.counts_as_up()).count();
    round_to(up as f64 / entries.len() as f64 * 100.0, 1)
}

/// 期間内の履歴からプロバイダー統計を集計
///
/// 成功数はoperationalのみを数え、アップタイムは小数第2位で丸める。
/// 履歴が無い場合は`None`。
pub fn summarize_statistics(
    provider_id: &str,
    provider_name: &str,
    entries: &[StatusLogEntry],
    time_range: &str,
) -> Option<ProviderStatistics> {
    if entries.is_empty() {
        return None;
    }
    let total = entries.len();
    let successful = entries
        .iter()
        .filter(|e| e.status == HealthStatus::Operational)
        .count();
    let response_sum: u64 = entries.iter().map(|e| e.response_time_ms).sum();

    Some(ProviderStatistics {
        api_id: provider_id.to_string(),
        api_name: provider_name.to_string(),
        total_calls: total,
        successful_calls: successful,
        uptime: round_to(successful as f64 / total as f64 * 100.0, 2),
        avg_response_time: (response_sum as f64 / total as f64).round() as u64,
        time_range: time_range.to_string(),
    })
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

// --- Internal Row Types ---

#[derive(sqlx::FromRow)]
struct StatusLogRow {
    api_id: String,
    api_name: String,
    status: String,
    response_time: i64,
    checked_at: String,
}

impl TryFrom<StatusLogRow> for StatusLogEntry {
    type Error = sqlx::Error;

    fn try_from(row: StatusLogRow) -> Result<Self, Self::Error> {
        let status: HealthStatus = row
            .status
            .parse()
            .map_err(|e: String| sqlx::Error::Decode(e.into()))?;
        let checked_at = DateTime::parse_from_rfc3339(&row.checked_at)
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?
            .with_timezone(&Utc);

        Ok(StatusLogEntry {
            provider_id: row.api_id,
            provider_name: row.api_name,
            status,
            response_time_ms: row.response_time.max(0) as u64,
            checked_at,
        })
    }
}

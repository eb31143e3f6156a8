//! プロバイダーヘルス集計
//!
//! 1プロバイダーの全エンドポイントを共有カーソルのプールでプローブし、
//! プロバイダー単位のステータス・平均応答時間・アップタイムを求めて
//! ステータスログへ1件追記する。
//!
//! トークン取得やプローブ処理そのものの失敗は、全エンドポイントを
//! `Failed to check`としたoutageの結果に置き換える（他プロバイダーのチェックは止めない）。
//! ステータスログの読み書き失敗はこの層では吸収せず`StatusError::StatusLog`として返す。

use super::pool::sweep;
use super::prober::EndpointProber;
use crate::common::error::{StatusError, StatusResult};
use crate::config::StatusCheckConfig;
use crate::db::StatusLogStore;
use crate::registry::{Provider, ProviderEndpoint};
use crate::token::TokenProvider;
use crate::types::status::{ApiHealthCheck, EndpointHealthCheck, HealthStatus, StatusLogEntry};
use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info, warn};

/// エンドポイント結果からプロバイダー全体のステータスを決める
///
/// outageが1つでもある、またはoperationalが1つも無ければoutage。
/// そうでなくdegradedがあればdegraded。
pub fn aggregate_status(endpoints: &[EndpointHealthCheck]) -> HealthStatus {
    let has_outage = endpoints.iter().any(|e| e.status == HealthStatus::Outage);
    let has_operational = endpoints
        .iter()
        .any(|e| e.status == HealthStatus::Operational);
    let has_degraded = endpoints.iter().any(|e| e.status == HealthStatus::Degraded);

    if has_outage || !has_operational {
        HealthStatus::Outage
    } else if has_degraded {
        HealthStatus::Degraded
    } else {
        HealthStatus::Operational
    }
}

/// 平均応答時間（ミリ秒、四捨五入）
///
/// 応答時間の無い結果は0として合計し、件数には含める。
pub fn average_response_time(endpoints: &[EndpointHealthCheck]) -> u64 {
    if endpoints.is_empty() {
        return 0;
    }
    let sum: u64 = endpoints.iter().map(|e| e.response_time.unwrap_or(0)).sum();
    (sum as f64 / endpoints.len() as f64).round() as u64
}

/// チェックできなかったプロバイダーの結果
pub fn failed_provider_health(provider: &Provider) -> ApiHealthCheck {
    ApiHealthCheck {
        id: provider.id.clone(),
        name: provider.name.clone(),
        status: HealthStatus::Outage,
        uptime: 0.0,
        response_time: None,
        last_checked: Utc::now(),
        endpoints: provider
            .endpoints
            .iter()
            .map(|e| EndpointHealthCheck {
                id: e.id.clone(),
                name: e.name.clone(),
                url: e.path.clone(),
                status: HealthStatus::Outage,
                response_time: None,
                error: Some("Failed to check".to_string()),
            })
            .collect(),
    }
}

/// プロバイダーヘルス集計器
#[derive(Clone)]
pub struct ProviderHealthAggregator {
    prober: EndpointProber,
    tokens: Arc<dyn TokenProvider>,
    status_log: Arc<dyn StatusLogStore>,
    pool_size: usize,
    uptime_window: u32,
}

impl ProviderHealthAggregator {
    /// 新しい集計器を作成
    pub fn new(
        prober: EndpointProber,
        tokens: Arc<dyn TokenProvider>,
        status_log: Arc<dyn StatusLogStore>,
        config: &StatusCheckConfig,
    ) -> Self {
        Self {
            prober,
            tokens,
            status_log,
            pool_size: config.pool_size,
            uptime_window: config.uptime_window,
        }
    }

    /// 1プロバイダーをチェックする
    pub async fn check_provider(&self, provider: Arc<Provider>) -> StatusResult<ApiHealthCheck> {
        let endpoints = match self.probe_endpoints(Arc::clone(&provider)).await {
            Ok(endpoints) => endpoints,
            Err(e) => {
                warn!(
                    provider_id = %provider.id,
                    error = %e,
                    "Provider check failed; reporting every endpoint as outage"
                );
                return Ok(failed_provider_health(&provider));
            }
        };

        let status = aggregate_status(&endpoints);
        let response_time = average_response_time(&endpoints);

        let uptime = self
            .status_log
            .uptime(&provider.id, self.uptime_window)
            .await
            .map_err(|e| {
                error!(provider_id = %provider.id, error = %e, "Status log read failed");
                StatusError::from(e)
            })?;

        let checked_at = Utc::now();
        let entry = StatusLogEntry {
            provider_id: provider.id.clone(),
            provider_name: provider.name.clone(),
            status,
            response_time_ms: response_time,
            checked_at,
        };
        self.status_log.append(&entry).await.map_err(|e| {
            error!(provider_id = %provider.id, error = %e, "Status log write failed");
            StatusError::from(e)
        })?;

        info!(
            provider_id = %provider.id,
            status = %status,
            latency_ms = response_time,
            uptime,
            endpoints = endpoints.len(),
            "Provider checked"
        );

        Ok(ApiHealthCheck {
            id: provider.id.clone(),
            name: provider.name.clone(),
            status,
            uptime,
            response_time: Some(response_time),
            last_checked: checked_at,
            endpoints,
        })
    }

    async fn probe_endpoints(
        &self,
        provider: Arc<Provider>,
    ) -> StatusResult<Vec<EndpointHealthCheck>> {
        let token: Arc<str> = self.tokens.access_token().await?.into();
        let prober = self.prober.clone();
        let endpoints: Vec<ProviderEndpoint> = provider.endpoints.clone();

        sweep(endpoints, self.pool_size, move |endpoint| {
            let prober = prober.clone();
            let provider = Arc::clone(&provider);
            let token = Arc::clone(&token);
            async move { prober.probe(&provider, &endpoint, &token).await }
        })
        .await
    }
}

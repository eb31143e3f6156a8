//! システムステータスの1回分のチェック
//!
//! 全プロバイダーの集計を同時に走らせ、全件が揃ってから全体ステータスを決める。

use super::aggregator::{failed_provider_health, ProviderHealthAggregator};
use crate::common::error::StatusResult;
use crate::registry::ProviderRegistry;
use crate::types::status::{ApiHealthCheck, HealthStatus, StatusResponse};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

/// 全体ステータス（最も深刻なプロバイダーのステータス）
pub fn overall_status(apis: &[ApiHealthCheck]) -> HealthStatus {
    if apis.iter().any(|a| a.status == HealthStatus::Outage) {
        HealthStatus::Outage
    } else if apis.iter().any(|a| a.status == HealthStatus::Degraded) {
        HealthStatus::Degraded
    } else {
        HealthStatus::Operational
    }
}

/// スナップショットを1回生成する処理
///
/// `StatusGate`はこのトレイト越しにチェックを起動する。
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// チェックを1回実行してスナップショットを返す
    async fn run_check(&self) -> StatusResult<StatusResponse>;
}

/// システムステータスオーケストレーター
#[derive(Clone)]
pub struct StatusOrchestrator {
    registry: ProviderRegistry,
    aggregator: ProviderHealthAggregator,
}

impl StatusOrchestrator {
    /// 新しいオーケストレーターを作成
    pub fn new(registry: ProviderRegistry, aggregator: ProviderHealthAggregator) -> Self {
        Self {
            registry,
            aggregator,
        }
    }

    /// 全プロバイダーを並列にチェックする
    ///
    /// 1プロバイダーでもステータスログの読み書きに失敗した場合はエラーを返す。
    pub async fn run(&self) -> StatusResult<StatusResponse> {
        let check_id = Uuid::new_v4();
        let span = info_span!("status_check", %check_id);
        self.run_providers().instrument(span).await
    }

    async fn run_providers(&self) -> StatusResult<StatusResponse> {
        info!(
            providers = self.registry.len(),
            "Starting API health checks"
        );

        let mut handles = Vec::with_capacity(self.registry.len());
        for provider in self.registry.list() {
            let aggregator = self.aggregator.clone();
            let provider = Arc::clone(provider);
            handles.push((
                Arc::clone(&provider),
                tokio::spawn(
                    async move { aggregator.check_provider(provider).await }
                        .in_current_span(),
                ),
            ));
        }

        let mut apis = Vec::with_capacity(handles.len());
        let mut first_error = None;
        for (provider, handle) in handles {
            match handle.await {
                Ok(Ok(health)) => apis.push(health),
                Ok(Err(e)) => {
                    error!(provider_id = %provider.id, error = %e, "Provider check aborted");
                    first_error.get_or_insert(e);
                }
                Err(e) => {
                    error!("Task join error: {}", e);
                    apis.push(failed_provider_health(&provider));
                }
            }
        }

        if let Some(e) = first_error {
            return Err(e);
        }

        let overall = overall_status(&apis);
        info!(status = %overall, "API health checks complete");

        Ok(StatusResponse {
            overall_status: overall,
            apis,
            last_updated: Utc::now(),
            cached: None,
        })
    }
}

#[async_trait]
impl SnapshotSource for StatusOrchestrator {
    async fn run_check(&self) -> StatusResult<StatusResponse> {
        self.run().await
    }
}

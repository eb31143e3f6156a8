//! エンドポイントプローバー
//!
//! 1エンドポイントに対してGETを1回だけ送り、応答ステータスと経過時間から
//! operational / degraded / outage に分類する。リトライは行わない。
//!
//! 分類の優先順位:
//!
//! 1. 2xx かつ degraded閾値未満 → operational
//! 2. 4xx → degraded（`HTTP {status}: {body}`）
//! 3. degraded閾値以上 outage閾値未満 → degraded（`Slow response`）
//! 4. 5xx → outage（`HTTP {status}: {body}`）
//! 5. outage閾値以上 → outage（`Slow response`）
//! 6. それ以外 → outage（`HTTP {status}`）
//!
//! 通信エラー・タイムアウトは outage として記録し、上位には伝播しない。

use crate::config::{ProbeThresholds, StatusCheckConfig};
use crate::registry::{Provider, ProviderEndpoint};
use crate::types::status::{EndpointHealthCheck, HealthStatus};
use reqwest::header::{ACCEPT_LANGUAGE, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::debug;

/// プローブ要求のUser-Agent
pub const PROBE_USER_AGENT: &str = "OryonAI-StatusMonitor/1.0";

/// プローブ要求のAccept-Language
pub const PROBE_ACCEPT_LANGUAGE: &str = "en-US";

/// ログに出す応答本文の最大文字数
const LOG_BODY_LIMIT: usize = 200;

/// 応答ステータス・経過時間・本文から分類結果を決定する
///
/// `body`は非2xxのときのエラーメッセージにのみ使われる。
pub fn classify_response(
    status: u16,
    elapsed_ms: u64,
    body: &str,
    thresholds: &ProbeThresholds,
) -> (HealthStatus, Option<String>) {
    let success = (200..300).contains(&status);

    if success && elapsed_ms < thresholds.degraded_ms {
        return (HealthStatus::Operational, None);
    }
    if (400..500).contains(&status) {
        return (HealthStatus::Degraded, Some(http_error_message(status, body)));
    }
    if elapsed_ms >= thresholds.degraded_ms && elapsed_ms < thresholds.outage_ms {
        return (HealthStatus::Degraded, Some("Slow response".to_string()));
    }
    if status >= 500 {
        return (HealthStatus::Outage, Some(http_error_message(status, body)));
    }
    if elapsed_ms >= thresholds.outage_ms {
        return (HealthStatus::Outage, Some("Slow response".to_string()));
    }
    (HealthStatus::Outage, Some(format!("HTTP {status}")))
}

fn http_error_message(status: u16, body: &str) -> String {
    if body.is_empty() {
        format!("HTTP {status}")
    } else {
        format!("HTTP {status}: {body}")
    }
}

fn truncate_for_log(body: &str) -> &str {
    match body.char_indices().nth(LOG_BODY_LIMIT) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

/// エンドポイントプローバー
#[derive(Clone)]
pub struct EndpointProber {
    client: Client,
    timeout: Duration,
    thresholds: ProbeThresholds,
}

impl EndpointProber {
    /// 共有HTTPクライアントと設定から作成
    pub fn new(client: Client, config: &StatusCheckConfig) -> Self {
        Self {
            client,
            timeout: config.probe_timeout,
            thresholds: config.thresholds,
        }
    }

    /// 1エンドポイントをプローブする
    ///
    /// 結果は常に`EndpointHealthCheck`として返り、失敗も分類結果に含まれる。
    pub async fn probe(
        &self,
        provider: &Provider,
        endpoint: &ProviderEndpoint,
        token: &str,
    ) -> EndpointHealthCheck {
        let url = provider.endpoint_url(endpoint);
        let started = Instant::now();

        let result = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .header(ACCEPT_LANGUAGE, PROBE_ACCEPT_LANGUAGE)
            .header(USER_AGENT, PROBE_USER_AGENT)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await;

        let (status, error, elapsed_ms) = match result {
            Ok(response) => {
                let elapsed_ms = started.elapsed().as_millis() as u64;
                let http_status = response.status();
                let body = if http_status.is_success() {
                    String::new()
                } else {
                    response.text().await.unwrap_or_default()
                };

                if !body.is_empty() {
                    debug!(
                        provider_id = %provider.id,
                        endpoint_id = %endpoint.id,
                        http_status = http_status.as_u16(),
                        body = %truncate_for_log(&body),
                        "Non-success response body"
                    );
                }

                let (status, error) =
                    classify_response(http_status.as_u16(), elapsed_ms, &body, &self.thresholds);
                (status, error, elapsed_ms)
            }
            Err(e) => {
                let elapsed_ms = started.elapsed().as_millis() as u64;
                let message = if e.is_timeout() {
                    format!("Request timed out after {}ms", self.timeout.as_millis())
                } else {
                    let text = e.to_string();
                    if text.is_empty() {
                        "Request failed".to_string()
                    } else {
                        text
                    }
                };
                (HealthStatus::Outage, Some(message), elapsed_ms)
            }
        };

        debug!(
            provider_id = %provider.id,
            endpoint_id = %endpoint.id,
            status = %status,
            latency_ms = elapsed_ms,
            error = error.as_deref().unwrap_or(""),
            "Endpoint probed"
        );

        EndpointHealthCheck {
            id: endpoint.id.clone(),
            name: endpoint.name.clone(),
            url: endpoint.path.clone(),
            status,
            response_time: Some(elapsed_ms),
            error,
        }
    }
}

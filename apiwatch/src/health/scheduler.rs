//! 定期ステータスチェック
//!
//! `APIWATCH_CHECK_INTERVAL_SECS`が設定されている場合に、外部cronの代わりに
//! 一定間隔でゲート経由のチェックを起動する。ゲートを通すため、
//! 利用者からのリクエストと重なっても実行は1回にまとまる。

use super::gate::StatusGate;
use crate::shutdown::ShutdownController;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info};

/// 定期チェックのスケジューラー
pub struct StatusScheduler {
    gate: StatusGate,
    check_interval: Duration,
    shutdown: ShutdownController,
}

impl StatusScheduler {
    /// 新しいスケジューラーを作成
    pub fn new(gate: StatusGate, check_interval: Duration, shutdown: ShutdownController) -> Self {
        Self {
            gate,
            check_interval,
            shutdown,
        }
    }

    /// バックグラウンドで開始
    pub fn start(self) -> JoinHandle<()> {
        tokio::spawn(async move { self.run_loop().await })
    }

    async fn run_loop(&self) {
        let mut timer = interval(self.check_interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(
            interval_secs = self.check_interval.as_secs(),
            "Status scheduler started"
        );

        loop {
            tokio::select! {
                _ = self.shutdown.wait() => {
                    info!("Status scheduler stopped");
                    return;
                }
                _ = timer.tick() => {}
            }

            let result = tokio::select! {
                _ = self.shutdown.wait() => {
                    info!("Status scheduler stopped during a check");
                    return;
                }
                result = self.gate.get_status() => result,
            };

            match result {
                Ok(snapshot) => info!(
                    status = %snapshot.overall_status,
                    cached = snapshot.cached.unwrap_or(false),
                    "Scheduled status check completed"
                ),
                Err(e) => error!(error = %e, "Scheduled status check failed"),
            }
        }
    }
}
